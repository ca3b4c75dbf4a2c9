//! Text analysis module for readmark.
//!
//! This module turns raw prose into the token tree consumed by the annotation
//! pipeline and classifies the segments it finds.

pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use token::*;
pub use tokenizer::*;

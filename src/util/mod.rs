//! Utility modules for readmark.

pub mod html;

// Re-export commonly used functions
pub use html::*;

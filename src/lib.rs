//! # Readmark
//!
//! Vocabulary-status annotation for English prose.
//!
//! ## Features
//!
//! - Unicode-aware paragraph, sentence and word segmentation
//! - Phrase merging driven by byte-offset occurrences from a vocabulary store
//! - Status-classed HTML rendering (`new`, `ignore`, `learning`, `familiar`, `known`, `learned`)
//! - Pluggable vocabulary stores behind an async trait
//! - Markdown-like post-processing for images, headings and emphasis

pub mod analysis;
pub mod annotate;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod postprocess;
pub mod status;
pub mod store;
pub mod tree;
pub mod util;

pub mod prelude {
    pub use crate::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
    pub use crate::annotate::{PhraseStatusSource, RenderConfig, WordCounts};
    pub use crate::config::AnnotatorConfig;
    pub use crate::engine::{Annotation, Annotator};
    pub use crate::error::{ReadmarkError, Result};
    pub use crate::postprocess::PostProcessConfig;
    pub use crate::status::StatusLevel;
    pub use crate::store::{ExpressionRecord, MemoryStore, VocabularyStore};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

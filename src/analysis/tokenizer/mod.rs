//! Tokenizer implementations for text annotation.
//!
//! A tokenizer turns raw text into a [`Node`] tree with byte offsets on every
//! node. The annotation pipeline only depends on the [`Tokenizer`] trait, so a
//! different segmentation strategy can be plugged into the
//! [`Annotator`](crate::engine::Annotator).
//!
//! # Examples
//!
//! ```
//! use readmark::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
//!
//! let tokenizer = EnglishTokenizer::new();
//! let tree = tokenizer.tokenize("Hello world").unwrap();
//! assert_eq!(tree.to_plain_string(), "Hello world");
//! ```

use crate::error::Result;
use crate::tree::Node;

/// Trait for tokenizers that convert text into a token tree.
///
/// The trait requires `Send + Sync` so one tokenizer can serve concurrent
/// annotation calls.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a `Root` node.
    ///
    /// Leaves must cover the text without gaps so that concatenating them
    /// reproduces the input.
    fn tokenize(&self, text: &str) -> Result<Node>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod english;

pub use english::EnglishTokenizer;

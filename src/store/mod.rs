//! Vocabulary store interface.
//!
//! The annotation pipeline never persists anything itself. It asks a
//! [`VocabularyStore`] two questions about a text: which known phrases occur
//! in it (with byte offsets), and what the status of each distinct word is.
//!
//! # Custom Implementation
//!
//! ```
//! use async_trait::async_trait;
//! use readmark::error::Result;
//! use readmark::store::{ExpressionRecord, StoredWords, StoredWordsQuery, VocabularyStore};
//!
//! struct EmptyStore;
//!
//! #[async_trait]
//! impl VocabularyStore for EmptyStore {
//!     async fn get_stored_words(&self, _query: &StoredWordsQuery) -> Result<StoredWords> {
//!         Ok(StoredWords::default())
//!     }
//!
//!     async fn get_expressions_simple(&self, _texts: &[String]) -> Result<Vec<ExpressionRecord>> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::StatusLevel;
use crate::tree::Span;

pub mod memory;

pub use memory::MemoryStore;

/// A lookup request against a vocabulary store.
///
/// When `article` is non-empty the store locates its known phrases inside
/// that exact text. When `words` is non-empty the store reports the status of
/// each requested word.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWordsQuery {
    pub article: String,
    pub words: Vec<String>,
}

impl StoredWordsQuery {
    /// Query phrase occurrences inside an article.
    pub fn article<S: Into<String>>(article: S) -> Self {
        StoredWordsQuery {
            article: article.into(),
            words: Vec::new(),
        }
    }

    /// Query the status of a set of words.
    pub fn words(words: Vec<String>) -> Self {
        StoredWordsQuery {
            article: String::new(),
            words,
        }
    }

    /// Add a word list to an article query.
    pub fn with_words(mut self, words: Vec<String>) -> Self {
        self.words = words;
        self
    }
}

/// Status of a single word known to the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub text: String,
    pub status: StatusLevel,
}

/// A known phrase found in an article.
///
/// `text` is the normalized (lowercase) phrase and doubles as the status
/// key; its byte length is the length of the occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseOccurrence {
    pub text: String,
    pub status: StatusLevel,
    pub offset: usize,
}

impl PhraseOccurrence {
    pub fn new<S: Into<String>>(text: S, status: StatusLevel, offset: usize) -> Self {
        PhraseOccurrence {
            text: text.into(),
            status,
            offset,
        }
    }

    /// Length of the occurrence in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.len()
    }

    pub fn span(&self) -> Span {
        Span::new(self.offset, self.end())
    }
}

/// Response to a [`StoredWordsQuery`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWords {
    #[serde(default)]
    pub words: Vec<WordRecord>,
    #[serde(default)]
    pub phrases: Vec<PhraseOccurrence>,
}

/// Whether an expression is a single word or a multi-word phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionKind {
    Word,
    Phrase,
}

/// Dictionary data for a word or phrase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    pub expression: String,
    #[serde(default)]
    pub meaning: String,
    pub status: StatusLevel,
    /// Explicit kind; inferred from the expression when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ExpressionKind>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ExpressionRecord {
    pub fn new<S: Into<String>>(expression: S, status: StatusLevel) -> Self {
        ExpressionRecord {
            expression: expression.into(),
            meaning: String::new(),
            status,
            kind: None,
            tags: Vec::new(),
        }
    }

    pub fn with_meaning<S: Into<String>>(mut self, meaning: S) -> Self {
        self.meaning = meaning.into();
        self
    }

    pub fn with_kind(mut self, kind: ExpressionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// The explicit kind, or `Phrase` when the expression contains whitespace.
    pub fn resolved_kind(&self) -> ExpressionKind {
        self.kind.unwrap_or_else(|| {
            if self.expression.trim().contains(char::is_whitespace) {
                ExpressionKind::Phrase
            } else {
                ExpressionKind::Word
            }
        })
    }
}

/// Trait for vocabulary stores consulted by the annotation pipeline.
///
/// Implementations must be `Send + Sync` so one store can back concurrent
/// annotation calls.
#[async_trait]
pub trait VocabularyStore: Send + Sync {
    /// Make sure the backing storage is reachable.
    ///
    /// Called before every lookup. The default implementation does nothing.
    async fn ensure_ready(&self) -> Result<()> {
        Ok(())
    }

    /// Locate known phrases in `query.article` and report the status of
    /// `query.words`.
    async fn get_stored_words(&self, query: &StoredWordsQuery) -> Result<StoredWords>;

    /// Batch lookup of dictionary data for a list of surface forms.
    ///
    /// Unknown forms are skipped.
    async fn get_expressions_simple(&self, texts: &[String]) -> Result<Vec<ExpressionRecord>>;

    /// Get the name of this store (for logging).
    fn name(&self) -> &str {
        "unknown"
    }
}

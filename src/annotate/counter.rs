//! Word status counting.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::annotate::locator::distinct_words;
use crate::error::Result;
use crate::status::StatusLevel;
use crate::store::{StoredWordsQuery, VocabularyStore};
use crate::tree::Node;

/// Distinct-word counts for one text.
///
/// Numerals and CJK words are not counted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCounts {
    /// Words the store does not know.
    pub unknown: usize,
    /// Known words with a status other than `ignore`.
    pub learning: usize,
    /// Known words with the `ignore` status.
    pub ignored: usize,
}

impl WordCounts {
    pub fn total(&self) -> usize {
        self.unknown + self.learning + self.ignored
    }
}

/// Counts the distinct words of a tree by store status.
#[derive(Clone)]
pub struct StatusCounter {
    store: Arc<dyn VocabularyStore>,
}

impl StatusCounter {
    pub fn new(store: Arc<dyn VocabularyStore>) -> Self {
        StatusCounter { store }
    }

    pub async fn count(&self, tree: &Node) -> Result<WordCounts> {
        let words = distinct_words(tree, true);
        self.store.ensure_ready().await?;
        let stored = self
            .store
            .get_stored_words(&StoredWordsQuery::words(words.clone()))
            .await?;

        // Only count answers for words that were asked about, once each.
        let requested: AHashSet<&str> = words.iter().map(String::as_str).collect();
        let mut known: AHashMap<String, StatusLevel> = AHashMap::new();
        for record in stored.words {
            let text = record.text.to_lowercase();
            if requested.contains(text.as_str()) {
                known.entry(text).or_insert(record.status);
            }
        }

        let ignored = known
            .values()
            .filter(|status| **status == StatusLevel::Ignore)
            .count();
        let counts = WordCounts {
            unknown: words.len() - known.len(),
            learning: known.len() - ignored,
            ignored,
        };

        debug!(
            "counted {} distinct words: {} unknown, {} learning, {} ignored",
            words.len(),
            counts.unknown,
            counts.learning,
            counts.ignored
        );

        Ok(counts)
    }
}

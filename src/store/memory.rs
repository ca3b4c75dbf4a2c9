//! In-memory vocabulary store.
//!
//! Expressions are kept in a map keyed by their lowercase text. The store can
//! be filled programmatically or loaded from a JSON document of the form
//!
//! ```json
//! { "expressions": [ { "expression": "give up", "status": 1, "meaning": "stop trying" } ] }
//! ```

use std::fs;
use std::path::Path;

use ahash::{AHashMap, AHashSet};
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::status::StatusLevel;
use crate::store::{
    ExpressionKind, ExpressionRecord, PhraseOccurrence, StoredWords, StoredWordsQuery,
    VocabularyStore, WordRecord,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    expressions: Vec<ExpressionRecord>,
}

/// A vocabulary store that keeps every expression in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    expressions: RwLock<AHashMap<String, ExpressionRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given records.
    pub fn from_records<I: IntoIterator<Item = ExpressionRecord>>(records: I) -> Self {
        let store = MemoryStore::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Parse a store from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: StoreFile = serde_json::from_str(json)?;
        Ok(Self::from_records(file.expressions))
    }

    /// Load a store from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Write the store to a JSON file, expressions sorted by text.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = StoreFile {
            expressions: self.records(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Insert or replace an expression. The key is its trimmed lowercase text.
    pub fn insert(&self, mut record: ExpressionRecord) {
        record.expression = record.expression.trim().to_lowercase();
        self.expressions
            .write()
            .insert(record.expression.clone(), record);
    }

    /// Update the status of a known expression.
    ///
    /// Returns `false` when the expression is unknown.
    pub fn set_status(&self, expression: &str, status: StatusLevel) -> bool {
        let key = expression.trim().to_lowercase();
        match self.expressions.write().get_mut(&key) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        }
    }

    /// Remove an expression, returning it if it was present.
    pub fn remove(&self, expression: &str) -> Option<ExpressionRecord> {
        self.expressions
            .write()
            .remove(&expression.trim().to_lowercase())
    }

    /// Look up a single expression.
    pub fn get(&self, expression: &str) -> Option<ExpressionRecord> {
        self.expressions
            .read()
            .get(&expression.trim().to_lowercase())
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.expressions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.read().is_empty()
    }

    /// All records sorted by expression text.
    pub fn records(&self) -> Vec<ExpressionRecord> {
        let mut records: Vec<_> = self.expressions.read().values().cloned().collect();
        records.sort_by(|a, b| a.expression.cmp(&b.expression));
        records
    }

    /// Find the whole-word occurrences of known phrases in `article`.
    ///
    /// Matches are chosen leftmost-longest: a match that overlaps an earlier
    /// or longer one at the same offset is discarded.
    fn locate_phrases(&self, article: &str) -> Vec<PhraseOccurrence> {
        let guard = self.expressions.read();
        let mut occurrences = Vec::new();

        for record in guard.values() {
            if record.resolved_kind() != ExpressionKind::Phrase || record.expression.is_empty() {
                continue;
            }
            for (offset, matched) in article.match_indices(record.expression.as_str()) {
                if is_word_boundary(article, offset, offset + matched.len()) {
                    occurrences.push(PhraseOccurrence::new(
                        record.expression.clone(),
                        record.status,
                        offset,
                    ));
                }
            }
        }

        occurrences.sort_by(|a, b| a.offset.cmp(&b.offset).then(b.len().cmp(&a.len())));

        let found = occurrences.len();
        let mut covered = 0;
        occurrences.retain(|occurrence| {
            if occurrence.offset < covered {
                return false;
            }
            covered = occurrence.end();
            true
        });
        if occurrences.len() < found {
            debug!(
                "discarded {} overlapping phrase matches",
                found - occurrences.len()
            );
        }
        occurrences
    }

    fn lookup_words(&self, words: &[String]) -> Vec<WordRecord> {
        let guard = self.expressions.read();
        let mut seen = AHashSet::with_capacity(words.len());
        let mut found = Vec::new();

        for word in words {
            let key = word.to_lowercase();
            if !seen.insert(key.clone()) {
                continue;
            }
            if let Some(record) = guard.get(&key)
                && record.resolved_kind() == ExpressionKind::Word
            {
                found.push(WordRecord {
                    text: key,
                    status: record.status,
                });
            }
        }

        found
    }
}

/// Whether `article[start..end]` is not glued to surrounding word characters.
fn is_word_boundary(article: &str, start: usize, end: usize) -> bool {
    let before = article[..start].chars().next_back();
    let after = article[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[async_trait]
impl VocabularyStore for MemoryStore {
    async fn get_stored_words(&self, query: &StoredWordsQuery) -> Result<StoredWords> {
        let phrases = if query.article.is_empty() {
            Vec::new()
        } else {
            self.locate_phrases(&query.article)
        };
        let words = if query.words.is_empty() {
            Vec::new()
        } else {
            self.lookup_words(&query.words)
        };

        debug!(
            "memory store answered {} phrase occurrences and {} of {} words",
            phrases.len(),
            words.len(),
            query.words.len()
        );

        Ok(StoredWords { words, phrases })
    }

    async fn get_expressions_simple(&self, texts: &[String]) -> Result<Vec<ExpressionRecord>> {
        let guard = self.expressions.read();
        Ok(texts
            .iter()
            .filter_map(|text| guard.get(&text.trim().to_lowercase()).cloned())
            .collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

//! Learning status levels and the per-text word status map.
//!
//! A vocabulary store classifies every word or phrase it knows with one of
//! five ordinal levels. Words the store has never seen have no level at all
//! and render with the implicit `new` class.

use std::convert::TryFrom;
use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ReadmarkError;

/// Class name used for words absent from the status map.
pub const NEW_CLASS: &str = "new";

/// Class name used for numerals and CJK tokens.
pub const OTHER_CLASS: &str = "other";

/// Ordinal learning progress of a word or phrase.
///
/// Serialized as its ordinal (`0..=4`) so store payloads stay compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StatusLevel {
    /// Explicitly ignored by the reader.
    Ignore = 0,
    Learning = 1,
    Familiar = 2,
    Known = 3,
    Learned = 4,
}

impl StatusLevel {
    /// All levels in ordinal order.
    pub const ALL: [StatusLevel; 5] = [
        StatusLevel::Ignore,
        StatusLevel::Learning,
        StatusLevel::Familiar,
        StatusLevel::Known,
        StatusLevel::Learned,
    ];

    /// Resolve an ordinal into a level.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// The ordinal stored by the vocabulary store.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The CSS class emitted for this level.
    pub fn class_name(self) -> &'static str {
        match self {
            StatusLevel::Ignore => "ignore",
            StatusLevel::Learning => "learning",
            StatusLevel::Familiar => "familiar",
            StatusLevel::Known => "known",
            StatusLevel::Learned => "learned",
        }
    }

    /// Whether the reader has started tracking this item.
    pub fn is_tracked(self) -> bool {
        self != StatusLevel::Ignore
    }
}

impl TryFrom<u8> for StatusLevel {
    type Error = ReadmarkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusLevel::from_ordinal(value)
            .ok_or_else(|| ReadmarkError::store(format!("unknown status ordinal {value}")))
    }
}

impl From<StatusLevel> for u8 {
    fn from(level: StatusLevel) -> Self {
        level.ordinal()
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// Status class for an optional level, `new` when absent.
pub fn class_for(level: Option<StatusLevel>) -> &'static str {
    level.map(StatusLevel::class_name).unwrap_or(NEW_CLASS)
}

/// Lowercase word text to status level, built once per annotated text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WordStatusMap {
    levels: AHashMap<String, StatusLevel>,
}

impl WordStatusMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the level of a word; the key is lowercased.
    pub fn insert(&mut self, word: &str, level: StatusLevel) {
        self.levels.insert(word.to_lowercase(), level);
    }

    /// Case-insensitive lookup.
    pub fn get(&self, word: &str) -> Option<StatusLevel> {
        self.levels.get(&word.to_lowercase()).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get(word).is_some()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterate over `(word, level)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, StatusLevel)> {
        self.levels.iter().map(|(word, level)| (word.as_str(), *level))
    }
}

impl<S: AsRef<str>> FromIterator<(S, StatusLevel)> for WordStatusMap {
    fn from_iter<I: IntoIterator<Item = (S, StatusLevel)>>(iter: I) -> Self {
        let mut map = WordStatusMap::new();
        for (word, level) in iter {
            map.insert(word.as_ref(), level);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_follow_ordinals() {
        let classes: Vec<_> = StatusLevel::ALL.iter().map(|l| l.class_name()).collect();
        assert_eq!(
            classes,
            vec!["ignore", "learning", "familiar", "known", "learned"]
        );
        assert_eq!(class_for(None), "new");
        assert_eq!(class_for(Some(StatusLevel::Known)), "known");
    }

    #[test]
    fn test_ordinal_round_trip_through_serde() {
        let level: StatusLevel = serde_json::from_str("2").unwrap();
        assert_eq!(level, StatusLevel::Familiar);
        assert_eq!(serde_json::to_string(&StatusLevel::Learned).unwrap(), "4");
    }

    #[test]
    fn test_out_of_range_ordinal_is_rejected() {
        assert!(serde_json::from_str::<StatusLevel>("5").is_err());
        assert!(StatusLevel::try_from(9).is_err());
    }

    #[test]
    fn test_word_status_map_is_case_insensitive() {
        let map: WordStatusMap = [("Run", StatusLevel::Familiar)].into_iter().collect();
        assert_eq!(map.get("run"), Some(StatusLevel::Familiar));
        assert_eq!(map.get("RUN"), Some(StatusLevel::Familiar));
        assert!(!map.contains("fast"));
        assert_eq!(map.len(), 1);
    }
}

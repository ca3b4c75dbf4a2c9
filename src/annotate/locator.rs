//! Phrase and word lookups against a vocabulary store.

use std::sync::Arc;

use ahash::AHashSet;
use log::{debug, warn};

use crate::analysis::token::is_numeral_or_cjk;
use crate::error::Result;
use crate::status::WordStatusMap;
use crate::store::{PhraseOccurrence, StoredWordsQuery, VocabularyStore};
use crate::tree::Node;

/// Store answers for one text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Located {
    /// Phrase occurrences sorted by ascending offset.
    pub occurrences: Vec<PhraseOccurrence>,
    pub word_status: WordStatusMap,
}

/// Queries a vocabulary store for the phrases and words of a text.
#[derive(Clone)]
pub struct PhraseLocator {
    store: Arc<dyn VocabularyStore>,
}

impl PhraseLocator {
    pub fn new(store: Arc<dyn VocabularyStore>) -> Self {
        PhraseLocator { store }
    }

    /// Locate known phrases in `text` and resolve the status of the words
    /// of `tree`, which must be the tokenization of `text`.
    ///
    /// Phrases are queried first against the lowercased text, then words.
    /// The store's readiness hook runs before each of the two queries.
    pub async fn locate(&self, text: &str, tree: &Node) -> Result<Located> {
        let article = text.to_lowercase();
        if article.len() != text.len() {
            debug!("lowercasing changed the text length; some phrase offsets may not align");
        }

        self.store.ensure_ready().await?;
        let mut occurrences = self
            .store
            .get_stored_words(&StoredWordsQuery::article(article))
            .await?
            .phrases;
        sort_occurrences(&mut occurrences);

        let words = distinct_words(tree, false);
        self.store.ensure_ready().await?;
        let stored = self
            .store
            .get_stored_words(&StoredWordsQuery::words(words))
            .await?;

        debug!(
            "{} returned {} phrase occurrences and {} word statuses",
            self.store.name(),
            occurrences.len(),
            stored.words.len()
        );

        Ok(Located {
            occurrences,
            word_status: stored
                .words
                .into_iter()
                .map(|record| (record.text, record.status))
                .collect(),
        })
    }
}

/// Distinct lowercase words of a tree in first-seen order.
///
/// With `skip_numeral_or_cjk`, words rendered with the `other` class are left out.
pub fn distinct_words(tree: &Node, skip_numeral_or_cjk: bool) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut words = Vec::new();

    tree.for_each_word(&mut |leaf| {
        if skip_numeral_or_cjk && is_numeral_or_cjk(&leaf.value) {
            return;
        }
        let word = leaf.value.to_lowercase();
        if seen.insert(word.clone()) {
            words.push(word);
        }
    });

    words
}

/// Sort occurrences by offset, keeping store order for equal offsets.
pub fn sort_occurrences(occurrences: &mut [PhraseOccurrence]) {
    if !occurrences.is_sorted_by_key(|occurrence| occurrence.offset) {
        warn!("store returned phrase occurrences out of order; sorting by offset");
        occurrences.sort_by_key(|occurrence| occurrence.offset);
    }
}

//! The annotation engine.
//!
//! [`Annotator`] wires the pipeline together:
//!
//! ```text
//! text -> Tokenizer -> tree -> PhraseLocator -> PhraseMerger -> Renderer -> SurfacePostProcessor
//! ```
//!
//! All per-call state (occurrences, word statuses, merge cursor) lives in the
//! call itself, so one annotator can serve concurrent calls through `&self`.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use readmark::engine::Annotator;
//! use readmark::status::StatusLevel;
//! use readmark::store::{ExpressionRecord, MemoryStore};
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::from_records(vec![
//!     ExpressionRecord::new("break up", StatusLevel::Learning),
//! ]));
//! let annotator = Annotator::new(store);
//!
//! let html = annotator.text_to_html("Break up now").await.unwrap();
//! assert!(html.contains(r#"<span class="phrase learning">"#));
//! # });
//! ```

use std::sync::Arc;

use ahash::AHashSet;
use log::debug;

use crate::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
use crate::annotate::counter::{StatusCounter, WordCounts};
use crate::annotate::locator::{PhraseLocator, distinct_words, sort_occurrences};
use crate::annotate::merger::{MergeStats, PhraseMerger};
use crate::annotate::renderer::{RenderContext, Renderer};
use crate::config::AnnotatorConfig;
use crate::error::Result;
use crate::postprocess::SurfacePostProcessor;
use crate::status::WordStatusMap;
use crate::store::{ExpressionRecord, PhraseOccurrence, StoredWordsQuery, VocabularyStore};
use crate::tree::Node;

/// A merged tree together with the lookups it renders against.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub tree: Node,
    pub occurrences: Vec<PhraseOccurrence>,
    pub word_status: WordStatusMap,
    pub stats: MergeStats,
}

impl Annotation {
    /// Render the annotation with the given renderer.
    pub fn render(&self, renderer: &Renderer) -> Result<String> {
        renderer.render(
            &self.tree,
            &RenderContext::new(&self.word_status, &self.occurrences),
        )
    }
}

/// Annotates prose with vocabulary status markup.
pub struct Annotator {
    store: Arc<dyn VocabularyStore>,
    tokenizer: Arc<dyn Tokenizer>,
    locator: PhraseLocator,
    counter: StatusCounter,
    renderer: Renderer,
    post_processor: SurfacePostProcessor,
    config: AnnotatorConfig,
}

impl std::fmt::Debug for Annotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Annotator")
            .field("store", &self.store.name())
            .field("tokenizer", &self.tokenizer.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Annotator {
    /// Create an annotator with the default configuration and tokenizer.
    pub fn new(store: Arc<dyn VocabularyStore>) -> Self {
        Self::with_config(store, AnnotatorConfig::default())
    }

    /// Create an annotator with a custom configuration.
    pub fn with_config(store: Arc<dyn VocabularyStore>, config: AnnotatorConfig) -> Self {
        Annotator {
            locator: PhraseLocator::new(Arc::clone(&store)),
            counter: StatusCounter::new(Arc::clone(&store)),
            store,
            tokenizer: Arc::new(EnglishTokenizer::new()),
            renderer: Renderer::new(config.render.clone()),
            post_processor: SurfacePostProcessor::new(config.post_process.clone()),
            config,
        }
    }

    /// Replace the tokenizer.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn VocabularyStore> {
        &self.store
    }

    /// Annotate `text` and apply the surface post-processor.
    pub async fn parse(&self, text: &str) -> Result<String> {
        let html = self.text_to_html(self.prepare_input(text)).await?;
        Ok(self.post_process(&html))
    }

    /// Annotate `text` into markup without post-processing.
    pub async fn text_to_html(&self, text: &str) -> Result<String> {
        let annotation = self.annotate(text).await?;
        self.render(&annotation)
    }

    /// The part of `text` that `parse` annotates.
    pub fn prepare_input<'t>(&self, text: &'t str) -> &'t str {
        if self.config.trim_input {
            text.trim()
        } else {
            text
        }
    }

    /// Render an annotation with this annotator's renderer.
    pub fn render(&self, annotation: &Annotation) -> Result<String> {
        annotation.render(&self.renderer)
    }

    /// Apply the surface post-processor to rendered markup.
    pub fn post_process(&self, html: &str) -> String {
        self.post_processor.process(html)
    }

    /// Tokenize `text`, look up its phrases and words and merge the phrases
    /// into the tree.
    pub async fn annotate(&self, text: &str) -> Result<Annotation> {
        let tree = self.tokenizer.tokenize(text)?;
        debug!(
            "{} tokenizer produced {} nodes for {} bytes",
            self.tokenizer.name(),
            tree.node_count(),
            text.len()
        );

        let located = self.locator.locate(text, &tree).await?;
        let outcome = PhraseMerger::merge(tree, &located.occurrences);

        Ok(Annotation {
            tree: outcome.tree,
            occurrences: located.occurrences,
            word_status: located.word_status,
            stats: outcome.stats,
        })
    }

    /// Count the distinct words of `text` by store status.
    pub async fn count_words(&self, text: &str) -> Result<WordCounts> {
        let tree = self.tokenizer.tokenize(text)?;
        self.counter.count(&tree).await
    }

    /// Dictionary records for the tracked phrases and words found in `text`.
    ///
    /// Phrases come first, then words, each in text order. Ignored items are
    /// left out.
    pub async fn known_expressions(&self, text: &str) -> Result<Vec<ExpressionRecord>> {
        let tree = self.tokenizer.tokenize(text)?;
        let words = distinct_words(&tree, false);

        self.store.ensure_ready().await?;
        let query = StoredWordsQuery::article(text.to_lowercase()).with_words(words);
        let mut stored = self.store.get_stored_words(&query).await?;
        sort_occurrences(&mut stored.phrases);

        let mut seen = AHashSet::new();
        let payload: Vec<String> = stored
            .phrases
            .into_iter()
            .filter(|phrase| phrase.status.is_tracked())
            .map(|phrase| phrase.text)
            .chain(
                stored
                    .words
                    .into_iter()
                    .filter(|word| word.status.is_tracked())
                    .map(|word| word.text),
            )
            .filter(|text| seen.insert(text.clone()))
            .collect();

        if payload.is_empty() {
            return Ok(Vec::new());
        }

        self.store.ensure_ready().await?;
        let records = self.store.get_expressions_simple(&payload).await?;
        debug!(
            "resolved {} of {} known expressions",
            records.len(),
            payload.len()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::renderer::{PhraseStatusSource, RenderConfig};
    use crate::postprocess::PostProcessConfig;
    use crate::status::StatusLevel;
    use crate::store::MemoryStore;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::from_records(vec![
            ExpressionRecord::new("break up", StatusLevel::Learning).with_meaning("separate"),
            ExpressionRecord::new("now", StatusLevel::Known),
            ExpressionRecord::new("the", StatusLevel::Ignore),
        ]))
    }

    #[tokio::test]
    async fn test_text_to_html_merges_phrases() {
        let annotator = Annotator::new(store());
        let html = annotator.text_to_html("Break up now").await.unwrap();

        assert_eq!(
            html,
            "<div class=\"article\"><p><span class=\"stns\">\
             <span class=\"phrase learning\">\
             <span class=\"word new\">Break</span> <span class=\"word new\">up</span>\
             </span> <span class=\"word known\">now</span>\
             </span></p></div>"
        );
    }

    #[tokio::test]
    async fn test_annotate_reports_merge_stats() {
        let annotator = Annotator::new(store());
        let annotation = annotator.annotate("Break up now. They break up.").await.unwrap();

        assert_eq!(annotation.occurrences.len(), 2);
        assert_eq!(annotation.stats.merged, 2);
        assert_eq!(annotation.tree.phrase_count(), 2);
    }

    #[tokio::test]
    async fn test_parse_trims_and_post_processes() {
        let annotator = Annotator::new(store());
        let html = annotator.parse("  # Now\n").await.unwrap();

        assert_eq!(
            html,
            "<div class=\"article\"><p><h1><span class=\"stns\">\
             <span class=\"word known\">Now</span></span></h1></p></div>"
        );
    }

    #[tokio::test]
    async fn test_parse_without_trim_keeps_whitespace_nodes() {
        let config = AnnotatorConfig::new()
            .trim_input(false)
            .post_process(PostProcessConfig::disabled());
        let annotator = Annotator::with_config(store(), config);

        let html = annotator.parse(" now ").await.unwrap();
        assert!(html.starts_with("<div class=\"article\"> <p>"));
        assert!(html.ends_with("</p> </div>"));
    }

    #[tokio::test]
    async fn test_first_text_match_policy_through_engine() {
        let config = AnnotatorConfig::new()
            .render(RenderConfig::new().phrase_status(PhraseStatusSource::FirstTextMatch));
        let annotator = Annotator::with_config(store(), config);

        let html = annotator.text_to_html("Break up now").await.unwrap();
        assert!(html.contains("phrase learning"));
    }

    #[tokio::test]
    async fn test_count_words() {
        let annotator = Annotator::new(store());
        let counts = annotator
            .count_words("The break, now and then the end in 2024")
            .await
            .unwrap();

        // the, break, now, and, then, end, in
        assert_eq!(
            counts,
            WordCounts {
                unknown: 5,
                learning: 1,
                ignored: 1
            }
        );
    }

    #[tokio::test]
    async fn test_known_expressions_lists_phrases_then_words() {
        let annotator = Annotator::new(store());
        let records = annotator
            .known_expressions("Now the couple break up. They break up now.")
            .await
            .unwrap();

        let names: Vec<_> = records.iter().map(|r| r.expression.as_str()).collect();
        assert_eq!(names, vec!["break up", "now"]);
        assert_eq!(records[0].meaning, "separate");
    }

    #[tokio::test]
    async fn test_known_expressions_empty_when_nothing_tracked() {
        let annotator = Annotator::new(store());
        let records = annotator.known_expressions("the cat").await.unwrap();
        assert!(records.is_empty());
    }
}

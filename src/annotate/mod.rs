//! The annotation pipeline stages.
//!
//! A text goes through four stages after tokenization:
//!
//! 1. [`locator`] asks the vocabulary store for phrase occurrences and word statuses.
//! 2. [`merger`] folds the occurrences into the token tree as phrase nodes.
//! 3. [`renderer`] turns the tree into HTML.
//! 4. [`counter`] tallies distinct words by status (used on its own).

pub mod counter;
pub mod locator;
pub mod merger;
pub mod renderer;

pub use counter::{StatusCounter, WordCounts};
pub use locator::{Located, PhraseLocator, distinct_words, sort_occurrences};
pub use merger::{MergeOutcome, MergeStats, PhraseMerger};
pub use renderer::{PhraseStatusSource, RenderConfig, RenderContext, Renderer};

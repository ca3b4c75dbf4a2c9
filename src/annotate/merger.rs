//! Phrase merging.
//!
//! The merger walks the token tree and, for every phrase occurrence reported
//! by the vocabulary store, collapses the run of sentence children whose
//! combined span equals the occurrence into a single [`PhraseNode`].
//!
//! Occurrences are consumed through one cursor shared by the whole traversal,
//! in ascending offset order. An occurrence whose end does not fall on a child
//! boundary is dropped and the cursor moves on, so a stale offset never blocks
//! the occurrences after it.
//!
//! # Examples
//!
//! ```
//! use readmark::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
//! use readmark::annotate::merger::PhraseMerger;
//! use readmark::status::StatusLevel;
//! use readmark::store::PhraseOccurrence;
//!
//! let tree = EnglishTokenizer::new().tokenize("Break up now").unwrap();
//! let occurrences = vec![PhraseOccurrence::new("break up", StatusLevel::Learning, 0)];
//!
//! let outcome = PhraseMerger::merge(tree, &occurrences);
//! assert_eq!(outcome.stats.merged, 1);
//! assert_eq!(outcome.tree.phrase_count(), 1);
//! ```

use log::{debug, trace};

use crate::store::PhraseOccurrence;
use crate::tree::{Node, PhraseNode, Span};

/// Counters collected during one merge pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Occurrences turned into phrase nodes.
    pub merged: usize,
    /// Occurrences skipped because they did not align with the tree.
    pub dropped: usize,
    /// Occurrences never reached by the cursor.
    pub unmatched: usize,
}

/// Result of a merge pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    pub tree: Node,
    pub stats: MergeStats,
}

/// Splices phrase occurrences into a token tree.
///
/// A merger is single-use: it owns the cursor for one pass over one tree.
#[derive(Debug)]
pub struct PhraseMerger<'a> {
    occurrences: &'a [PhraseOccurrence],
    cursor: usize,
    stats: MergeStats,
}

impl<'a> PhraseMerger<'a> {
    /// Create a merger over occurrences sorted by ascending offset.
    pub fn new(occurrences: &'a [PhraseOccurrence]) -> Self {
        PhraseMerger {
            occurrences,
            cursor: 0,
            stats: MergeStats::default(),
        }
    }

    /// Merge `occurrences` into `tree` in one call.
    pub fn merge(tree: Node, occurrences: &[PhraseOccurrence]) -> MergeOutcome {
        PhraseMerger::new(occurrences).run(tree)
    }

    /// Consume the tree and return the merged tree.
    pub fn run(mut self, tree: Node) -> MergeOutcome {
        let tree = if self.occurrences.is_empty() {
            tree
        } else {
            self.transform(tree)
        };
        self.stats.unmatched = self.occurrences.len() - self.cursor;

        debug!(
            "phrase merge: {} merged, {} dropped, {} unmatched",
            self.stats.merged, self.stats.dropped, self.stats.unmatched
        );

        MergeOutcome {
            tree,
            stats: self.stats,
        }
    }

    fn current(&self) -> Option<&'a PhraseOccurrence> {
        self.occurrences.get(self.cursor)
    }

    fn transform(&mut self, node: Node) -> Node {
        match node {
            Node::Root(mut parent) => {
                parent.children = self.transform_all(parent.children);
                Node::Root(parent)
            }
            Node::Paragraph(mut parent) => {
                parent.children = self.transform_all(parent.children);
                Node::Paragraph(parent)
            }
            Node::Sentence(mut parent) => {
                let children = self.transform_all(parent.children);
                parent.children = self.merge_sentence(parent.span, children);
                Node::Sentence(parent)
            }
            Node::Phrase(mut phrase) => {
                phrase.children = self.transform_all(phrase.children);
                Node::Phrase(phrase)
            }
            leaf => leaf,
        }
    }

    fn transform_all(&mut self, children: Vec<Node>) -> Vec<Node> {
        children
            .into_iter()
            .map(|child| self.transform(child))
            .collect()
    }

    /// Merge every occurrence starting inside one sentence.
    fn merge_sentence(&mut self, span: Span, mut children: Vec<Node>) -> Vec<Node> {
        while let Some(occurrence) = self.current() {
            // Not reached yet: wait for a later sentence.
            if span.end <= occurrence.offset {
                break;
            }

            let Some(p) = children
                .iter()
                .position(|child| child.span().start == occurrence.offset)
            else {
                trace!(
                    "no child of sentence {}..{} starts at {}",
                    span.start, span.end, occurrence.offset
                );
                break;
            };

            if children[p].is_phrase() {
                debug!(
                    "dropping {:?} at {}: overlaps an existing phrase",
                    occurrence.text, occurrence.offset
                );
                self.cursor += 1;
                self.stats.dropped += 1;
                continue;
            }

            let end = occurrence.end();
            let Some(q) = children[p..]
                .iter()
                .position(|child| child.span().end == end)
                .map(|k| p + k)
            else {
                debug!(
                    "dropping {:?} at {}: no child ends at {}",
                    occurrence.text, occurrence.offset, end
                );
                self.cursor += 1;
                self.stats.dropped += 1;
                break;
            };

            let phrase_span = Span::new(children[p].span().start, children[q].span().end);
            let run: Vec<Node> = children.drain(p..=q).collect();
            trace!(
                "merging {} nodes into phrase {:?} at {}..{}",
                run.len(),
                occurrence.text,
                phrase_span.start,
                phrase_span.end
            );
            children.insert(
                p,
                Node::Phrase(PhraseNode {
                    span: phrase_span,
                    key: occurrence.text.clone(),
                    status: occurrence.status,
                    children: run,
                }),
            );

            self.cursor += 1;
            self.stats.merged += 1;
        }

        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
    use crate::status::StatusLevel;

    fn tokenize(text: &str) -> Node {
        EnglishTokenizer::new().tokenize(text).unwrap()
    }

    fn sentences(tree: &Node) -> Vec<&Node> {
        let mut out = Vec::new();
        collect_sentences(tree, &mut out);
        out
    }

    fn collect_sentences<'t>(node: &'t Node, out: &mut Vec<&'t Node>) {
        if let Node::Sentence(_) = node {
            out.push(node);
        }
        for child in node.children().unwrap_or_default() {
            collect_sentences(child, out);
        }
    }

    fn occurrence(text: &str, offset: usize) -> PhraseOccurrence {
        PhraseOccurrence::new(text, StatusLevel::Learning, offset)
    }

    #[test]
    fn test_no_occurrences_leaves_tree_unchanged() {
        let tree = tokenize("They break up. It happens.");
        let outcome = PhraseMerger::merge(tree.clone(), &[]);

        assert_eq!(outcome.tree, tree);
        assert_eq!(outcome.stats, MergeStats::default());
    }

    #[test]
    fn test_exact_run_becomes_one_phrase() {
        let tree = tokenize("Break up now");
        let before = sentences(&tree)[0].children().unwrap().len();

        let outcome = PhraseMerger::merge(tree, &[occurrence("break up", 0)]);
        let sentence = sentences(&outcome.tree)[0];
        let children = sentence.children().unwrap();

        // "Break", " ", "up" collapse into one node.
        assert_eq!(children.len(), before - 2);
        match &children[0] {
            Node::Phrase(phrase) => {
                assert_eq!(phrase.span, Span::new(0, 8));
                assert_eq!(phrase.key, "break up");
                assert_eq!(phrase.children.len(), 3);
            }
            other => panic!("expected phrase, got {other:?}"),
        }
        assert_eq!(children[2].value(), Some("now"));
        assert_eq!(outcome.stats.merged, 1);
    }

    #[test]
    fn test_misaligned_end_is_dropped_without_blocking() {
        let text = "Break up now. Then look up later.";
        // "break u" ends inside a word; "look up" is valid.
        let occurrences = vec![
            occurrence("break u", 0),
            occurrence("look up", text.find("look").unwrap()),
        ];

        let outcome = PhraseMerger::merge(tokenize(text), &occurrences);

        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(outcome.stats.merged, 1);
        assert_eq!(outcome.tree.phrase_count(), 1);
        assert_eq!(outcome.tree.to_plain_string(), text);
    }

    #[test]
    fn test_misaligned_end_stops_the_sentence() {
        let text = "Break up now and look up later";
        let occurrences = vec![occurrence("break u", 0), occurrence("look up", 17)];

        let outcome = PhraseMerger::merge(tokenize(text), &occurrences);

        assert_eq!(outcome.tree.phrase_count(), 0);
        assert_eq!(outcome.stats.dropped, 1);
        assert_eq!(outcome.stats.unmatched, 1);
    }

    #[test]
    fn test_cursor_is_global_across_sentences() {
        // Sentence A spans 0..20, sentence B starts at 21.
        let text = "We must set up camp. Later they made up and went home happily after the storm.";
        let first = text.find("set up").unwrap();
        let second = text.find("made up").unwrap();
        let occurrences = vec![occurrence("set up", first), occurrence("made up", second)];

        let outcome = PhraseMerger::merge(tokenize(text), &occurrences);
        let found = sentences(&outcome.tree);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].phrase_count(), 1);
        assert_eq!(found[1].phrase_count(), 1);
        assert_eq!(outcome.stats.merged, 2);
    }

    #[test]
    fn test_several_phrases_in_one_sentence() {
        let text = "give up and look up";
        let occurrences = vec![occurrence("give up", 0), occurrence("look up", 12)];

        let outcome = PhraseMerger::merge(tokenize(text), &occurrences);
        let children = sentences(&outcome.tree)[0].children().unwrap();

        assert_eq!(outcome.tree.phrase_count(), 2);
        let kinds: Vec<_> = children.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            vec!["phrase", "whitespace", "word", "whitespace", "phrase"]
        );
    }

    #[test]
    fn test_duplicate_occurrence_does_not_nest() {
        let occurrences = vec![occurrence("give up", 0), occurrence("give up", 0)];
        let outcome = PhraseMerger::merge(tokenize("give up now"), &occurrences);

        assert_eq!(outcome.tree.phrase_count(), 1);
        assert_eq!(outcome.stats.merged, 1);
        assert_eq!(outcome.stats.dropped, 1);
    }

    #[test]
    fn test_occurrence_starting_inside_a_phrase_stays_unmatched() {
        // "up now" starts inside the already merged "give up", so no child
        // starts at its offset.
        let occurrences = vec![occurrence("give up", 0), occurrence("up now", 5)];
        let outcome = PhraseMerger::merge(tokenize("give up now"), &occurrences);

        assert_eq!(outcome.tree.phrase_count(), 1);
        assert_eq!(outcome.stats.merged, 1);
        assert_eq!(outcome.stats.unmatched, 1);
    }

    #[test]
    fn test_unreached_occurrences_are_counted() {
        let occurrences = vec![occurrence("far away", 500)];
        let outcome = PhraseMerger::merge(tokenize("Nothing here."), &occurrences);

        assert_eq!(outcome.tree.phrase_count(), 0);
        assert_eq!(outcome.stats.unmatched, 1);
    }

    #[test]
    fn test_single_word_occurrence() {
        let outcome = PhraseMerger::merge(tokenize("hello world"), &[occurrence("world", 6)]);
        let children = sentences(&outcome.tree)[0].children().unwrap();

        assert_eq!(children.len(), 3);
        assert!(children[2].is_phrase());
    }
}

//! English prose tokenizer built on Unicode text segmentation (UAX #29).
//!
//! Paragraphs are separated by whitespace runs that contain a line break,
//! sentences follow Unicode sentence boundaries and sentence children follow
//! Unicode word boundaries.
//!
//! # Examples
//!
//! ```
//! use readmark::analysis::tokenizer::{EnglishTokenizer, Tokenizer};
//! use readmark::tree::Node;
//!
//! let tree = EnglishTokenizer::new().tokenize("One. Two.\n\nThree.").unwrap();
//! let paragraphs = tree
//!     .children()
//!     .unwrap()
//!     .iter()
//!     .filter(|n| matches!(n, Node::Paragraph(_)))
//!     .count();
//! assert_eq!(paragraphs, 2);
//! ```

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::TokenType;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;
use crate::tree::{Node, Span};

/// Whitespace runs containing a line break separate paragraphs.
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\r\n|\r|\n)\s*").expect("paragraph break pattern is valid")
});

/// A tokenizer for English prose.
#[derive(Clone, Debug, Default)]
pub struct EnglishTokenizer;

impl EnglishTokenizer {
    /// Create a new English tokenizer.
    pub fn new() -> Self {
        EnglishTokenizer
    }

    /// Split a block between paragraph breaks into optional leading
    /// whitespace, a paragraph and optional trailing whitespace.
    fn push_block(&self, text: &str, start: usize, end: usize, out: &mut Vec<Node>) {
        let block = &text[start..end];
        let content_start = start + (block.len() - block.trim_start().len());
        let content_end = start + block.trim_end().len();

        if content_start >= content_end {
            if start < end {
                out.push(Node::whitespace(Span::new(start, end), block));
            }
            return;
        }

        if start < content_start {
            out.push(Node::whitespace(
                Span::new(start, content_start),
                &text[start..content_start],
            ));
        }
        out.push(self.paragraph(text, content_start, content_end));
        if content_end < end {
            out.push(Node::whitespace(
                Span::new(content_end, end),
                &text[content_end..end],
            ));
        }
    }

    fn paragraph(&self, text: &str, start: usize, end: usize) -> Node {
        let mut children = Vec::new();

        for (index, segment) in text[start..end].split_sentence_bound_indices() {
            let seg_start = start + index;
            let trimmed = segment.trim_end();
            let seg_end = seg_start + segment.len();

            if trimmed.is_empty() {
                children.push(Node::whitespace(Span::new(seg_start, seg_end), segment));
                continue;
            }

            let sentence_end = seg_start + trimmed.len();
            children.push(self.sentence(text, seg_start, sentence_end));
            if sentence_end < seg_end {
                children.push(Node::whitespace(
                    Span::new(sentence_end, seg_end),
                    &text[sentence_end..seg_end],
                ));
            }
        }

        Node::paragraph(Span::new(start, end), children)
    }

    fn sentence(&self, text: &str, start: usize, end: usize) -> Node {
        let mut children = Vec::new();

        for (index, segment) in text[start..end].split_word_bound_indices() {
            let seg_start = start + index;
            let span = Span::new(seg_start, seg_start + segment.len());
            match TokenType::detect(segment) {
                TokenType::Whitespace => children.push(Node::whitespace(span, segment)),
                token_type if token_type.is_word() => {
                    push_word(seg_start, segment, &mut children)
                }
                _ => children.push(Node::symbol(span, segment)),
            }
        }

        Node::sentence(Span::new(start, end), children)
    }
}

/// Push a word segment, splitting leading and trailing `_` runs into symbols.
///
/// Word bounds glue underscores to letters, but in prose they are Markdown
/// emphasis markers. Inner underscores (`snake_case`) stay in the word.
fn push_word(start: usize, segment: &str, out: &mut Vec<Node>) {
    let core = segment.trim_matches('_');
    let lead = segment.len() - segment.trim_start_matches('_').len();
    let core_start = start + lead;
    let core_end = core_start + core.len();

    if lead > 0 {
        out.push(Node::symbol(Span::new(start, core_start), &segment[..lead]));
    }
    out.push(Node::word(Span::new(core_start, core_end), core));
    if core_end < start + segment.len() {
        out.push(Node::symbol(
            Span::new(core_end, start + segment.len()),
            &segment[lead + core.len()..],
        ));
    }
}

impl Tokenizer for EnglishTokenizer {
    fn tokenize(&self, text: &str) -> Result<Node> {
        let mut children = Vec::new();
        let mut cursor = 0;

        for separator in PARAGRAPH_BREAK.find_iter(text) {
            self.push_block(text, cursor, separator.start(), &mut children);
            children.push(Node::whitespace(
                Span::new(separator.start(), separator.end()),
                separator.as_str(),
            ));
            cursor = separator.end();
        }
        self.push_block(text, cursor, text.len(), &mut children);

        Ok(Node::root(Span::new(0, text.len()), children))
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

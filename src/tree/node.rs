//! Token tree node types.
//!
//! The tree produced by a [`Tokenizer`](crate::analysis::tokenizer::Tokenizer)
//! has the shape
//!
//! ```text
//! Root
//! ├── Paragraph
//! │   ├── Sentence
//! │   │   ├── Word "Break"
//! │   │   ├── Whitespace " "
//! │   │   ├── Word "up"
//! │   │   └── Symbol "."
//! │   └── Whitespace " "
//! └── Whitespace "\n\n"
//! ```
//!
//! Every node carries a byte [`Span`] into the original text. `Phrase` nodes
//! never come out of a tokenizer: they are created by the
//! [`PhraseMerger`](crate::annotate::merger::PhraseMerger) and wrap a run of
//! sentence children.

use std::ops::Range;

use crate::status::StatusLevel;

/// Byte offsets `[start, end)` into the annotated text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A container node with ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Parent {
    pub span: Span,
    pub children: Vec<Node>,
}

impl Parent {
    pub fn new(span: Span, children: Vec<Node>) -> Self {
        Parent { span, children }
    }
}

/// A leaf node holding a slice of the original text.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub span: Span,
    pub value: String,
}

impl Leaf {
    pub fn new<S: Into<String>>(span: Span, value: S) -> Self {
        Leaf {
            span,
            value: value.into(),
        }
    }
}

/// A run of sentence children merged because it matches a known phrase.
#[derive(Clone, Debug, PartialEq)]
pub struct PhraseNode {
    pub span: Span,
    /// Normalized (lowercase) phrase text the occurrence was reported under.
    pub key: String,
    /// Status of the occurrence this node was built from.
    pub status: StatusLevel,
    pub children: Vec<Node>,
}

/// A node of the token tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Root(Parent),
    Paragraph(Parent),
    Sentence(Parent),
    Phrase(PhraseNode),
    Word(Leaf),
    Symbol(Leaf),
    Whitespace(Leaf),
}

impl Node {
    pub fn root(span: Span, children: Vec<Node>) -> Self {
        Node::Root(Parent::new(span, children))
    }

    pub fn paragraph(span: Span, children: Vec<Node>) -> Self {
        Node::Paragraph(Parent::new(span, children))
    }

    pub fn sentence(span: Span, children: Vec<Node>) -> Self {
        Node::Sentence(Parent::new(span, children))
    }

    pub fn word<S: Into<String>>(span: Span, value: S) -> Self {
        Node::Word(Leaf::new(span, value))
    }

    pub fn symbol<S: Into<String>>(span: Span, value: S) -> Self {
        Node::Symbol(Leaf::new(span, value))
    }

    pub fn whitespace<S: Into<String>>(span: Span, value: S) -> Self {
        Node::Whitespace(Leaf::new(span, value))
    }

    /// The byte span of this node.
    pub fn span(&self) -> Span {
        match self {
            Node::Root(parent) | Node::Paragraph(parent) | Node::Sentence(parent) => parent.span,
            Node::Phrase(phrase) => phrase.span,
            Node::Word(leaf) | Node::Symbol(leaf) | Node::Whitespace(leaf) => leaf.span,
        }
    }

    /// Children of container nodes, `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Root(parent) | Node::Paragraph(parent) | Node::Sentence(parent) => {
                Some(&parent.children)
            }
            Node::Phrase(phrase) => Some(&phrase.children),
            Node::Word(_) | Node::Symbol(_) | Node::Whitespace(_) => None,
        }
    }

    /// Leaf text, `None` for containers.
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Word(leaf) | Node::Symbol(leaf) | Node::Whitespace(leaf) => Some(&leaf.value),
            _ => None,
        }
    }

    pub fn is_phrase(&self) -> bool {
        matches!(self, Node::Phrase(_))
    }

    /// Short name of the node kind, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Root(_) => "root",
            Node::Paragraph(_) => "paragraph",
            Node::Sentence(_) => "sentence",
            Node::Phrase(_) => "phrase",
            Node::Word(_) => "word",
            Node::Symbol(_) => "symbol",
            Node::Whitespace(_) => "whitespace",
        }
    }

    /// Concatenated text of all leaves below this node.
    pub fn to_plain_string(&self) -> String {
        let mut out = String::with_capacity(self.span().len());
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        match self.value() {
            Some(value) => out.push_str(value),
            None => {
                for child in self.children().unwrap_or_default() {
                    child.push_plain(out);
                }
            }
        }
    }

    /// Visit every word leaf in document order, including words inside phrases.
    pub fn for_each_word<F: FnMut(&Leaf)>(&self, f: &mut F) {
        match self {
            Node::Word(leaf) => f(leaf),
            Node::Symbol(_) | Node::Whitespace(_) => {}
            _ => {
                for child in self.children().unwrap_or_default() {
                    child.for_each_word(f);
                }
            }
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .unwrap_or_default()
            .iter()
            .map(Node::node_count)
            .sum::<usize>()
    }

    /// Number of phrase nodes in this subtree.
    pub fn phrase_count(&self) -> usize {
        let own = usize::from(self.is_phrase());
        own + self
            .children()
            .unwrap_or_default()
            .iter()
            .map(Node::phrase_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::root(
            Span::new(0, 9),
            vec![Node::paragraph(
                Span::new(0, 9),
                vec![Node::sentence(
                    Span::new(0, 9),
                    vec![
                        Node::word(Span::new(0, 5), "Hello"),
                        Node::whitespace(Span::new(5, 6), " "),
                        Node::word(Span::new(6, 8), "me"),
                        Node::symbol(Span::new(8, 9), "!"),
                    ],
                )],
            )],
        )
    }

    #[test]
    fn test_plain_string_concatenates_leaves() {
        assert_eq!(sample().to_plain_string(), "Hello me!");
    }

    #[test]
    fn test_for_each_word_skips_symbols_and_whitespace() {
        let mut words = Vec::new();
        sample().for_each_word(&mut |leaf| words.push(leaf.value.clone()));
        assert_eq!(words, vec!["Hello", "me"]);
    }

    #[test]
    fn test_counts() {
        let tree = sample();
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.phrase_count(), 0);
        assert_eq!(tree.span(), Span::new(0, 9));
        assert_eq!(tree.kind(), "root");
    }

    #[test]
    fn test_span_helpers() {
        let span = Span::from(3..7);
        assert_eq!(span.len(), 4);
        assert!(!span.is_empty());
        assert_eq!(span.range(), 3..7);
    }
}

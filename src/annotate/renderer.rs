//! HTML rendering of an annotated token tree.
//!
//! Each node kind maps to one fixed piece of markup:
//!
//! | node        | markup                                        |
//! |-------------|-----------------------------------------------|
//! | root        | `<div class="article">…</div>`                |
//! | paragraph   | `<p>…</p>`                                    |
//! | sentence    | `<span class="stns">…</span>`                 |
//! | phrase      | `<span class="phrase {status}">…</span>`      |
//! | word        | `<span class="word {status}">text</span>`     |
//! | numeral/CJK | `<span class="other">text</span>`             |
//! | symbol      | raw text                                      |
//! | whitespace  | raw text                                      |
//!
//! Words missing from the status map render with the `new` class.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::analysis::token::is_numeral_or_cjk;
use crate::error::{ReadmarkError, Result};
use crate::status::{OTHER_CLASS, StatusLevel, WordStatusMap, class_for};
use crate::store::PhraseOccurrence;
use crate::tree::{Leaf, Node, PhraseNode};
use crate::util::escape_html;

/// Where a phrase node takes its status from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseStatusSource {
    /// The occurrence the node was merged from.
    #[default]
    Occurrence,
    /// The first occurrence whose text equals the node's lowercased text.
    FirstTextMatch,
}

/// Configuration for the HTML renderer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Escape HTML-significant characters in leaf text.
    pub escape_text: bool,
    pub phrase_status: PhraseStatusSource,
}

impl RenderConfig {
    /// Create a new render configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable text escaping.
    pub fn escape_text(mut self, escape_text: bool) -> Self {
        self.escape_text = escape_text;
        self
    }

    /// Set the phrase status policy.
    pub fn phrase_status(mut self, phrase_status: PhraseStatusSource) -> Self {
        self.phrase_status = phrase_status;
        self
    }
}

/// Lookup data for one render call.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    pub word_status: &'a WordStatusMap,
    /// Occurrences the tree was merged from, in ascending offset order.
    pub phrases: &'a [PhraseOccurrence],
}

impl<'a> RenderContext<'a> {
    pub fn new(word_status: &'a WordStatusMap, phrases: &'a [PhraseOccurrence]) -> Self {
        RenderContext {
            word_status,
            phrases,
        }
    }
}

/// Renders token trees to HTML.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer.
    pub fn new(config: RenderConfig) -> Self {
        Renderer { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a node and its subtree.
    pub fn render(&self, node: &Node, context: &RenderContext<'_>) -> Result<String> {
        let mut out = String::with_capacity(node.span().len() * 4);
        self.render_into(node, context, &mut out)?;
        Ok(out)
    }

    /// Render a sequence of sibling nodes.
    pub fn render_nodes(&self, nodes: &[Node], context: &RenderContext<'_>) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            self.render_into(node, context, &mut out)?;
        }
        Ok(out)
    }

    fn render_into(&self, node: &Node, context: &RenderContext<'_>, out: &mut String) -> Result<()> {
        match node {
            Node::Root(parent) => {
                out.push_str("<div class=\"article\">");
                self.render_children(&parent.children, context, out)?;
                out.push_str("</div>");
            }
            Node::Paragraph(parent) => {
                out.push_str("<p>");
                self.render_children(&parent.children, context, out)?;
                out.push_str("</p>");
            }
            Node::Sentence(parent) => {
                out.push_str("<span class=\"stns\">");
                self.render_children(&parent.children, context, out)?;
                out.push_str("</span>");
            }
            Node::Phrase(phrase) => {
                let status = self.phrase_status(phrase, context)?;
                out.push_str("<span class=\"phrase ");
                out.push_str(status.class_name());
                out.push_str("\">");
                self.render_children(&phrase.children, context, out)?;
                out.push_str("</span>");
            }
            Node::Word(leaf) => self.render_word(leaf, context, out),
            Node::Symbol(leaf) | Node::Whitespace(leaf) => out.push_str(&self.text(&leaf.value)),
        }
        Ok(())
    }

    fn render_children(
        &self,
        children: &[Node],
        context: &RenderContext<'_>,
        out: &mut String,
    ) -> Result<()> {
        for child in children {
            self.render_into(child, context, out)?;
        }
        Ok(())
    }

    fn render_word(&self, leaf: &Leaf, context: &RenderContext<'_>, out: &mut String) {
        if is_numeral_or_cjk(&leaf.value) {
            out.push_str("<span class=\"");
            out.push_str(OTHER_CLASS);
        } else {
            out.push_str("<span class=\"word ");
            out.push_str(class_for(context.word_status.get(&leaf.value)));
        }
        out.push_str("\">");
        out.push_str(&self.text(&leaf.value));
        out.push_str("</span>");
    }

    fn phrase_status(
        &self,
        phrase: &PhraseNode,
        context: &RenderContext<'_>,
    ) -> Result<StatusLevel> {
        match self.config.phrase_status {
            PhraseStatusSource::Occurrence => Ok(phrase.status),
            PhraseStatusSource::FirstTextMatch => {
                let text = phrase
                    .children
                    .iter()
                    .map(Node::to_plain_string)
                    .collect::<String>()
                    .to_lowercase();
                context
                    .phrases
                    .iter()
                    .find(|occurrence| occurrence.text == text)
                    .map(|occurrence| occurrence.status)
                    .ok_or_else(|| {
                        ReadmarkError::invariant(format!(
                            "phrase {:?} at {}..{} has no matching occurrence",
                            text, phrase.span.start, phrase.span.end
                        ))
                    })
            }
        }
    }

    fn text<'t>(&self, value: &'t str) -> Cow<'t, str> {
        if self.config.escape_text {
            escape_html(value)
        } else {
            Cow::Borrowed(value)
        }
    }
}

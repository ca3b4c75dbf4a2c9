//! Markdown-like surface rewrites applied to rendered HTML.
//!
//! The renderer leaves Markdown markers in place as plain symbols. This pass
//! rewrites three of them on the final markup:
//!
//! - a paragraph holding `![alt](src)` becomes a centered image block,
//! - a sentence closing its paragraph and starting with `#`..`######` and a
//!   space becomes a heading of that level,
//! - `**x**`/`__x__` become `<b>`, `*x*`/`_x_` become `<i>` and `~~x~~`
//!   becomes `<del>`, unless the opening marker is preceded by a backslash.

use std::sync::LazyLock;

use log::trace;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::util::escape_html;

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p>.*?</p>").expect("paragraph pattern is valid"));

static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image pattern is valid"));

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"));

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="stns">(#{1,6}) (.*?)</span>(\s*</p>)"#)
        .expect("heading pattern is valid")
});

/// Emphasis rewrites in application order.
static EMPHASIS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (emphasis_pattern(r"\*\*"), "b"),
        (emphasis_pattern("__"), "b"),
        (emphasis_pattern(r"\*"), "i"),
        (emphasis_pattern("_"), "i"),
        (emphasis_pattern("~~"), "del"),
    ]
});

/// Match `marker<span…>…</span>marker` when the opening marker is not escaped.
fn emphasis_pattern(marker: &str) -> Regex {
    Regex::new(&format!(r"(^|[^\\]){marker}(<span.*?>.*?</span>){marker}"))
        .expect("emphasis pattern is valid")
}

/// Configuration for the surface post-processor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Run the post-processor at all.
    pub enabled: bool,
    pub images: bool,
    pub headings: bool,
    pub emphasis: bool,
    /// Base path for relative image sources.
    pub image_prefix: Option<String>,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        PostProcessConfig {
            enabled: true,
            images: true,
            headings: true,
            emphasis: true,
            image_prefix: None,
        }
    }
}

impl PostProcessConfig {
    /// A configuration with every rewrite turned off.
    pub fn disabled() -> Self {
        PostProcessConfig {
            enabled: false,
            ..Default::default()
        }
    }

    /// Set the base path for relative image sources.
    pub fn image_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.image_prefix = Some(prefix.into());
        self
    }
}

/// Applies the surface rewrites to rendered HTML.
#[derive(Clone, Debug, Default)]
pub struct SurfacePostProcessor {
    config: PostProcessConfig,
}

impl SurfacePostProcessor {
    pub fn new(config: PostProcessConfig) -> Self {
        SurfacePostProcessor { config }
    }

    pub fn config(&self) -> &PostProcessConfig {
        &self.config
    }

    /// Apply every enabled rewrite.
    pub fn process(&self, html: &str) -> String {
        if !self.config.enabled {
            return html.to_string();
        }

        let mut html = html.to_string();
        if self.config.images {
            html = self.rewrite_images(&html);
        }
        if self.config.headings {
            html = rewrite_headings(&html);
        }
        if self.config.emphasis {
            html = rewrite_emphasis(&html);
        }
        html
    }

    /// Replace each paragraph containing an image marker with an image block.
    pub fn rewrite_images(&self, html: &str) -> String {
        PARAGRAPH
            .replace_all(html, |caps: &Captures| {
                let paragraph = &caps[0];
                // The marker is split across word and symbol spans; match on plain text.
                let plain = TAG.replace_all(paragraph, "");
                match IMAGE.captures(&plain) {
                    Some(image) => {
                        let src = self.resolve_image_src(&image[2]);
                        trace!("rewriting image paragraph with source {src}");
                        format!(
                            "<div style=\"text-align: center;\"><img src=\"{}\" alt=\"{}\"></div>",
                            escape_html(&src),
                            escape_html(&image[1])
                        )
                    }
                    None => paragraph.to_string(),
                }
            })
            .into_owned()
    }

    /// Resolve an image source against the configured prefix.
    ///
    /// Absolute `http(s)` URLs are kept as-is, as are relative sources when
    /// no prefix is set. When the first three characters of the source start
    /// a path component of the prefix, the prefix is cut there so the shared
    /// directory is not repeated.
    pub fn resolve_image_src(&self, src: &str) -> String {
        let src = src.trim();
        let Some(prefix) = &self.config.image_prefix else {
            return src.to_string();
        };
        if is_absolute_url(src) {
            return src.to_string();
        }

        let head: String = src.chars().take(3).collect();
        match prefix.find(&head) {
            Some(index) if index > 0 && prefix[..index].ends_with('/') => {
                format!("{}{}", &prefix[..index], src)
            }
            _ => format!("{prefix}{src}"),
        }
    }
}

fn is_absolute_url(src: &str) -> bool {
    let lower = src.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Wrap a paragraph's closing sentence in `<hN>` when it starts with a `#`
/// marker, dropping the marker.
pub fn rewrite_headings(html: &str) -> String {
    HEADING
        .replace_all(html, |caps: &Captures| {
            let level = caps[1].len();
            format!(
                "<h{level}><span class=\"stns\">{}</span></h{level}>{}",
                &caps[2], &caps[3]
            )
        })
        .into_owned()
}

/// Turn emphasis markers around rendered spans into inline tags.
pub fn rewrite_emphasis(html: &str) -> String {
    let mut html = html.to_string();
    for (pattern, tag) in EMPHASIS.iter() {
        html = pattern
            .replace_all(&html, |caps: &Captures| {
                format!("{}<{tag}>{}</{tag}>", &caps[1], &caps[2])
            })
            .into_owned();
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> String {
        format!("<span class=\"word new\">{text}</span>")
    }

    #[test]
    fn test_image_paragraph_becomes_image_block() {
        let html = format!(
            "<p><span class=\"stns\">![{}]({}.{})</span></p>",
            word("cat"),
            word("cat"),
            word("png")
        );
        let processor = SurfacePostProcessor::default();

        assert_eq!(
            processor.rewrite_images(&html),
            "<div style=\"text-align: center;\"><img src=\"cat.png\" alt=\"cat\"></div>"
        );
    }

    #[test]
    fn test_image_prefix_applies_to_relative_sources() {
        let processor =
            SurfacePostProcessor::new(PostProcessConfig::default().image_prefix("/vault/books/img/"));

        assert_eq!(
            processor.resolve_image_src("img/cat.png"),
            "/vault/books/img/cat.png"
        );
        assert_eq!(
            processor.resolve_image_src("cat.png"),
            "/vault/books/img/cat.png"
        );
        assert_eq!(
            processor.resolve_image_src("https://example.com/a.png"),
            "https://example.com/a.png"
        );
        assert_eq!(
            SurfacePostProcessor::default().resolve_image_src("img/cat.png"),
            "img/cat.png"
        );
    }

    #[test]
    fn test_paragraph_without_image_is_unchanged() {
        let html = format!("<p><span class=\"stns\">{}!</span></p>", word("Wow"));
        assert_eq!(SurfacePostProcessor::default().rewrite_images(&html), html);
    }

    #[test]
    fn test_heading_levels() {
        let html = format!("<p><span class=\"stns\">## {}</span></p>", word("Title"));
        assert_eq!(
            rewrite_headings(&html),
            format!("<p><h2><span class=\"stns\">{}</span></h2></p>", word("Title"))
        );

        let not_heading = format!("<p><span class=\"stns\">#{}</span></p>", word("tag"));
        assert_eq!(rewrite_headings(&not_heading), not_heading);
    }

    #[test]
    fn test_emphasis() {
        let bold = format!("a **{}** b", word("bold"));
        assert_eq!(
            rewrite_emphasis(&bold),
            format!("a <b>{}</b> b", word("bold"))
        );

        let italic = format!("a _{}_ b", word("it"));
        assert_eq!(
            rewrite_emphasis(&italic),
            format!("a <i>{}</i> b", word("it"))
        );

        let strike = format!("~~{}~~", word("gone"));
        assert_eq!(
            rewrite_emphasis(&strike),
            format!("<del>{}</del>", word("gone"))
        );
    }

    #[test]
    fn test_escaped_marker_is_left_alone() {
        let html = format!("a \\*{}* b", word("literal"));
        assert_eq!(rewrite_emphasis(&html), html);
    }

    #[test]
    fn test_disabled_processor_is_identity() {
        let html = format!("<p><span class=\"stns\"># {}</span></p>", word("Title"));
        let processor = SurfacePostProcessor::new(PostProcessConfig::disabled());
        assert_eq!(processor.process(&html), html);
    }
}

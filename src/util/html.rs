//! Small HTML helpers shared by the renderer and the post-processor.

use std::borrow::Cow;

/// Escape the characters that are significant in HTML text and attributes.
///
/// Returns the input unchanged (and unallocated) when nothing needs escaping.
pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    Cow::Owned(
        input
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}

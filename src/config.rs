//! Configuration for the annotation engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotate::renderer::RenderConfig;
use crate::error::{ReadmarkError, Result};
use crate::postprocess::PostProcessConfig;

/// Configuration for an [`Annotator`](crate::engine::Annotator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Trim surrounding whitespace before annotating in `parse`.
    pub trim_input: bool,
    /// Renderer configuration.
    pub render: RenderConfig,
    /// Post-processor configuration.
    pub post_process: PostProcessConfig,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            trim_input: true,
            render: RenderConfig::default(),
            post_process: PostProcessConfig::default(),
        }
    }
}

impl AnnotatorConfig {
    /// Create a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim_input(mut self, trim_input: bool) -> Self {
        self.trim_input = trim_input;
        self
    }

    pub fn render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn post_process(mut self, post_process: PostProcessConfig) -> Self {
        self.post_process = post_process;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ReadmarkError::config(format!("invalid annotator config: {e}")))
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::renderer::PhraseStatusSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_annotator_config_default() {
        let config = AnnotatorConfig::default();
        assert!(config.trim_input);
        assert!(!config.render.escape_text);
        assert_eq!(config.render.phrase_status, PhraseStatusSource::Occurrence);
        assert!(config.post_process.enabled);
        assert!(config.post_process.image_prefix.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnnotatorConfig::from_json_str(
            r#"{"render": {"phrase_status": "first_text_match"}, "post_process": {"emphasis": false}}"#,
        )
        .unwrap();

        assert!(config.trim_input);
        assert_eq!(config.render.phrase_status, PhraseStatusSource::FirstTextMatch);
        assert!(!config.post_process.emphasis);
        assert!(config.post_process.headings);
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let err = AnnotatorConfig::from_json_str(r#"{"trim_input": "yes"}"#).unwrap_err();
        assert!(matches!(err, ReadmarkError::Config(_)));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"trim_input": false, "render": {{"escape_text": true}}}}"#).unwrap();

        let config = AnnotatorConfig::from_json_file(file.path()).unwrap();
        assert!(!config.trim_input);
        assert!(config.render.escape_text);
    }
}

use serde::Serialize;
use studynotes_core::SourceFormat;

/// Average reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Immutable study material handed over by the extraction layer.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    source: SourceFormat,
    name: Option<String>,
}

/// Size statistics shown before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub characters: usize,
    pub words: usize,
    pub reading_minutes: usize,
}

impl Document {
    pub fn new(text: impl Into<String>, source: SourceFormat) -> Self {
        Self {
            text: text.into(),
            source,
            name: None,
        }
    }

    /// Build from raw file bytes. The declared format is taken from the
    /// filename extension; bytes are decoded as UTF-8 with lossy fallback.
    pub fn from_bytes(bytes: &[u8], filename: &str) -> Self {
        let text = String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());
        Self {
            text: text.trim().to_string(),
            source: SourceFormat::from_filename(filename),
            name: Some(filename.to_string()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the declared source format.
    pub fn with_source(mut self, source: SourceFormat) -> Self {
        self.source = source;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> SourceFormat {
        self.source
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when there is no usable text (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn stats(&self) -> DocumentStats {
        let words = self.text.split_whitespace().count();
        DocumentStats {
            characters: self.text.chars().count(),
            words,
            reading_minutes: words / WORDS_PER_MINUTE,
        }
    }
}

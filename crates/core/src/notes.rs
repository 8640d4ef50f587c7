use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::NotesError;

// ── Detail level ──────────────────────────────────────────────

/// User-facing 1–5 knob controlling how much output the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DetailLevel(u8);

impl DetailLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const DEFAULT: DetailLevel = DetailLevel(3);

    pub fn new(level: i64) -> Result<Self, NotesError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(NotesError::InvalidDetailLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every valid level, lowest first.
    pub fn all() -> impl Iterator<Item = DetailLevel> {
        (Self::MIN..=Self::MAX).map(DetailLevel)
    }
}

impl Default for DetailLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for DetailLevel {
    type Error = NotesError;

    fn try_from(level: i64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<DetailLevel> for i64 {
    fn from(level: DetailLevel) -> Self {
        level.0 as i64
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

// ── Length profile ────────────────────────────────────────────

/// Output length bounds handed to the summarization engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthProfile {
    pub min_output_tokens: u32,
    pub max_output_tokens: u32,
    /// Target output/input size ratio.
    pub compression_ratio: f32,
}

// ── Note formats ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteFormat {
    Summary,
    BulletPoints,
    Flashcards,
    #[serde(rename = "qanda")]
    QandA,
    ConceptMap,
}

impl NoteFormat {
    pub const ALL: [NoteFormat; 5] = [
        NoteFormat::Summary,
        NoteFormat::BulletPoints,
        NoteFormat::Flashcards,
        NoteFormat::QandA,
        NoteFormat::ConceptMap,
    ];

    /// Human-readable title used in headers and exports.
    pub fn title(self) -> &'static str {
        match self {
            NoteFormat::Summary => "Comprehensive Summary",
            NoteFormat::BulletPoints => "Bullet Points",
            NoteFormat::Flashcards => "Flashcards",
            NoteFormat::QandA => "Q&A Format",
            NoteFormat::ConceptMap => "Concept Map",
        }
    }

    /// Stable machine name (matches the serde representation).
    pub fn as_str(self) -> &'static str {
        match self {
            NoteFormat::Summary => "summary",
            NoteFormat::BulletPoints => "bullet-points",
            NoteFormat::Flashcards => "flashcards",
            NoteFormat::QandA => "qanda",
            NoteFormat::ConceptMap => "concept-map",
        }
    }
}

impl fmt::Display for NoteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for NoteFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "summary" | "comprehensive-summary" => Ok(NoteFormat::Summary),
            "bullet-points" | "bullets" => Ok(NoteFormat::BulletPoints),
            "flashcards" | "cards" => Ok(NoteFormat::Flashcards),
            "qanda" | "q&a" | "qa" | "q&a-format" => Ok(NoteFormat::QandA),
            "concept-map" | "conceptmap" => Ok(NoteFormat::ConceptMap),
            other => Err(format!("unknown note format: '{other}'")),
        }
    }
}

// ── Source format ─────────────────────────────────────────────

/// Declared origin of the input text. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Docx,
    Txt,
    Markdown,
    Pasted,
}

impl SourceFormat {
    /// Guess the declared format from a filename extension.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "pdf" => SourceFormat::Pdf,
            "docx" => SourceFormat::Docx,
            "md" | "markdown" => SourceFormat::Markdown,
            _ => SourceFormat::Txt,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Docx => "docx",
            SourceFormat::Txt => "txt",
            SourceFormat::Markdown => "md",
            SourceFormat::Pasted => "pasted",
        };
        f.write_str(name)
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "docx" => Ok(SourceFormat::Docx),
            "txt" | "text" => Ok(SourceFormat::Txt),
            "md" | "markdown" => Ok(SourceFormat::Markdown),
            "pasted" | "paste" | "stdin" => Ok(SourceFormat::Pasted),
            other => Err(format!("unknown source format: '{other}'")),
        }
    }
}

// ── Study artifact ────────────────────────────────────────────

/// Final rendered notes for one format, ready for display or export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyArtifact {
    pub id: Uuid,
    pub format: NoteFormat,
    pub detail: DetailLevel,
    pub content: String,
    /// True when at least one chunk fell back to raw text.
    pub degraded: bool,
    pub generated_at: DateTime<Utc>,
}

impl StudyArtifact {
    pub fn new(format: NoteFormat, detail: DetailLevel, content: String, degraded: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            format,
            detail,
            content,
            degraded,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_level_bounds() {
        assert!(DetailLevel::new(1).is_ok());
        assert!(DetailLevel::new(5).is_ok());
        assert_eq!(DetailLevel::new(0), Err(NotesError::InvalidDetailLevel(0)));
        assert_eq!(DetailLevel::new(7), Err(NotesError::InvalidDetailLevel(7)));
        assert_eq!(DetailLevel::new(-2), Err(NotesError::InvalidDetailLevel(-2)));
    }

    #[test]
    fn detail_level_default_is_balanced() {
        assert_eq!(DetailLevel::default().get(), 3);
        assert_eq!(DetailLevel::all().count(), 5);
    }

    #[test]
    fn detail_level_serde_rejects_out_of_range() {
        let ok: DetailLevel = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<DetailLevel>("9").is_err());
    }

    #[test]
    fn note_format_parses_aliases() {
        assert_eq!("summary".parse::<NoteFormat>(), Ok(NoteFormat::Summary));
        assert_eq!("Bullet Points".parse::<NoteFormat>(), Ok(NoteFormat::BulletPoints));
        assert_eq!("q&a".parse::<NoteFormat>(), Ok(NoteFormat::QandA));
        assert_eq!("concept_map".parse::<NoteFormat>(), Ok(NoteFormat::ConceptMap));
        assert!("mindmap".parse::<NoteFormat>().is_err());
    }

    #[test]
    fn note_format_round_trips_machine_name() {
        for format in NoteFormat::ALL {
            assert_eq!(format.as_str().parse::<NoteFormat>(), Ok(format));
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.as_str()));
        }
    }

    #[test]
    fn source_format_from_filename() {
        assert_eq!(SourceFormat::from_filename("notes.PDF"), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_filename("ch1.docx"), SourceFormat::Docx);
        assert_eq!(SourceFormat::from_filename("readme.md"), SourceFormat::Markdown);
        assert_eq!(SourceFormat::from_filename("plain"), SourceFormat::Txt);
    }
}

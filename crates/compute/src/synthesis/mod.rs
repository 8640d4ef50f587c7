//! Format synthesizer -- turns the synthesized text into study notes.
//!
//! One module per note format:
//! - `summary`: topic sections under inferred headers
//! - `bullets`: ranked key points in narrative order
//! - `flashcards`: question/answer cards from definitional sentences
//! - `qanda`: sectioned question/answer pairs
//! - `concept_map`: weighted terms linked by co-occurrence
//!
//! Rendering is pure and deterministic.

pub mod bullets;
pub mod concept_map;
pub mod flashcards;
pub mod qanda;
pub mod summary;
pub mod text;

use studynotes_core::{DetailLevel, NoteFormat, NotesError};

use crate::orchestrator::ChunkSummary;

pub use concept_map::{ConceptEdge, ConceptMap, ConceptNode};

/// Render `text` as `format` at the given detail level.
///
/// Fails with `EmptyInput` when `text` is blank.
pub fn render(
    format: NoteFormat,
    text: &str,
    chunk_summaries: &[ChunkSummary],
    detail: DetailLevel,
) -> Result<String, NotesError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotesError::EmptyInput);
    }

    Ok(match format {
        NoteFormat::Summary => summary::render(text),
        NoteFormat::BulletPoints => bullets::render(text, detail),
        NoteFormat::Flashcards => {
            // A single summary repeats the text itself.
            let extra: Vec<&str> = if chunk_summaries.len() > 1 {
                chunk_summaries.iter().map(|s| s.text.as_str()).collect()
            } else {
                Vec::new()
            };
            flashcards::render(text, &extra, detail)
        }
        NoteFormat::QandA => qanda::render(text, detail),
        NoteFormat::ConceptMap => concept_map::render(text, detail),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Photosynthesis is how plants make food. \
        Chlorophyll absorbs light in the leaves. \
        Plants release oxygen as a byproduct.";

    #[test]
    fn blank_text_is_empty_input() {
        for format in NoteFormat::ALL {
            let err = render(format, "  \n\t ", &[], DetailLevel::default()).unwrap_err();
            assert_eq!(err, NotesError::EmptyInput);
        }
    }

    #[test]
    fn every_format_renders_non_empty() {
        for format in NoteFormat::ALL {
            let out = render(format, TEXT, &[], DetailLevel::default()).unwrap();
            assert!(!out.trim().is_empty(), "{format:?} rendered nothing");
        }
    }

    #[test]
    fn terse_text_never_renders_empty() {
        for format in NoteFormat::ALL {
            for level in DetailLevel::all() {
                let out = render(format, "It is so.", &[], level).unwrap();
                assert!(!out.trim().is_empty(), "{format:?} rendered nothing");
                assert!(out.contains("It is so") || out.contains("no key terms"));
            }
        }
    }

    #[test]
    fn every_format_is_deterministic() {
        for format in NoteFormat::ALL {
            for level in DetailLevel::all() {
                assert_eq!(
                    render(format, TEXT, &[], level).unwrap(),
                    render(format, TEXT, &[], level).unwrap()
                );
            }
        }
    }
}

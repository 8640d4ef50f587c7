use studynotes_core::StudyArtifact;

const BANNER_WIDTH: usize = 60;

/// Banner-framed plain-text rendering of one artifact.
pub fn format_artifact(artifact: &StudyArtifact) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    let mut meta = format!(
        "Detail level: {} | Generated: {}",
        artifact.detail,
        artifact.generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    if artifact.degraded {
        meta.push_str(" | degraded: some parts fell back to source text");
    }
    format!(
        "{rule}\n{}\n{meta}\n{rule}\n\n{}\n",
        artifact.format.title().to_uppercase(),
        artifact.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use studynotes_core::{DetailLevel, NoteFormat};

    #[test]
    fn banner_carries_title_level_and_marker() {
        let artifact = StudyArtifact::new(
            NoteFormat::Flashcards,
            DetailLevel::default(),
            "--- Card 1 ---".into(),
            true,
        );
        let out = format_artifact(&artifact);
        assert!(out.starts_with(&"=".repeat(BANNER_WIDTH)));
        assert!(out.contains("FLASHCARDS"));
        assert!(out.contains("Detail level: 3/5"));
        assert!(out.contains("degraded"));
        assert!(out.ends_with("--- Card 1 ---\n"));
    }
}

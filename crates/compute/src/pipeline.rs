use std::sync::Arc;

use studynotes_core::config::{ChunkingConfig, PipelineConfig};
use studynotes_core::{Config, DetailLevel, NoteFormat, NotesError, StudyArtifact};
use studynotes_ingest::{chunk, Chunk, Document, TokenCounter};
use studynotes_llm::SummarizationEngine;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::detail::profile_for;
use crate::orchestrator::{Orchestrator, Synthesis};
use crate::synthesis::render;

/// End-to-end study-notes generation: validate, chunk, synthesize, render.
pub struct StudyNotesPipeline {
    engine: Arc<dyn SummarizationEngine>,
    counter: Arc<dyn TokenCounter>,
    chunking: ChunkingConfig,
    settings: PipelineConfig,
}

impl StudyNotesPipeline {
    pub fn new(engine: Arc<dyn SummarizationEngine>, counter: Arc<dyn TokenCounter>) -> Self {
        Self {
            engine,
            counter,
            chunking: ChunkingConfig::default(),
            settings: PipelineConfig::default(),
        }
    }

    pub fn from_config(
        engine: Arc<dyn SummarizationEngine>,
        counter: Arc<dyn TokenCounter>,
        config: &Config,
    ) -> Self {
        Self::new(engine, counter)
            .with_chunking(config.chunking.clone())
            .with_settings(config.pipeline.clone())
    }

    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_settings(mut self, settings: PipelineConfig) -> Self {
        self.settings = settings;
        self
    }

    /// Generate one artifact.
    pub async fn generate(
        &self,
        document: &Document,
        format: NoteFormat,
        level: i64,
        cancel: CancellationToken,
    ) -> Result<StudyArtifact, NotesError> {
        let mut artifacts = self.generate_all(document, &[format], level, cancel).await?;
        artifacts.pop().ok_or(NotesError::EmptyInput)
    }

    /// Synthesize once and render every requested format.
    pub async fn generate_all(
        &self,
        document: &Document,
        formats: &[NoteFormat],
        level: i64,
        cancel: CancellationToken,
    ) -> Result<Vec<StudyArtifact>, NotesError> {
        let detail = DetailLevel::new(level)?;
        let synthesis = self.synthesize(document, detail, cancel).await?;
        let degraded = synthesis.is_degraded();

        formats
            .iter()
            .map(|&format| {
                let content = render(format, &synthesis.text, &synthesis.chunk_summaries, detail)?;
                info!(format = format.as_str(), chars = content.len(), "rendered notes");
                Ok(StudyArtifact::new(format, detail, content, degraded))
            })
            .collect()
    }

    /// Chunk the document and fold it into one synthesized text.
    pub async fn synthesize(
        &self,
        document: &Document,
        detail: DetailLevel,
        cancel: CancellationToken,
    ) -> Result<Synthesis, NotesError> {
        if document.is_blank() {
            return Err(NotesError::EmptyInput);
        }

        let chunks: Vec<Chunk> =
            chunk(document.text(), &self.chunking, self.counter.as_ref())?.collect();
        let stats = document.stats();
        info!(
            document = document.name().unwrap_or("-"),
            source = %document.source(),
            words = stats.words,
            chunks = chunks.len(),
            detail = %detail,
            "generating study notes"
        );

        let orchestrator = Orchestrator::new(
            self.engine.clone(),
            self.counter.clone(),
            self.chunking.clone(),
        )
        .with_settings(&self.settings)
        .with_cancellation(cancel);

        orchestrator.synthesize(chunks, &profile_for(detail)).await
    }
}

//! Chunk orchestrator -- hierarchical map/reduce over the summarization engine.
//!
//! Split into focused submodules:
//! - `types`: ChunkSummary and Synthesis results
//! - `execution`: map step, recursive reduction, retry-then-degrade policy

mod execution;
mod types;

use std::sync::Arc;

use studynotes_core::config::{ChunkingConfig, PipelineConfig};
use studynotes_ingest::TokenCounter;
use studynotes_llm::SummarizationEngine;
use tokio_util::sync::CancellationToken;

pub use types::{ChunkSummary, Synthesis};

/// Drives the engine over a document's chunks and folds the results into
/// one synthesized text.
///
/// The engine, token counter and chunk budget are fixed at construction.
/// Engine failures never escape: each call is retried once with tighter
/// bounds and then replaced by truncated source text.
pub struct Orchestrator {
    engine: Arc<dyn SummarizationEngine>,
    counter: Arc<dyn TokenCounter>,
    chunking: ChunkingConfig,
    concurrency: usize,
    max_reduction_rounds: usize,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        engine: Arc<dyn SummarizationEngine>,
        counter: Arc<dyn TokenCounter>,
        chunking: ChunkingConfig,
    ) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            engine,
            counter,
            chunking,
            concurrency: defaults.concurrency,
            max_reduction_rounds: defaults.max_reduction_rounds,
            cancel: CancellationToken::new(),
        }
    }

    /// Apply concurrency and reduction limits from pipeline settings.
    pub fn with_settings(mut self, settings: &PipelineConfig) -> Self {
        self.concurrency = settings.concurrency.max(1);
        self.max_reduction_rounds = settings.max_reduction_rounds;
        self
    }

    /// Maximum engine calls in flight during a map step.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token budget of one engine input.
    pub fn input_budget(&self) -> usize {
        self.chunking.max_input_tokens
    }
}

use serde::Serialize;

/// Summary of one chunk, tagged with the chunk's position in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub index: usize,
    pub text: String,
    /// The engine failed twice and the text is the truncated chunk itself.
    pub degraded: bool,
}

/// Result of the map/reduce pass over a document.
#[derive(Debug, Clone, Serialize)]
pub struct Synthesis {
    /// The single text handed to the format renderers.
    pub text: String,
    /// First-level summaries in document order.
    pub chunk_summaries: Vec<ChunkSummary>,
    /// Engine calls issued, retries included.
    pub engine_calls: usize,
    /// Re-chunk passes needed before the final reduction fit the budget.
    pub reduction_rounds: usize,
    /// Summaries (map or reduce) that fell back to raw text.
    pub degraded_summaries: usize,
}

impl Synthesis {
    pub fn is_degraded(&self) -> bool {
        self.degraded_summaries > 0
    }
}

/// Outcome of one engine call with its retry, before it is placed in order.
#[derive(Debug)]
pub(crate) struct Attempted {
    pub summary: ChunkSummary,
    pub calls: usize,
}

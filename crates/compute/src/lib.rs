pub mod detail;
pub mod orchestrator;
pub mod pipeline;
pub mod synthesis;

pub use detail::{map_level, per_chunk, profile_for, reduced};
pub use orchestrator::{ChunkSummary, Orchestrator, Synthesis};
pub use pipeline::StudyNotesPipeline;
pub use synthesis::render;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotesError {
    #[error("Invalid detail level: {0} (expected 1-5)")]
    InvalidDetailLevel(i64),

    #[error("No usable text in input")]
    EmptyInput,

    #[error("Chunking failed: {0}")]
    ChunkingFailure(String),

    #[error("Pipeline cancelled")]
    Cancelled,
}

use std::time::Duration;

use async_trait::async_trait;

use crate::provider::LlmError;

/// A bounded-context text summarizer.
///
/// Treated as a pure, possibly slow, possibly failing function: the same
/// input and bounds should give the same summary for deterministic backends.
#[async_trait]
pub trait SummarizationEngine: Send + Sync {
    /// Condense `text` to roughly `min_len..=max_len` output tokens.
    async fn summarize(&self, text: &str, min_len: u32, max_len: u32)
        -> Result<String, EngineError>;

    /// Short engine name for logs.
    fn name(&self) -> &str {
        "engine"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine call timed out after {0:?}")]
    Timeout(Duration),
    #[error("engine ran out of memory")]
    OutOfMemory,
    #[error("input too long for engine: {0}")]
    InputTooLong(String),
    #[error("engine returned empty output")]
    EmptyOutput,
    #[error("engine backend failed: {0}")]
    Backend(String),
}

impl From<LlmError> for EngineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::ApiError { status: 413, body } => EngineError::InputTooLong(body),
            LlmError::ApiError { body, .. }
                if body.contains("context length") || body.contains("maximum context") =>
            {
                EngineError::InputTooLong(body)
            }
            LlmError::ApiError { body, .. } if body.contains("out of memory") => {
                EngineError::OutOfMemory
            }
            LlmError::HttpError(e) if e.is_timeout() => EngineError::Timeout(Duration::ZERO),
            other => EngineError::Backend(other.to_string()),
        }
    }
}

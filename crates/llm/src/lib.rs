pub mod engine;
pub mod provider;
pub mod providers;
pub mod summarizer;

pub use engine::{EngineError, SummarizationEngine};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use summarizer::ChatSummarizer;

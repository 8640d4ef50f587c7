use std::time::Duration;

use async_trait::async_trait;
use studynotes_core::config::EngineConfig;
use tracing::debug;

use crate::engine::{EngineError, SummarizationEngine};
use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are a summarization model for study material. Condense the text the user \
provides into plain prose.

Rules:
- Keep only facts stated in the text. Do not add outside knowledge.
- Preserve key terms, names, numbers and definitions verbatim.
- Write complete declarative sentences. No headings, lists or markdown.
- Respond with the summary only, without any preamble.";

/// Prefixes some chat models put in front of the answer.
const PREAMBLES: &[&str] = &["summary:", "here is the summary:", "here's the summary:"];

/// Output token headroom over the requested word budget.
const TOKENS_PER_WORD: f32 = 1.5;

/// Summarization engine backed by a chat-completion provider.
pub struct ChatSummarizer {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    timeout: Option<Duration>,
}

impl ChatSummarizer {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
            timeout: None,
        }
    }

    /// Abort calls that take longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(engine: &EngineConfig) -> Result<Self, LlmError> {
        let provider = create_provider(engine)?;
        let summarizer = Self::new(provider, engine.temperature);
        Ok(match engine.timeout_secs {
            0 => summarizer,
            secs => summarizer.with_timeout(Duration::from_secs(secs)),
        })
    }

    fn build_messages(text: &str, min_len: u32, max_len: u32) -> Vec<Message> {
        let user = format!(
            "Summarize the following text in {min_len} to {max_len} words.\n\n---\n{text}\n---"
        );
        vec![Message::system(SUMMARY_SYSTEM_PROMPT), Message::user(user)]
    }
}

#[async_trait]
impl SummarizationEngine for ChatSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_len: u32,
        max_len: u32,
    ) -> Result<String, EngineError> {
        let messages = Self::build_messages(text, min_len, max_len);
        let max_tokens = (max_len as f32 * TOKENS_PER_WORD).ceil() as u32;

        debug!(
            provider = self.provider.name(),
            input_chars = text.len(),
            min_len,
            max_len,
            "summarizing"
        );

        let call = self.provider.complete(messages, self.temperature, max_tokens);
        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| EngineError::Timeout(limit))??,
            None => call.await?,
        };

        clean_output(&raw).ok_or(EngineError::EmptyOutput)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

/// Trim whitespace and a leading "Summary:"-style preamble.
/// Returns `None` when nothing usable is left.
fn clean_output(raw: &str) -> Option<String> {
    let mut text = raw.trim();
    let lowered = text.to_lowercase();
    for preamble in PREAMBLES {
        if lowered.starts_with(preamble) {
            text = text.get(preamble.len()..).unwrap_or("").trim_start();
            break;
        }
    }
    (!text.is_empty()).then(|| text.to_string())
}

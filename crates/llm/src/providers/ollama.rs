use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::wire::{chat_messages, post_json, text_at};
use crate::provider::{LlmError, LlmProvider, Message};

/// Local Ollama server via `/api/chat`, non-streaming.
pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn request_body(&self, messages: &[Message], temperature: f32, max_tokens: u32) -> Value {
        json!({
            "model": self.model,
            "messages": chat_messages(messages),
            "stream": false,
            "options": {
                "temperature": temperature,
                "num_predict": max_tokens,
            },
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.url);
        debug!(model = %self.model, %url, max_tokens, "summarization request");

        let body = self.request_body(&messages, temperature, max_tokens);
        let reply = post_json(self.name(), self.client.post(&url), &body).await?;
        text_at(&reply, "/message/content")
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

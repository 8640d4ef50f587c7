use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::wire::{chat_messages, post_json, text_at};
use crate::provider::{LlmError, LlmProvider, Message};

/// Any OpenAI-compatible `/v1/chat/completions` endpoint.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_body(&self, messages: &[Message], temperature: f32, max_tokens: u32) -> Value {
        json!({
            "model": self.model,
            "messages": chat_messages(messages),
            "temperature": temperature,
            "max_tokens": max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %self.model, %url, max_tokens, "summarization request");

        let request = self.client.post(&url).bearer_auth(&self.api_key);
        let body = self.request_body(&messages, temperature, max_tokens);
        let reply = post_json(self.name(), request, &body).await?;
        text_at(&reply, "/choices/0/message/content")
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_caps_completion_length() {
        let provider = OpenAiProvider::new("k".into(), "gpt-4o-mini".into(), "http://local/".into());
        let body = provider.request_body(&[Message::user("text")], 0.2, 190);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 190);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(provider.base_url, "http://local");
    }
}

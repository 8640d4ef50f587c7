use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::wire::{chat_messages, post_json, text_at};
use crate::provider::{LlmError, LlmProvider, Message, Role};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct ClaudeProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl ClaudeProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    /// The Messages API takes system prompts as a top-level field.
    fn request_body(&self, messages: &[Message], temperature: f32, max_tokens: u32) -> Value {
        let (system, turns): (Vec<&Message>, Vec<&Message>) =
            messages.iter().partition(|m| m.role == Role::System);

        let mut body = json!({
            "model": self.model,
            "messages": chat_messages(turns),
            "temperature": temperature,
            "max_tokens": max_tokens,
        });
        if !system.is_empty() {
            let joined = system
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            body["system"] = json!(joined);
        }
        body
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        debug!(model = %self.model, max_tokens, "summarization request");

        let request = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION);
        let body = self.request_body(&messages, temperature, max_tokens);
        let reply = post_json(self.name(), request, &body).await?;
        text_at(&reply, "/content/0/text")
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompts_are_hoisted() {
        let provider = ClaudeProvider::new("k".into(), "claude-model".into());
        let body = provider.request_body(
            &[Message::system("Summarize."), Message::system("Be brief."), Message::user("text")],
            0.2,
            250,
        );
        assert_eq!(body["system"], "Summarize.\n\nBe brief.");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["max_tokens"], 250);
    }

    #[test]
    fn no_system_field_without_system_prompt() {
        let provider = ClaudeProvider::new("k".into(), "claude-model".into());
        let body = provider.request_body(&[Message::user("text")], 0.2, 45);
        assert!(body.get("system").is_none());
    }
}

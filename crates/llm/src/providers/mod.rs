pub mod claude;
pub mod ollama;
pub mod openai;
mod wire;

use studynotes_core::config::EngineConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the chat provider selected by `engine.provider`.
pub fn create_provider(engine: &EngineConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    match engine.provider.as_str() {
        "openai" => {
            let api_key = engine
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = engine
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                engine.openai_model.clone(),
                base_url.to_string(),
            )))
        }
        "anthropic" | "claude" => {
            let api_key = engine
                .anthropic_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("ANTHROPIC_API_KEY not set".into()))?;
            Ok(Box::new(claude::ClaudeProvider::new(
                api_key.clone(),
                engine.anthropic_model.clone(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            engine.ollama_url.clone(),
            engine.ollama_model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub engine: EngineConfig,
    pub chunking: ChunkingConfig,
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `STUDYNOTES_PROFILE`. When set (e.g. `LOCAL`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("STUDYNOTES_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            engine: EngineConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            pipeline: PipelineConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  engine:    provider={}, model={}, configured={}",
            self.engine.provider,
            self.engine.active_model(),
            self.engine.is_configured()
        );
        tracing::info!(
            "  chunking:  max_input_tokens={}, overlap_tokens={}",
            self.chunking.max_input_tokens,
            self.chunking.overlap_tokens
        );
        tracing::info!(
            "  pipeline:  concurrency={}, max_reduction_rounds={}, default_detail={}",
            self.pipeline.concurrency,
            self.pipeline.max_reduction_rounds,
            self.pipeline.default_detail_level
        );
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "engine": {
                "provider": self.engine.provider,
                "model": self.engine.active_model(),
                "configured": self.engine.is_configured(),
                "timeout_secs": self.engine.timeout_secs,
            },
            "chunking": {
                "max_input_tokens": self.chunking.max_input_tokens,
                "overlap_tokens": self.chunking.overlap_tokens,
            },
            "pipeline": {
                "concurrency": self.pipeline.concurrency,
                "max_reduction_rounds": self.pipeline.max_reduction_rounds,
                "default_detail_level": self.pipeline.default_detail_level,
            },
        })
    }
}

// ── Summarization engine (Ollama / OpenAI / Anthropic) ───────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// "ollama", "openai", "anthropic"
    pub provider: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub temperature: f32,
    /// Per-call timeout; 0 disables it.
    pub timeout_secs: u64,
}

impl EngineConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "ollama"),
            ollama_url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            ollama_model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.0),
            timeout_secs: profiled_env_parse(p, "ENGINE_TIMEOUT_SECS", 120),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }

    /// Model name for the selected provider.
    pub fn active_model(&self) -> &str {
        match self.provider.as_str() {
            "openai" => &self.openai_model,
            "anthropic" | "claude" => &self.anthropic_model,
            _ => &self.ollama_model,
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Engine input budget per call, in estimated tokens.
    pub max_input_tokens: usize,
    /// Trailing context carried into the next chunk.
    pub overlap_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_input_tokens: 400,
            overlap_tokens: 40,
        }
    }
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            max_input_tokens: profiled_env_parse(p, "MAX_INPUT_TOKENS", defaults.max_input_tokens),
            overlap_tokens: profiled_env_parse(p, "OVERLAP_TOKENS", defaults.overlap_tokens),
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum engine calls in flight during the map step.
    pub concurrency: usize,
    /// Upper bound on re-chunk/re-summarize rounds before hard truncation.
    pub max_reduction_rounds: usize,
    pub default_detail_level: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_reduction_rounds: 8,
            default_detail_level: 3,
        }
    }
}

impl PipelineConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            concurrency: profiled_env_parse(p, "SUMMARY_CONCURRENCY", defaults.concurrency).max(1),
            max_reduction_rounds: profiled_env_parse(
                p,
                "MAX_REDUCTION_ROUNDS",
                defaults.max_reduction_rounds,
            ),
            default_detail_level: profiled_env_parse(
                p,
                "DEFAULT_DETAIL_LEVEL",
                defaults.default_detail_level,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_window() {
        let chunking = ChunkingConfig::default();
        assert_eq!(chunking.max_input_tokens, 400);
        assert!(chunking.overlap_tokens < chunking.max_input_tokens);

        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.default_detail_level, 3);
        assert!(pipeline.concurrency >= 1);
    }

    #[test]
    fn profiled_lookup_prefers_prefixed_key() {
        // Unique key names so parallel tests don't interfere.
        env::set_var("STUDYNOTES_TEST_CFG_A", "base");
        env::set_var("ZZTEST_STUDYNOTES_TEST_CFG_A", "profiled");
        assert_eq!(
            profiled_env_opt("ZZTEST", "STUDYNOTES_TEST_CFG_A").as_deref(),
            Some("profiled")
        );
        assert_eq!(
            profiled_env_opt("", "STUDYNOTES_TEST_CFG_A").as_deref(),
            Some("base")
        );
        assert_eq!(profiled_env_opt("ZZTEST", "STUDYNOTES_TEST_CFG_MISSING"), None);
    }

    #[test]
    fn engine_configured_per_provider() {
        let mut engine = EngineConfig::from_env_profiled("ZZNOPROFILE");
        engine.provider = "ollama".into();
        assert!(engine.is_configured());
        engine.provider = "openai".into();
        engine.openai_api_key = None;
        assert!(!engine.is_configured());
        engine.provider = "bogus".into();
        assert!(!engine.is_configured());
    }

    #[test]
    fn redacted_summary_has_no_secrets() {
        let mut config = Config::for_profile("ZZNOPROFILE");
        config.engine.openai_api_key = Some("sk-secret".into());
        let summary = config.redacted_summary().to_string();
        assert!(!summary.contains("sk-secret"));
        assert!(summary.contains("max_input_tokens"));
    }
}

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::GenerationConfig;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
/// Startup fails if the API credential is missing.
#[derive(Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub anthropic_model: String,
    pub anthropic_max_tokens: u32,
    pub anthropic_api_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

// The API key never goes through Debug.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("anthropic_api_key", &"<redacted>")
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_max_tokens", &self.anthropic_max_tokens)
            .field("anthropic_api_url", &self.anthropic_api_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let llm_timeout_secs = parse_env(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        if llm_timeout_secs == 0 {
            bail!("Environment variable 'LLM_TIMEOUT_SECS' must be greater than 0");
        }

        Ok(Config {
            anthropic_api_key: require_api_key(&lookup)?,
            anthropic_model: optional_env(&lookup, "ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            anthropic_max_tokens: parse_env(&lookup, "ANTHROPIC_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            anthropic_api_url: optional_env(&lookup, "ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            llm_timeout_secs,
            llm_max_retries: parse_env(&lookup, "LLM_MAX_RETRIES", 0)?,
            port: parse_env(&lookup, "PORT", DEFAULT_PORT)
                .context("PORT must be a valid port number")?,
            rust_log: optional_env(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The immutable settings handed to the generation client at startup.
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            api_key: self.anthropic_api_key.clone(),
            model: self.anthropic_model.clone(),
            max_output_tokens: self.anthropic_max_tokens,
            api_url: self.anthropic_api_url.clone(),
            request_timeout: Duration::from_secs(self.llm_timeout_secs),
            max_retries: self.llm_max_retries,
        }
    }
}

/// `ANTHROPIC_API_KEY` wins; `CLAUDE_API_KEY` is accepted for older `.env` files.
fn require_api_key(lookup: &impl Fn(&str) -> Option<String>) -> Result<String> {
    match optional_env(lookup, "ANTHROPIC_API_KEY")
        .or_else(|| optional_env(lookup, "CLAUDE_API_KEY"))
    {
        Some(key) => Ok(key),
        None => bail!(
            "Required environment variable 'ANTHROPIC_API_KEY' (or 'CLAUDE_API_KEY') is not set"
        ),
    }
}

/// Blank values count as unset.
fn optional_env(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            anthropic_api_key: "sk-ant-secret".to_string(),
            anthropic_model: DEFAULT_MODEL.to_string(),
            anthropic_max_tokens: DEFAULT_MAX_TOKENS,
            anthropic_api_url: DEFAULT_API_URL.to_string(),
            llm_timeout_secs: 30,
            llm_max_retries: 2,
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let rendered = format!("{:?}", sample());
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_generation_config_carries_all_settings() {
        let generation = sample().generation();
        assert_eq!(generation.api_key, "sk-ant-secret");
        assert_eq!(generation.model, DEFAULT_MODEL);
        assert_eq!(generation.max_output_tokens, 1024);
        assert_eq!(generation.request_timeout, Duration::from_secs(30));
        assert_eq!(generation.max_retries, 2);
    }

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "k")])).unwrap();
        assert_eq!(config.anthropic_api_key, "k");
        assert_eq!(config.anthropic_model, DEFAULT_MODEL);
        assert_eq!(config.anthropic_max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.llm_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.llm_max_retries, 0);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "8080")])).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup_from(&[("ANTHROPIC_API_KEY", "   ")])).unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn test_claude_api_key_alias_is_accepted() {
        let config = Config::from_lookup(lookup_from(&[("CLAUDE_API_KEY", "legacy")])).unwrap();
        assert_eq!(config.anthropic_api_key, "legacy");
    }

    #[test]
    fn test_anthropic_api_key_wins_over_alias() {
        let config = Config::from_lookup(lookup_from(&[
            ("CLAUDE_API_KEY", "legacy"),
            ("ANTHROPIC_API_KEY", "primary"),
        ]))
        .unwrap();
        assert_eq!(config.anthropic_api_key, "primary");
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("LLM_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("LLM_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("ANTHROPIC_MAX_TOKENS", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_MAX_TOKENS"));
    }
}

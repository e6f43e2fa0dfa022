// ABOUTME: Generation configuration loaded from environment variables.
// ABOUTME: Covers provider selection, token budget, inter-call delay, and debug output.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_PROVIDER: &str = "anthropic";
const DEFAULT_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CONCLAVE_MAX_TOKENS is not a valid integer: {0}")]
    InvalidMaxTokens(String),

    #[error("CONCLAVE_DELAY_MS is not a valid integer: {0}")]
    InvalidDelay(String),
}

/// Configuration for plan generation and agent execution.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub provider: String,
    /// Overrides the provider's default model when set.
    pub model: Option<String>,
    pub max_tokens: u32,
    /// Courtesy pause applied after every external call, success or failure.
    /// Rate-limiting only; never a correctness mechanism.
    pub delay_between_calls: Duration,
    pub is_debug: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            delay_between_calls: Duration::ZERO,
            is_debug: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - CONCLAVE_PROVIDER: LLM provider (default: anthropic)
    /// - CONCLAVE_MODEL: model override (optional)
    /// - CONCLAVE_MAX_TOKENS: completion token budget (default: 4096)
    /// - CONCLAVE_DELAY_MS: minimum wait after each LLM call (default: 0)
    /// - CONCLAVE_DEBUG: verbose generation logging (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider =
            std::env::var("CONCLAVE_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.to_string());

        let model = std::env::var("CONCLAVE_MODEL").ok().filter(|m| !m.is_empty());

        let max_tokens = match std::env::var("CONCLAVE_MAX_TOKENS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidMaxTokens(raw))?,
            Err(_) => DEFAULT_MAX_TOKENS,
        };

        let delay_between_calls = match std::env::var("CONCLAVE_DELAY_MS") {
            Ok(raw) => {
                let ms: u64 = raw.parse().map_err(|_| ConfigError::InvalidDelay(raw))?;
                Duration::from_millis(ms)
            }
            Err(_) => Duration::ZERO,
        };

        let is_debug = std::env::var("CONCLAVE_DEBUG")
            .map(|v| v == "true" || v == "1" || v == "yes")
            .unwrap_or(false);

        Ok(Self {
            provider,
            model,
            max_tokens,
            delay_between_calls,
            is_debug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test so the env mutations cannot race each other.
    #[test]
    fn config_env_parsing() {
        // SAFETY: test-only code, no other test touches these vars
        unsafe {
            std::env::remove_var("CONCLAVE_PROVIDER");
            std::env::remove_var("CONCLAVE_MODEL");
            std::env::remove_var("CONCLAVE_MAX_TOKENS");
            std::env::remove_var("CONCLAVE_DELAY_MS");
            std::env::remove_var("CONCLAVE_DEBUG");
        }

        let config = GeneratorConfig::from_env().unwrap();
        assert_eq!(config.provider, "anthropic");
        assert!(config.model.is_none());
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.delay_between_calls, Duration::ZERO);
        assert!(!config.is_debug);

        // SAFETY: as above
        unsafe {
            std::env::set_var("CONCLAVE_DELAY_MS", "250");
            std::env::set_var("CONCLAVE_DEBUG", "1");
        }
        let config = GeneratorConfig::from_env().unwrap();
        assert_eq!(config.delay_between_calls, Duration::from_millis(250));
        assert!(config.is_debug);

        // SAFETY: as above
        unsafe {
            std::env::set_var("CONCLAVE_DELAY_MS", "soon");
        }
        let result = GeneratorConfig::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidDelay(_))));

        // SAFETY: as above
        unsafe {
            std::env::remove_var("CONCLAVE_DELAY_MS");
            std::env::remove_var("CONCLAVE_DEBUG");
        }
    }
}

use anyhow::{Context, Result};

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for the Anthropic messages endpoint.
///
/// Temperature defaults to 0 and max_tokens to 800: deterministic, bounded
/// answers for educational content.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl AnthropicConfig {
    pub fn new<S: Into<String>, M: Into<String>>(api_key: S, model: M) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: Some(0.0),
            max_tokens: Some(800),
        }
    }

    /// Build a config from ANTHROPIC_API_KEY, with optional ANTHROPIC_MODEL
    /// and ANTHROPIC_HOST overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable is not set")?;
        let model =
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| ANTHROPIC_DEFAULT_MODEL.to_string());
        let mut config = Self::new(api_key, model);
        if let Ok(host) = std::env::var("ANTHROPIC_HOST") {
            config.host = host;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnthropicConfig::new("key", "model");
        assert_eq!(config.host, ANTHROPIC_HOST);
        assert_eq!(config.temperature, Some(0.0));
        assert_eq!(config.max_tokens, Some(800));
    }
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

use super::base::{CompletionResponse, Provider};
use super::configs::AnthropicConfig;
use super::utils::{
    anthropic_response_to_completion, messages_to_anthropic_spec, tools_to_anthropic_spec,
};
use crate::models::message::Message;
use crate::models::tool::Tool;

const ANTHROPIC_API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AnthropicConfig::from_env()?)
    }

    async fn post(&self, payload: Value) -> Result<Value> {
        let url = format!("{}/v1/messages", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() => {
                Err(anyhow!("Server error: {}", status))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(anyhow!("Request failed: {} - {}", status, error_text))
            }
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<CompletionResponse> {
        let mut payload = json!({
            "model": self.config.model,
            "system": system,
            "messages": messages_to_anthropic_spec(messages),
            "max_tokens": self.config.max_tokens.unwrap_or(800),
        });

        if let Some(temp) = self.config.temperature {
            payload["temperature"] = json!(temp);
        }

        // An empty tool slice must leave the tools section out entirely,
        // which is how the loop forces a text-only final answer.
        if !tools.is_empty() {
            payload["tools"] = json!(tools_to_anthropic_spec(tools)?);
            payload["tool_choice"] = json!({"type": "auto"});
        }

        let response = self.post(payload).await?;
        anthropic_response_to_completion(response)
    }
}

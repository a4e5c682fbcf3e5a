use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::message::{Message, ToolRequest};
use crate::models::tool::Tool;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Why the model stopped generating. The generation loop only branches on
/// ToolUse versus everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
}

/// One completion from a provider: the assistant message, the stop reason,
/// and token accounting.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub message: Message,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

impl CompletionResponse {
    pub fn new(message: Message, stop_reason: StopReason, usage: Usage) -> Self {
        Self {
            message,
            stop_reason,
            usage,
        }
    }

    /// The first text block of the response. Later text blocks are ignored
    /// by policy.
    pub fn first_text(&self) -> Option<&str> {
        self.message.first_text()
    }

    /// All tool requests in the response, in content order
    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        self.message.tool_requests()
    }
}

/// Base trait for completion providers (Anthropic, mocks, etc).
///
/// An empty `tools` slice means no tool declarations: the adapter must omit
/// the tools section of the payload entirely, which is how the loop forces a
/// text-only final answer.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate the next assistant message for the given conversation
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<CompletionResponse>;
}

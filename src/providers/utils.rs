use anyhow::{anyhow, Result};
use serde_json::{json, Value};

use super::base::{CompletionResponse, StopReason, Usage};
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

/// Convert internal Message format to the Anthropic messages specification
pub fn messages_to_anthropic_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };

        let mut content = Vec::new();
        for msg_content in &message.content {
            match msg_content {
                MessageContent::Text(text) => {
                    content.push(json!({
                        "type": "text",
                        "text": text.text,
                    }));
                }
                MessageContent::ToolRequest(request) => {
                    content.push(json!({
                        "type": "tool_use",
                        "id": request.id,
                        "name": request.call.name,
                        "input": request.call.arguments,
                    }));
                }
                MessageContent::ToolResponse(response) => {
                    content.push(json!({
                        "type": "tool_result",
                        "tool_use_id": response.id,
                        "content": response.content,
                    }));
                }
            }
        }

        messages_spec.push(json!({
            "role": role,
            "content": content,
        }));
    }

    messages_spec
}

/// Convert internal Tool declarations to the Anthropic tool specification
pub fn tools_to_anthropic_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = std::collections::HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": tool.input_schema,
        }));
    }

    Ok(result)
}

/// Parse an Anthropic messages response into a CompletionResponse
pub fn anthropic_response_to_completion(response: Value) -> Result<CompletionResponse> {
    let blocks = response
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow!("Response is missing a content array"))?;

    let mut message = Message::assistant();
    for block in blocks {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                let text = block
                    .get("text")
                    .and_then(|t| t.as_str())
                    .ok_or_else(|| anyhow!("Text block is missing text"))?;
                message = message.with_text(text);
            }
            Some("tool_use") => {
                let id = block
                    .get("id")
                    .and_then(|i| i.as_str())
                    .ok_or_else(|| anyhow!("Tool use block is missing an id"))?;
                let name = block
                    .get("name")
                    .and_then(|n| n.as_str())
                    .ok_or_else(|| anyhow!("Tool use block is missing a name"))?;
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));
                message = message.with_tool_request(id, ToolCall::new(name, input));
            }
            other => {
                return Err(anyhow!("Unexpected content block type: {:?}", other));
            }
        }
    }

    let stop_reason = match response.get("stop_reason").and_then(|s| s.as_str()) {
        Some("end_turn") => StopReason::EndTurn,
        Some("tool_use") => StopReason::ToolUse,
        Some("max_tokens") => StopReason::MaxTokens,
        Some("stop_sequence") => StopReason::StopSequence,
        other => return Err(anyhow!("Unexpected stop_reason: {:?}", other)),
    };

    Ok(CompletionResponse::new(
        message,
        stop_reason,
        get_usage(&response),
    ))
}

fn get_usage(data: &Value) -> Usage {
    let usage = match data.get("usage") {
        Some(usage) => usage,
        None => return Usage::default(),
    };

    let input_tokens = usage
        .get("input_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let output_tokens = usage
        .get("output_tokens")
        .and_then(|v| v.as_i64())
        .map(|v| v as i32);

    let total_tokens = match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    };

    Usage::new(input_tokens, output_tokens, total_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_to_anthropic_spec_text() {
        let message = Message::user().with_text("Hello");
        let spec = messages_to_anthropic_spec(&[message]);

        assert_eq!(spec.len(), 1);
        assert_eq!(spec[0]["role"], "user");
        assert_eq!(spec[0]["content"][0]["type"], "text");
        assert_eq!(spec[0]["content"][0]["text"], "Hello");
    }

    #[test]
    fn test_messages_to_anthropic_spec_preserves_interleaved_blocks() {
        let message = Message::assistant()
            .with_text("Let me search")
            .with_tool_request("tool_1", ToolCall::new("search", json!({"query": "q"})));
        let spec = messages_to_anthropic_spec(&[message]);

        let content = spec[0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "tool_use");
        assert_eq!(content[1]["id"], "tool_1");
        assert_eq!(content[1]["input"]["query"], "q");
    }

    #[test]
    fn test_messages_to_anthropic_spec_tool_result() {
        let message = Message::user().with_tool_response("tool_1", "result text");
        let spec = messages_to_anthropic_spec(&[message]);

        let block = &spec[0]["content"][0];
        assert_eq!(block["type"], "tool_result");
        assert_eq!(block["tool_use_id"], "tool_1");
        assert_eq!(block["content"], "result text");
    }

    #[test]
    fn test_tools_to_anthropic_spec() {
        let tool = Tool::new("search", "Search the corpus", json!({"type": "object"}));
        let spec = tools_to_anthropic_spec(&[tool]).unwrap();
        assert_eq!(spec[0]["name"], "search");
        assert_eq!(spec[0]["input_schema"]["type"], "object");
    }

    #[test]
    fn test_duplicate_tool_names_rejected() {
        let tools = vec![
            Tool::new("search", "one", json!({})),
            Tool::new("search", "two", json!({})),
        ];
        assert!(tools_to_anthropic_spec(&tools).is_err());
    }

    #[test]
    fn test_response_parsing_tool_use() {
        let response = json!({
            "content": [
                {"type": "text", "text": "Checking the course"},
                {"type": "tool_use", "id": "toolu_1", "name": "search_course_content", "input": {"query": "docker"}}
            ],
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 10, "output_tokens": 20}
        });

        let completion = anthropic_response_to_completion(response).unwrap();
        assert_eq!(completion.stop_reason, StopReason::ToolUse);
        assert_eq!(completion.first_text(), Some("Checking the course"));

        let requests = completion.tool_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].id, "toolu_1");
        assert_eq!(requests[0].call.name, "search_course_content");
        assert_eq!(completion.usage.total_tokens, Some(30));
    }

    #[test]
    fn test_response_parsing_rejects_unknown_stop_reason() {
        let response = json!({
            "content": [{"type": "text", "text": "hi"}],
            "stop_reason": "pause_turn"
        });
        assert!(anthropic_response_to_completion(response).is_err());
    }

    #[test]
    fn test_response_parsing_rejects_missing_content() {
        let response = json!({"stop_reason": "end_turn"});
        assert!(anthropic_response_to_completion(response).is_err());
    }
}

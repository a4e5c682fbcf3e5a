use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::role::Role;
use super::tool::ToolCall;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub text: String,
}

/// A tool invocation requested by the model. The id is assigned by the
/// provider and must be echoed back unchanged in the matching ToolResponse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub id: String,
    pub call: ToolCall,
}

/// The outcome of one tool invocation, keyed by the originating request id.
/// The content is always plain text: retrieval errors and synthesized fault
/// messages travel through this same channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub id: String,
    pub content: String,
}

/// Content passed inside a message, which can be both simple content and tool content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageContent {
    Text(TextContent),
    ToolRequest(ToolRequest),
    ToolResponse(ToolResponse),
}

impl MessageContent {
    pub fn text<S: Into<String>>(text: S) -> Self {
        MessageContent::Text(TextContent { text: text.into() })
    }

    pub fn tool_request<S: Into<String>>(id: S, call: ToolCall) -> Self {
        MessageContent::ToolRequest(ToolRequest {
            id: id.into(),
            call,
        })
    }

    pub fn tool_response<S: Into<String>, T: Into<String>>(id: S, content: T) -> Self {
        MessageContent::ToolResponse(ToolResponse {
            id: id.into(),
            content: content.into(),
        })
    }

    /// Get the text content if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(&text.text),
            _ => None,
        }
    }

    pub fn as_tool_request(&self) -> Option<&ToolRequest> {
        if let MessageContent::ToolRequest(ref tool_request) = self {
            Some(tool_request)
        } else {
            None
        }
    }

    pub fn as_tool_response(&self) -> Option<&ToolResponse> {
        if let MessageContent::ToolResponse(ref tool_response) = self {
            Some(tool_response)
        } else {
            None
        }
    }
}

/// A message to or from an LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub created: i64,
    pub content: Vec<MessageContent>,
}

impl Message {
    /// Create a new user message with the current timestamp
    pub fn user() -> Self {
        Message {
            role: Role::User,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Create a new assistant message with the current timestamp
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            created: Utc::now().timestamp(),
            content: Vec::new(),
        }
    }

    /// Add any MessageContent to the message
    pub fn with_content(mut self, content: MessageContent) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(MessageContent::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_request<S: Into<String>>(self, id: S, call: ToolCall) -> Self {
        self.with_content(MessageContent::tool_request(id, call))
    }

    /// Add a tool response to the message
    pub fn with_tool_response<S: Into<String>, T: Into<String>>(self, id: S, content: T) -> Self {
        self.with_content(MessageContent::tool_response(id, content))
    }

    /// All tool requests in this message, in content order
    pub fn tool_requests(&self) -> Vec<&ToolRequest> {
        self.content
            .iter()
            .filter_map(MessageContent::as_tool_request)
            .collect()
    }

    /// The first text block in this message, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(MessageContent::as_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_builders() {
        let message = Message::user().with_text("Hello");
        assert_eq!(message.role, Role::User);
        assert_eq!(message.first_text(), Some("Hello"));

        let message = Message::assistant()
            .with_text("Let me check")
            .with_tool_request("tool_1", ToolCall::new("search", json!({"query": "x"})));
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.tool_requests().len(), 1);
        assert_eq!(message.tool_requests()[0].id, "tool_1");
    }

    #[test]
    fn test_first_text_skips_tool_blocks() {
        let message = Message::assistant()
            .with_tool_request("1", ToolCall::new("search", json!({})))
            .with_text("after");
        assert_eq!(message.first_text(), Some("after"));
    }

    #[test]
    fn test_tool_response_roundtrip() {
        let message = Message::user().with_tool_response("abc", "result text");
        let response = message.content[0].as_tool_response().unwrap();
        assert_eq!(response.id, "abc");
        assert_eq!(response.content, "result text");
    }

    #[test]
    fn test_message_serde_roundtrip() {
        let message = Message::assistant()
            .with_text("hi")
            .with_tool_request("1", ToolCall::new("search", json!({"query": "q"})));
        let serialized = serde_json::to_string(&message).unwrap();
        let deserialized: Message = serde_json::from_str(&serialized).unwrap();
        assert_eq!(message, deserialized);
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ToolResult;
use crate::models::tool::Tool;

pub mod registry;
pub mod search;

/// A citation record derived from one retrieval hit, surfaced to the end
/// user alongside the answer. Not part of the message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Source {
    pub fn new<S: Into<String>>(display_name: S, url: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            url,
        }
    }
}

/// A callable capability the model can invoke by name.
///
/// Error text a tool wants the model to read (a failed search, an unknown
/// course) is a normal Ok result; Err is reserved for faults in the tool
/// implementation itself and ends the current generation round.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The name the model invokes this tool by
    fn name(&self) -> &str;

    /// The declaration sent to the model
    fn definition(&self) -> Tool;

    /// Execute the tool against a JSON object of arguments
    async fn execute(&self, arguments: Value) -> ToolResult<String>;

    /// Sources accumulated by this tool since the last reset. Tools without
    /// a citation side channel keep the default.
    fn last_sources(&self) -> Vec<Source> {
        Vec::new()
    }

    fn reset_sources(&self) {}
}

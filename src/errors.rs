use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by a tool implementation itself, as opposed to error text
/// a tool returns through its normal result channel. The generation loop
/// converts these into a synthesized tool-result string and ends the round.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum ToolError {
    #[error("invalid tool parameters: {0}")]
    InvalidParameters(String),

    #[error("{0}")]
    ExecutionFailed(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

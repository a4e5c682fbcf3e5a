use anyhow::Result;
use futures::future::join_all;
use indoc::indoc;
use tracing::{debug, warn};

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{CompletionResponse, Provider, StopReason};
use crate::tools::registry::ToolRegistry;

/// Upper bound on completion/tool cycles per query. After this many rounds
/// the model is forced into a text-only answer.
pub const MAX_TOOL_ROUNDS: usize = 2;

/// Static instructions for the course-material assistant. Rebuilt into the
/// system prompt once per query, never per round.
pub const SYSTEM_PROMPT: &str = indoc! {"
    You are an AI assistant specialized in course materials and educational content with access to a comprehensive search tool for course information.

    Search Tool Usage:
    - Use the search tool **only** for questions about specific course content or detailed educational materials
    - **Up to 2 searches per query** — use a second search only if the first didn't fully answer the question or you need information from a different course/lesson
    - Synthesize search results into accurate, fact-based responses
    - If search yields no results, state this clearly without offering alternatives

    Response Protocol:
    - **General knowledge questions**: Answer using existing knowledge without searching
    - **Course-specific questions**: Search first, then answer
    - **No meta-commentary**:
     - Provide direct answers only — no reasoning process, search explanations, or question-type analysis
     - Do not mention \"based on the search results\"


    All responses must be:
    1. **Brief, Concise and focused** - Get to the point quickly
    2. **Educational** - Maintain instructional value
    3. **Clear** - Use accessible language
    4. **Example-supported** - Include relevant examples when they aid understanding
    Provide only the direct answer to what was asked.
"};

/// Turns one query into zero or more tool invocations and a final answer
/// string, driving the completion provider through a bounded round loop.
pub struct ResponseGenerator {
    provider: Box<dyn Provider>,
}

impl ResponseGenerator {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Generate an answer for a query, with optional serialized conversation
    /// history, tool declarations, and a registry to execute them against.
    ///
    /// Tool failures never escape this method: they become tool-result text
    /// for the model to explain. Provider failures do escape; without the
    /// provider no answer is possible.
    pub async fn generate(
        &self,
        query: &str,
        conversation_history: Option<&str>,
        tools: &[Tool],
        registry: Option<&ToolRegistry>,
    ) -> Result<String> {
        let system_prompt = match conversation_history {
            Some(history) => format!("{}\n\nPrevious conversation:\n{}", SYSTEM_PROMPT, history),
            None => SYSTEM_PROMPT.to_string(),
        };

        let mut messages = vec![Message::user().with_text(query)];

        for round in 0..MAX_TOOL_ROUNDS {
            debug!(round, "requesting completion");
            let response = self
                .provider
                .complete(&system_prompt, &messages, tools)
                .await?;

            // Only a tool request with a registry to serve it continues the
            // loop; anything else is the final answer.
            let registry = match registry {
                Some(registry) if response.stop_reason == StopReason::ToolUse => registry,
                _ => return Ok(response.first_text().unwrap_or_default().to_string()),
            };

            let round_failed = self
                .execute_tool_round(&mut messages, response, registry)
                .await;
            if round_failed {
                warn!(round, "tool execution faulted, forcing final answer");
                break;
            }
        }

        // Exhausted rounds or a failed round: one more call without tool
        // declarations guarantees a text answer.
        let final_response = self.provider.complete(&system_prompt, &messages, &[]).await?;
        Ok(final_response.first_text().unwrap_or_default().to_string())
    }

    /// Execute every tool request in the response, appending the assistant
    /// message and one user message holding the ordered results. Returns
    /// whether any execution faulted.
    async fn execute_tool_round(
        &self,
        messages: &mut Vec<Message>,
        response: CompletionResponse,
        registry: &ToolRegistry,
    ) -> bool {
        let requests: Vec<_> = response.tool_requests().into_iter().cloned().collect();
        // Keep the full interleaved content so the replayed conversation
        // matches what the model actually produced
        messages.push(response.message);

        let executions = requests
            .iter()
            .map(|request| registry.execute(&request.call.name, request.call.arguments.clone()));
        let outcomes = join_all(executions).await;

        let mut round_failed = false;
        let mut results = Message::user();
        for (request, outcome) in requests.iter().zip(outcomes) {
            let content = match outcome {
                Ok(text) => text,
                Err(error) => {
                    round_failed = true;
                    format!("Error executing tool: {}", error)
                }
            };
            results = results.with_tool_response(request.id.clone(), content);
        }

        if !results.content.is_empty() {
            messages.push(results);
        }

        round_failed
    }
}

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use super::{Source, ToolHandler};
use crate::errors::{ToolError, ToolResult};
use crate::models::tool::Tool;
use crate::retriever::{Retriever, SearchResults};

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

/// Semantic search over the course corpus, exposed to the model as a tool.
///
/// Retrieval errors are returned as result text for the model to relay;
/// only malformed arguments fault. Sources accumulate across calls within a
/// query and are cleared through the registry's reset.
pub struct CourseSearchTool {
    retriever: Arc<dyn Retriever>,
    last_sources: Mutex<Vec<Source>>,
}

impl CourseSearchTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self {
            retriever,
            last_sources: Mutex::new(Vec::new()),
        }
    }

    /// Format hits as `[Course Title - Lesson N]` headers followed by the
    /// chunk text, recording one source per document. Retriever order is
    /// preserved.
    async fn format_results(&self, results: &SearchResults) -> String {
        let mut formatted = Vec::new();
        let mut sources = Vec::new();

        for (document, meta) in results.documents.iter().zip(&results.metadata) {
            let header = match meta.lesson_number {
                Some(lesson) => format!("{} - Lesson {}", meta.course_title, lesson),
                None => meta.course_title.clone(),
            };

            let url = match meta.lesson_number {
                Some(lesson) => self.retriever.lesson_link(&meta.course_title, lesson).await,
                None => None,
            };

            sources.push(Source::new(header.clone(), url));
            formatted.push(format!("[{}]\n{}", header, document));
        }

        self.last_sources.lock().unwrap().extend(sources);
        formatted.join("\n\n")
    }
}

#[async_trait]
impl ToolHandler for CourseSearchTool {
    fn name(&self) -> &str {
        SEARCH_TOOL_NAME
    }

    fn definition(&self) -> Tool {
        Tool::new(
            SEARCH_TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    async fn execute(&self, arguments: Value) -> ToolResult<String> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ToolError::InvalidParameters("missing required parameter 'query'".to_string())
            })?;
        let course_name = arguments.get("course_name").and_then(Value::as_str);
        let lesson_number = arguments
            .get("lesson_number")
            .and_then(Value::as_u64)
            .map(|lesson| lesson as u32);

        let results = match self
            .retriever
            .search(query, course_name, lesson_number)
            .await
        {
            Ok(results) => results,
            // The model relays search failures conversationally
            Err(error) => return Ok(error.to_string()),
        };

        if results.is_empty() {
            let mut filter_info = String::new();
            if let Some(course) = course_name {
                filter_info.push_str(&format!(" in course '{}'", course));
            }
            if let Some(lesson) = lesson_number {
                filter_info.push_str(&format!(" in lesson {}", lesson));
            }
            return Ok(format!("No relevant content found{}.", filter_info));
        }

        Ok(self.format_results(&results).await)
    }

    fn last_sources(&self) -> Vec<Source> {
        self.last_sources.lock().unwrap().clone()
    }

    fn reset_sources(&self) {
        self.last_sources.lock().unwrap().clear();
    }
}

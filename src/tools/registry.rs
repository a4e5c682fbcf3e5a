use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::{Source, ToolHandler};
use crate::errors::ToolResult;
use crate::models::tool::Tool;

/// Name-keyed lookup over the registered tools, plus the source side
/// channel the query owner reads after a generation completes.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its declared name. Re-registering a name
    /// replaces the earlier handler.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// One declaration per registered tool, in registration order
    pub fn declarations(&self) -> Vec<Tool> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Invoke a tool by name. An unknown name is a normal outcome surfaced
    /// to the model as result text, not a fault.
    pub async fn execute(&self, name: &str, arguments: Value) -> ToolResult<String> {
        match self.tools.iter().find(|tool| tool.name() == name) {
            Some(tool) => {
                debug!(tool = name, "executing tool");
                tool.execute(arguments).await
            }
            None => {
                debug!(tool = name, "tool not found");
                Ok(format!("Tool '{}' not found", name))
            }
        }
    }

    /// Sources accumulated by all tools since the last reset, in
    /// registration then invocation order
    pub fn last_sources(&self) -> Vec<Source> {
        self.tools
            .iter()
            .flat_map(|tool| tool.last_sources())
            .collect()
    }

    /// Clear every tool's source accumulator. The query owner must call
    /// this after reading sources so they never leak across queries.
    pub fn reset_sources(&self) {
        for tool in &self.tools {
            tool.reset_sources();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct StaticTool {
        name: &'static str,
        reply: &'static str,
        sources: Mutex<Vec<Source>>,
    }

    impl StaticTool {
        fn new(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                reply,
                sources: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolHandler for StaticTool {
        fn name(&self) -> &str {
            self.name
        }

        fn definition(&self) -> Tool {
            Tool::new(self.name, "a static test tool", json!({"type": "object"}))
        }

        async fn execute(&self, _arguments: Value) -> ToolResult<String> {
            self.sources
                .lock()
                .unwrap()
                .push(Source::new(self.name, None));
            Ok(self.reply.to_string())
        }

        fn last_sources(&self) -> Vec<Source> {
            self.sources.lock().unwrap().clone()
        }

        fn reset_sources(&self) {
            self.sources.lock().unwrap().clear();
        }
    }

    struct FaultyTool;

    #[async_trait]
    impl ToolHandler for FaultyTool {
        fn name(&self) -> &str {
            "faulty"
        }

        fn definition(&self) -> Tool {
            Tool::new("faulty", "always faults", json!({"type": "object"}))
        }

        async fn execute(&self, _arguments: Value) -> ToolResult<String> {
            Err(ToolError::ExecutionFailed("connection failed".into()))
        }
    }

    #[tokio::test]
    async fn test_register_and_declarations_in_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool::new("alpha", "a")));
        registry.register(Arc::new(StaticTool::new("beta", "b")));

        let declarations = registry.declarations();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name, "alpha");
        assert_eq!(declarations[1].name, "beta");
    }

    #[tokio::test]
    async fn test_reregistering_replaces_handler() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool::new("alpha", "old")));
        registry.register(Arc::new(StaticTool::new("alpha", "new")));

        assert_eq!(registry.declarations().len(), 1);
        let result = registry.execute("alpha", json!({})).await.unwrap();
        assert_eq!(result, "new");
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_is_not_a_fault() {
        let registry = ToolRegistry::new();
        let result = registry.execute("nonexistent", json!({})).await.unwrap();
        assert_eq!(result, "Tool 'nonexistent' not found");
    }

    #[tokio::test]
    async fn test_fault_propagates_as_err() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FaultyTool));

        let result = registry.execute("faulty", json!({})).await;
        assert_eq!(
            result,
            Err(ToolError::ExecutionFailed("connection failed".into()))
        );
    }

    #[tokio::test]
    async fn test_sources_aggregate_and_reset() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(StaticTool::new("alpha", "a")));
        registry.register(Arc::new(StaticTool::new("beta", "b")));

        registry.execute("alpha", json!({})).await.unwrap();
        registry.execute("beta", json!({})).await.unwrap();

        let sources = registry.last_sources();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].display_name, "alpha");
        assert_eq!(sources[1].display_name, "beta");

        registry.reset_sources();
        assert!(registry.last_sources().is_empty());
    }
}

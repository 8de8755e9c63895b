//! Tool capability contract and registry
//!
//! A tool exposes an id, a one-line summary, a JSON parameter schema and an
//! async `execute` operation. Concrete tools are looked up by id in a
//! [`ToolRegistry`] instead of through a class hierarchy.

use async_trait::async_trait;
use fitplan_common::db::PlanStore;
use fitplan_common::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub mod analyze_sequence;
pub mod class_quality_report;

pub use analyze_sequence::AnalyzeSequenceTool;
pub use class_quality_report::ClassQualityReportTool;

/// Tool trait - every registered capability implements this
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier used for lookup (e.g., "analyze_sequence")
    fn id(&self) -> &'static str;

    /// One-line description for listings
    fn summary(&self) -> &'static str;

    /// JSON Schema describing the `params` object accepted by `execute`
    fn parameter_schema(&self) -> Value;

    /// Run the tool
    ///
    /// # Returns
    /// * `Ok(Value)` - Tool output as JSON
    /// * `Err(Error::InvalidInput)` - `params` did not match the schema
    async fn execute(&self, params: Value) -> Result<Value>;
}

/// Listing entry for a registered tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub id: &'static str,
    pub summary: &'static str,
    pub parameters: Value,
}

/// Mapping from tool id to implementation
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; ids must be unique
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let id = tool.id();
        if self.tools.contains_key(id) {
            return Err(Error::InvalidInput(format!("tool '{}' is already registered", id)));
        }
        info!("Registered tool '{}'", id);
        self.tools.insert(id, tool);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All registered tools, sorted by id
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<ToolDescriptor> = self
            .tools
            .values()
            .map(|tool| ToolDescriptor {
                id: tool.id(),
                summary: tool.summary(),
                parameters: tool.parameter_schema(),
            })
            .collect();
        descriptors.sort_by_key(|d| d.id);
        descriptors
    }

    /// Look up `id` and execute it with `params`
    ///
    /// # Errors
    /// `Error::NotFound` for an unknown id; otherwise whatever the tool returns.
    pub async fn execute(&self, id: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("tool '{}'", id)))?;
        debug!("Executing tool '{}'", id);
        tool.execute(params).await
    }
}

/// Registry with all built-in tools wired to `store`
pub fn default_registry(store: Arc<dyn PlanStore>) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(AnalyzeSequenceTool::new()))?;
    registry.register(Arc::new(ClassQualityReportTool::new(store)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn summary(&self) -> &'static str {
            "Return the parameters unchanged"
        }

        fn parameter_schema(&self) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, params: Value) -> Result<Value> {
            Ok(params)
        }
    }

    #[tokio::test]
    async fn test_register_and_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();

        let output = registry.execute("echo", json!({ "x": 1 })).await.unwrap();
        assert_eq!(output, json!({ "x": 1 }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();

        let err = registry.register(Arc::new(EchoTool)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());

        let err = registry.execute("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}

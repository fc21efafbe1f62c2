//! Tools the model can call while answering a query.
//!
//! A tool declares a [`ToolDefinition`] and turns JSON arguments into a string
//! result. Failures are reported in the returned string so the model can react
//! to them. Per-query state (retrieved sources) lives in a [`ToolContext`] that
//! the caller creates for each query, so tools themselves stay immutable and can
//! be shared across concurrent queries.

mod outline;
mod registry;
mod search;

pub use crate::llm::ToolDefinition;
pub use outline::CourseOutlineTool;
pub use registry::ToolRegistry;
pub use search::CourseSearchTool;

use crate::course_store::Source;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A tool that can be called by the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema presented to the model.
    fn definition(&self) -> ToolDefinition;

    /// Run the tool. Any failure is described in the returned string.
    async fn execute(&self, input: &Value, ctx: &mut ToolContext) -> String;
}

/// Sources recorded by one tool invocation.
#[derive(Debug, Clone, PartialEq)]
struct SourceBatch {
    tool: String,
    sources: Vec<Source>,
}

/// Per-query scratch state shared by the tools dispatched for that query.
#[derive(Debug, Default)]
pub struct ToolContext {
    batches: Vec<SourceBatch>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sources a tool retrieved. Empty batches are ignored.
    pub fn record_sources(&mut self, tool: &str, sources: Vec<Source>) {
        if sources.is_empty() {
            return;
        }
        self.batches.push(SourceBatch {
            tool: tool.to_string(),
            sources,
        });
    }

    /// Every recorded source, in dispatch order.
    pub fn collect_sources(&self) -> Vec<Source> {
        self.batches
            .iter()
            .flat_map(|b| b.sources.iter().cloned())
            .collect()
    }

    /// Drop all recorded sources.
    pub fn clear_sources(&mut self) {
        self.batches.clear();
    }
}

/// Deserialize tool arguments, describing any mismatch for the model.
pub(crate) fn parse_args<T: DeserializeOwned>(tool: &str, input: &Value) -> Result<T, String> {
    serde_json::from_value(input.clone())
        .map_err(|e| format!("Invalid arguments for tool '{}': {}", tool, e))
}

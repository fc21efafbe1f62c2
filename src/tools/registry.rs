//! Tool registration and dispatch by name.

use super::{Tool, ToolContext, ToolDefinition};
use crate::error::{Result, SyllabusError};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registered tools, in registration order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(String, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its declared name.
    ///
    /// A tool with the same name is replaced in place. A tool without a name is a
    /// configuration error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.definition().name;
        if name.trim().is_empty() {
            return Err(SyllabusError::Config(
                "Tool must declare a name in its definition".to_string(),
            ));
        }

        match self.tools.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                debug!("Replacing tool '{}'", name);
                slot.1 = tool;
            }
            None => {
                debug!("Registered tool '{}'", name);
                self.tools.push((name, tool));
            }
        }
        Ok(())
    }

    /// Definitions for every registered tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, tool)| tool.definition()).collect()
    }

    /// Execute a tool by name. Unknown names produce an in-band message.
    pub async fn dispatch(&self, name: &str, input: &Value, ctx: &mut ToolContext) -> String {
        match self.get(name) {
            Some(tool) => {
                info!("Calling tool: {} with args: {}", name, input);
                tool.execute(input, ctx).await
            }
            None => {
                warn!("Model requested unknown tool '{}'", name);
                format!("Tool '{}' not found", name)
            }
        }
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, tool)| tool)
    }

    /// Registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

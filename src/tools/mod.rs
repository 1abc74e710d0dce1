//! Tool System module.
//!
//! Tools are what the outside world invokes: a name plus a JSON argument
//! object in, a `ToolResult` (text + error flag) out. The `ToolRouter`
//! holds the registered tools and dispatches invocations by name.
//!
//! Errors never escape the router. A failing tool, an unknown name or bad
//! arguments all come back as an error result.

pub mod analyze_pdf;
pub mod list_models;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::analyzer::PdfAnalyzer;
use crate::types::{ToolDefinition, ToolInvocation, ToolResult};

/// Trait that all tools must implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "analyze_pdf").
    fn name(&self) -> &str;

    /// A human-readable description of what this tool does.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    ///
    /// `Err` is reserved for invocation problems such as missing
    /// arguments; domain failures are reported as an error `ToolResult`.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult>;

    /// Convert this tool into a ToolDefinition for advertising to clients.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters_schema(),
        }
    }
}

/// Routes tool calls to the correct tool implementation.
pub struct ToolRouter {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRouter {
    /// Create a new empty ToolRouter.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool with the router.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Get all tool definitions.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// Dispatch an invocation and fold any error into the result.
    pub async fn call(&self, invocation: &ToolInvocation) -> ToolResult {
        info!("Tool '{}' called", invocation.name);

        let Some(tool) = self.tools.iter().find(|t| t.name() == invocation.name) else {
            warn!("Unknown tool: {}", invocation.name);
            return ToolResult::error(format!("Error: Unknown tool: {}", invocation.name));
        };

        match tool.execute(invocation.arguments.clone()).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool '{}' failed: {:#}", invocation.name, e);
                ToolResult::error(format!("Error: {:#}", e))
            }
        }
    }
}

impl Default for ToolRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a ToolRouter with both built-in tools registered.
pub fn create_default_router(analyzer: Arc<PdfAnalyzer>) -> ToolRouter {
    let mut router = ToolRouter::new();
    router.register(Box::new(list_models::ListModelsTool::new(
        analyzer.default_model(),
    )));
    router.register(Box::new(analyze_pdf::AnalyzePdfTool::new(analyzer)));
    router
}

/// Read a required string argument.
pub(crate) fn required_str<'a>(params: &'a serde_json::Value, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing required parameter: {}", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": {"text": {"type": "string"}},
                "required": ["text"]
            })
        }

        async fn execute(&self, params: serde_json::Value) -> Result<ToolResult> {
            Ok(ToolResult::text(required_str(&params, "text")?))
        }
    }

    fn router() -> ToolRouter {
        let mut router = ToolRouter::new();
        router.register(Box::new(EchoTool));
        router
    }

    #[test]
    fn test_dispatch_by_name() {
        let rt = rt();
        rt.block_on(async {
            let result = router()
                .call(&ToolInvocation {
                    name: "echo".to_string(),
                    arguments: json!({"text": "hi"}),
                })
                .await;
            assert_eq!(result, ToolResult::text("hi"));
        });
    }

    #[test]
    fn test_unknown_tool_is_error_result() {
        let rt = rt();
        rt.block_on(async {
            let result = router()
                .call(&ToolInvocation {
                    name: "nope".to_string(),
                    arguments: json!({}),
                })
                .await;
            assert!(result.is_error);
            assert!(result.text.contains("Unknown tool: nope"));
        });
    }

    #[test]
    fn test_missing_argument_is_error_result() {
        let rt = rt();
        rt.block_on(async {
            let result = router()
                .call(&ToolInvocation {
                    name: "echo".to_string(),
                    arguments: json!({}),
                })
                .await;
            assert!(result.is_error);
            assert!(result.text.contains("Missing required parameter: text"));
        });
    }

    #[test]
    fn test_definitions() {
        let defs = router().definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }
}

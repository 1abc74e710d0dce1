//! List models tool: the configured default plus the static catalog.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use super::Tool;
use crate::catalog;
use crate::types::ToolResult;

pub struct ListModelsTool {
    default_model: String,
}

impl ListModelsTool {
    pub fn new(default_model: &str) -> Self {
        Self {
            default_model: default_model.to_string(),
        }
    }
}

#[async_trait]
impl Tool for ListModelsTool {
    fn name(&self) -> &str {
        "list_models"
    }

    fn description(&self) -> &str {
        "List the Gemini models that can be used with the PDF analyzer, \
         and the default model in use."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: serde_json::Value) -> Result<ToolResult> {
        let listing = catalog::listing(&self.default_model);
        let text = serde_json::to_string(&listing).context("Failed to serialize model listing")?;
        Ok(ToolResult::text(text))
    }
}

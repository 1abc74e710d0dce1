//! Analyze PDF tool.
//!
//! Sends a local PDF plus the caller's prompt to Gemini and returns the
//! model's answer. The raw PDF is tried first; extracted text is the
//! fallback (see `analyzer`).

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::{required_str, Tool};
use crate::analyzer::PdfAnalyzer;
use crate::types::{AnalysisRequest, ToolResult};

pub struct AnalyzePdfTool {
    analyzer: Arc<PdfAnalyzer>,
}

impl AnalyzePdfTool {
    pub fn new(analyzer: Arc<PdfAnalyzer>) -> Self {
        Self { analyzer }
    }
}

#[async_trait]
impl Tool for AnalyzePdfTool {
    fn name(&self) -> &str {
        "analyze_pdf"
    }

    fn description(&self) -> &str {
        "Analyze a local PDF with Gemini. Sends the PDF together with the given \
         prompt and returns Gemini's response. If the PDF cannot be submitted \
         directly, its text is extracted locally and sent instead."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "pdf_uri": {
                    "type": "string",
                    "description": "File URI of the PDF (e.g. file:///path/to/your.pdf)"
                },
                "prompt": {
                    "type": "string",
                    "description": "The instruction to run against the PDF content"
                },
                "model": {
                    "type": "string",
                    "description": "Optional: override the default Gemini model for this request"
                }
            },
            "required": ["pdf_uri", "prompt"]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolResult> {
        let pdf_uri = required_str(&params, "pdf_uri")?;
        let prompt = required_str(&params, "prompt")?;
        let model = params.get("model").and_then(|v| v.as_str());

        let request =
            AnalysisRequest::new(pdf_uri, prompt, model, self.analyzer.default_model());
        let outcome = self.analyzer.analyze(&request).await;
        debug!(
            strategy = ?outcome.strategy,
            direct_failure = ?outcome.direct_failure,
            "analyze_pdf finished"
        );
        Ok(outcome.into())
    }
}

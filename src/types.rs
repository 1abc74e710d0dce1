//! Core data types used throughout the analyzer.
//!
//! This module defines the request, payload and outcome types that flow
//! between the resolver, the model client, the orchestrator and the tools.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// --- Message Roles ---

/// The role of a message in a chat-completion request.
///
/// Every request is a single user message.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

// --- Analysis ---

/// One request to analyze a PDF with a prompt.
///
/// Built once per tool invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// File reference as supplied by the client (usually a `file://` URI)
    pub file_reference: String,
    /// The natural-language instruction to run against the document
    pub instruction: String,
    /// The model to use for both strategies
    pub model_id: String,
}

impl AnalysisRequest {
    /// Build a request, using `default_model` unless a non-empty override is given.
    pub fn new(
        file_reference: impl Into<String>,
        instruction: impl Into<String>,
        model_override: Option<&str>,
        default_model: &str,
    ) -> Self {
        let model_id = match model_override {
            Some(m) if !m.trim().is_empty() => m.trim().to_string(),
            _ => default_model.to_string(),
        };
        Self {
            file_reference: file_reference.into(),
            instruction: instruction.into(),
            model_id,
        }
    }
}

/// A file reference resolved to a local path.
///
/// Existence and readability are reported here but not enforced;
/// the orchestrator decides what to do about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub absolute_path: PathBuf,
    pub exists: bool,
    pub readable: bool,
}

impl ResolvedDocument {
    pub fn is_accessible(&self) -> bool {
        self.exists && self.readable
    }
}

// --- Model Payloads ---

/// Request payload for the multimodal (raw document) endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MultimodalPayload {
    /// Model addressed through the endpoint URL
    pub model_id: String,
    pub instruction_text: String,
    pub document_base64: String,
    pub mime_type: String,
}

/// Request payload for the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPayload {
    pub model_id: String,
    pub role: Role,
    pub combined_text: String,
}

/// A successful answer from either remote endpoint.
///
/// Failures are carried by `AnalyzerError` instead, which keeps the
/// status code and raw body for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelResponse {
    pub answer_text: String,
    pub status_code: u16,
}

/// Which strategy produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Raw PDF bytes sent to the multimodal endpoint
    Direct,
    /// Locally extracted text sent to the chat endpoint
    Fallback,
}

/// Terminal result of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// The model's answer, or a one-line diagnostic when `is_error` is set
    pub answer_text: String,
    pub is_error: bool,
    /// The strategy that supplied the answer (None on error)
    pub strategy: Option<Strategy>,
    /// Why the direct attempt failed, if it was tried and failed
    pub direct_failure: Option<String>,
}

impl AnalysisOutcome {
    pub fn answered(
        answer_text: String,
        strategy: Strategy,
        direct_failure: Option<String>,
    ) -> Self {
        Self {
            answer_text,
            is_error: false,
            strategy: Some(strategy),
            direct_failure,
        }
    }

    pub fn failed(diagnostic: String, direct_failure: Option<String>) -> Self {
        Self {
            answer_text: diagnostic,
            is_error: true,
            strategy: None,
            direct_failure,
        }
    }
}

// --- Tool Invocation ---

/// A named tool call with its JSON arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to invoke (e.g. "analyze_pdf")
    pub name: String,
    /// Argument object for the tool
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// Result of a tool call: text plus an error flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub text: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

impl From<AnalysisOutcome> for ToolResult {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            text: outcome.answer_text,
            is_error: outcome.is_error,
        }
    }
}

// --- Tool Definition ---

/// Describes a tool's interface via JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool's name (must match what the tool reports)
    pub name: String,
    /// Human-readable description of what the tool does
    pub description: String,
    /// JSON Schema describing the tool's input parameters
    pub input_schema: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_default_model_without_override() {
        let req = AnalysisRequest::new("file:///a.pdf", "Summarize", None, "gemini-2.0-flash");
        assert_eq!(req.model_id, "gemini-2.0-flash");

        let req =
            AnalysisRequest::new("file:///a.pdf", "Summarize", Some("  "), "gemini-2.0-flash");
        assert_eq!(req.model_id, "gemini-2.0-flash");
    }

    #[test]
    fn test_request_model_override() {
        let req = AnalysisRequest::new(
            "file:///a.pdf",
            "Summarize",
            Some("gemini-1.5-pro"),
            "gemini-2.0-flash",
        );
        assert_eq!(req.model_id, "gemini-1.5-pro");
    }

    #[test]
    fn test_tool_result_serializes_camel_case() {
        let json = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(json["text"], "boom");
        assert_eq!(json["isError"], true);
    }

    #[test]
    fn test_outcome_into_tool_result() {
        let outcome = AnalysisOutcome::answered("Summary.".to_string(), Strategy::Direct, None);
        assert_eq!(ToolResult::from(outcome), ToolResult::text("Summary."));
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::User).unwrap(), "user");
    }
}

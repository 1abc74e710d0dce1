//! Chat adapter for an OpenAI-compatible chat-completion endpoint.

use serde::{Deserialize, Serialize};

use super::ModelAdapter;
use crate::error::AnalyzerError;
use crate::transport::HttpRequest;
use crate::types::{ChatPayload, Role};

const PROVIDER: &str = "Gemini chat";
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiCompatibleAdapter {
    api_key: String,
    endpoint: String,
}

// --- API Request Types (OpenAI format) ---

#[derive(Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ApiMessage {
    role: Role,
    content: String,
}

// --- API Response Types ---

#[derive(Deserialize, Debug)]
struct ApiResponse {
    choices: Option<Vec<ApiChoice>>,
}

#[derive(Deserialize, Debug)]
struct ApiChoice {
    message: Option<ApiResponseMessage>,
}

#[derive(Deserialize, Debug)]
struct ApiResponseMessage {
    content: Option<String>,
}

// --- Implementation ---

impl OpenAiCompatibleAdapter {
    pub fn new(api_key: String, endpoint: String) -> Self {
        Self { api_key, endpoint }
    }

    fn shape_error(detail: impl Into<String>) -> AnalyzerError {
        AnalyzerError::UnexpectedResponseShape {
            provider: PROVIDER,
            detail: detail.into(),
        }
    }
}

impl ModelAdapter for OpenAiCompatibleAdapter {
    type Payload = ChatPayload;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build_request(&self, payload: &ChatPayload) -> Result<HttpRequest, AnalyzerError> {
        let api_request = ApiRequest {
            model: payload.model_id.clone(),
            messages: vec![ApiMessage {
                role: payload.role,
                content: payload.combined_text.clone(),
            }],
            temperature: TEMPERATURE,
        };

        let body = serde_json::to_value(&api_request).map_err(|e| AnalyzerError::Transport {
            target: self.endpoint.clone(),
            reason: format!("failed to encode request body: {}", e),
        })?;

        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: vec![(
                "Authorization".to_string(),
                format!("Bearer {}", self.api_key),
            )],
            body,
            display_url: self.endpoint.clone(),
        })
    }

    fn parse_answer(&self, body: &str) -> Result<String, AnalyzerError> {
        let api_response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| Self::shape_error(format!("response is not valid JSON: {}", e)))?;

        let choice = api_response
            .choices
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| Self::shape_error("Empty response from API: no choices returned"))?;

        choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| Self::shape_error("first choice has no message content"))
    }
}

//! Multimodal adapter for the Gemini `generateContent` endpoint.
//!
//! The document travels inline as base64 next to the instruction text.
//! Model id and API key are part of the URL, not the headers:
//!   POST .../v1beta/models/{model}:generateContent?key={key}

use serde::{Deserialize, Serialize};

use super::ModelAdapter;
use crate::error::AnalyzerError;
use crate::transport::HttpRequest;
use crate::types::MultimodalPayload;

const PROVIDER: &str = "Gemini";
const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 8192;

pub struct GenerateContentAdapter {
    api_key: String,
    endpoint_template: String,
}

// --- API Request Types ---

#[derive(Serialize)]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct ApiContent {
    parts: Vec<ApiPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ApiPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

// --- API Response Types ---

#[derive(Deserialize, Debug)]
struct ApiResponse {
    candidates: Option<Vec<ApiCandidate>>,
}

#[derive(Deserialize, Debug)]
struct ApiCandidate {
    content: Option<ApiCandidateContent>,
}

#[derive(Deserialize, Debug)]
struct ApiCandidateContent {
    parts: Option<Vec<ApiResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct ApiResponsePart {
    text: Option<String>,
}

// --- Implementation ---

impl GenerateContentAdapter {
    pub fn new(api_key: String, endpoint_template: String) -> Self {
        Self {
            api_key,
            endpoint_template,
        }
    }

    fn endpoint(&self, model_id: &str, key: &str) -> String {
        self.endpoint_template
            .replace("{model}", &urlencoding::encode(model_id))
            .replace("{key}", key)
    }

    fn shape_error(detail: impl Into<String>) -> AnalyzerError {
        AnalyzerError::UnexpectedResponseShape {
            provider: PROVIDER,
            detail: detail.into(),
        }
    }
}

impl ModelAdapter for GenerateContentAdapter {
    type Payload = MultimodalPayload;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn build_request(&self, payload: &MultimodalPayload) -> Result<HttpRequest, AnalyzerError> {
        let api_request = ApiRequest {
            contents: vec![ApiContent {
                parts: vec![
                    ApiPart::Text {
                        text: payload.instruction_text.clone(),
                    },
                    ApiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: payload.mime_type.clone(),
                            data: payload.document_base64.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let display_url = self.endpoint(&payload.model_id, "***");
        let body = serde_json::to_value(&api_request).map_err(|e| AnalyzerError::Transport {
            target: display_url.clone(),
            reason: format!("failed to encode request body: {}", e),
        })?;

        Ok(HttpRequest {
            url: self.endpoint(&payload.model_id, &urlencoding::encode(&self.api_key)),
            headers: Vec::new(),
            body,
            display_url,
        })
    }

    fn parse_answer(&self, body: &str) -> Result<String, AnalyzerError> {
        let api_response: ApiResponse = serde_json::from_str(body)
            .map_err(|e| Self::shape_error(format!("response is not valid JSON: {}", e)))?;

        let candidate = api_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| Self::shape_error("no candidates returned"))?;
        let part = candidate
            .content
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .ok_or_else(|| Self::shape_error("first candidate has no content parts"))?;

        part.text
            .ok_or_else(|| Self::shape_error("first content part has no text"))
    }
}

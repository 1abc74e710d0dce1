//! Remote Model Client.
//!
//! Two remote endpoints are used, and they share nothing but the shape of
//! an exchange: build a JSON request, do one POST, check the status, dig
//! the answer out of the body. `ModelAdapter` captures the per-endpoint
//! part; `submit` is the shared part.
//!
//! - `generate_content`: the multimodal endpoint that accepts raw PDF bytes
//! - `openai_compatible`: the chat-completion endpoint used for the text fallback
//!
//! Neither adapter retries. Fallback policy lives in the analyzer.

pub mod generate_content;
pub mod openai_compatible;

use std::sync::Arc;

use base64::Engine;
use tracing::debug;

use crate::config::Settings;
use crate::error::AnalyzerError;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::{ChatPayload, ModelResponse, MultimodalPayload, Role};

use generate_content::GenerateContentAdapter;
use openai_compatible::OpenAiCompatibleAdapter;

/// MIME type declared for inline document data.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Request/response translation for one remote endpoint.
pub trait ModelAdapter: Send + Sync {
    type Payload: Sync;

    /// Provider name used in diagnostics (e.g. "Gemini").
    fn name(&self) -> &'static str;

    /// Build the HTTP request for a payload. Fails if the body cannot be encoded.
    fn build_request(&self, payload: &Self::Payload) -> Result<HttpRequest, AnalyzerError>;

    /// Extract the answer text from a success body.
    fn parse_answer(&self, body: &str) -> Result<String, AnalyzerError>;
}

/// Perform one round trip through `adapter` and parse the outcome.
pub async fn submit<A: ModelAdapter>(
    transport: &dyn HttpTransport,
    adapter: &A,
    payload: &A::Payload,
) -> Result<ModelResponse, AnalyzerError> {
    let request = adapter.build_request(payload)?;
    debug!("POST {} ({})", request.display_url, adapter.name());

    let reply = transport.post_json(request).await?;
    if !reply.is_success() {
        return Err(AnalyzerError::RemoteApi {
            provider: adapter.name(),
            status: reply.status,
            body: reply.body,
        });
    }

    let answer_text = adapter.parse_answer(&reply.body)?;
    Ok(ModelResponse {
        answer_text,
        status_code: reply.status,
    })
}

/// Both adapters over one shared transport.
pub struct RemoteModelClient {
    transport: Arc<dyn HttpTransport>,
    multimodal: GenerateContentAdapter,
    chat: OpenAiCompatibleAdapter,
}

impl RemoteModelClient {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: &Settings) -> Self {
        Self {
            transport,
            multimodal: GenerateContentAdapter::new(
                settings.api_key.clone(),
                settings.content_endpoint.clone(),
            ),
            chat: OpenAiCompatibleAdapter::new(
                settings.api_key.clone(),
                settings.chat_endpoint.clone(),
            ),
        }
    }

    /// Send the raw document bytes together with the instruction.
    pub async fn submit_document(
        &self,
        document_bytes: &[u8],
        instruction: &str,
        model_id: &str,
    ) -> Result<ModelResponse, AnalyzerError> {
        let payload = MultimodalPayload {
            model_id: model_id.to_string(),
            instruction_text: instruction.to_string(),
            document_base64: base64::engine::general_purpose::STANDARD.encode(document_bytes),
            mime_type: PDF_MIME_TYPE.to_string(),
        };
        submit(self.transport.as_ref(), &self.multimodal, &payload).await
    }

    /// Send a single user message to the chat-completion endpoint.
    pub async fn submit_chat(
        &self,
        prompt_text: &str,
        model_id: &str,
    ) -> Result<ModelResponse, AnalyzerError> {
        let payload = ChatPayload {
            model_id: model_id.to_string(),
            role: Role::User,
            combined_text: prompt_text.to_string(),
        };
        submit(self.transport.as_ref(), &self.chat, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::testing::RecordingTransport;
    use serde_json::json;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    fn client(transport: Arc<RecordingTransport>) -> RemoteModelClient {
        RemoteModelClient::new(transport, &Settings::for_tests())
    }

    #[test]
    fn test_submit_document_round_trips_answer_exactly() {
        let rt = rt();
        rt.block_on(async {
            let transport = Arc::new(RecordingTransport::new().reply(
                200,
                json!({"candidates": [{"content": {"parts": [{"text": "  T\n"}]}}]}),
            ));
            let response = client(transport.clone())
                .submit_document(b"%PDF-1.4", "Summarize this", "gemini-2.0-flash")
                .await
                .unwrap();

            assert_eq!(response.answer_text, "  T\n");
            assert_eq!(response.status_code, 200);
            assert_eq!(transport.call_count(), 1);
        });
    }

    #[test]
    fn test_submit_document_encodes_bytes() {
        let rt = rt();
        rt.block_on(async {
            let transport = Arc::new(RecordingTransport::new().reply(
                200,
                json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}),
            ));
            client(transport.clone())
                .submit_document(b"%PDF-1.4", "Summarize this", "gemini-2.0-flash")
                .await
                .unwrap();

            let request = &transport.requests()[0];
            let parts = &request.body["contents"][0]["parts"];
            assert_eq!(parts[0]["text"], "Summarize this");
            assert_eq!(parts[1]["inline_data"]["mime_type"], "application/pdf");
            assert_eq!(parts[1]["inline_data"]["data"], "JVBERi0xLjQ=");
        });
    }

    #[test]
    fn test_non_success_status_is_remote_api_error() {
        let rt = rt();
        rt.block_on(async {
            let transport =
                Arc::new(RecordingTransport::new().reply_raw(503, "Service Unavailable"));
            let err = client(transport)
                .submit_document(b"%PDF", "x", "gemini-2.0-flash")
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::RemoteApi);
            assert!(err.to_string().contains("503"));
            assert!(err.to_string().contains("Service Unavailable"));
        });
    }

    #[test]
    fn test_transport_failure_passes_through() {
        let rt = rt();
        rt.block_on(async {
            let transport = Arc::new(RecordingTransport::new().fail("connection refused"));
            let err = client(transport)
                .submit_chat("hello", "gemini-2.0-flash")
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Transport);
            assert!(err.to_string().contains("connection refused"));
        });
    }

    struct UnencodableAdapter;

    impl ModelAdapter for UnencodableAdapter {
        type Payload = ();

        fn name(&self) -> &'static str {
            "Unencodable"
        }

        fn build_request(&self, _payload: &()) -> Result<HttpRequest, AnalyzerError> {
            Err(AnalyzerError::Transport {
                target: "https://gemini.test".to_string(),
                reason: "failed to encode request body: key must be a string".to_string(),
            })
        }

        fn parse_answer(&self, body: &str) -> Result<String, AnalyzerError> {
            Ok(body.to_string())
        }
    }

    #[test]
    fn test_encoding_failure_sends_nothing() {
        let rt = rt();
        rt.block_on(async {
            let transport = RecordingTransport::new().reply(200, json!({}));
            let err = submit(&transport, &UnencodableAdapter, &())
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::Transport);
            assert!(err.to_string().contains("failed to encode request body"));
            assert_eq!(transport.call_count(), 0);
        });
    }

    #[test]
    fn test_submit_chat_success() {
        let rt = rt();
        rt.block_on(async {
            let transport = Arc::new(RecordingTransport::new().reply(
                200,
                json!({"choices": [{
                    "message": {"role": "assistant", "content": "Fallback answer."}
                }]}),
            ));
            let response = client(transport.clone())
                .submit_chat("Summarize this", "gemini-1.5-pro")
                .await
                .unwrap();

            assert_eq!(response.answer_text, "Fallback answer.");
            let request = &transport.requests()[0];
            assert_eq!(request.body["model"], "gemini-1.5-pro");
            assert_eq!(request.body["messages"][0]["role"], "user");
        });
    }
}

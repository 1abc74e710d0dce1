//! Analysis orchestrator.
//!
//! Turns a PDF reference plus an instruction into a model answer using two
//! strategies, in this order:
//!
//! ```text
//! Resolving ──> DirectAttempt ──ok──────────────────────> Done
//!                    │
//!                    └─err──> FallbackAttempt ──ok/err──> Done
//! ```
//!
//! The direct attempt sends the raw PDF to the multimodal endpoint. If it
//! fails for any reason, the text is extracted locally and sent to the chat
//! endpoint instead. There is no third attempt.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::AnalyzerError;
use crate::extract::TextExtractor;
use crate::llm::RemoteModelClient;
use crate::types::{AnalysisOutcome, AnalysisRequest, ModelResponse, Strategy};
use crate::uri;

/// Separator placed between the instruction and the extracted text.
const CONTENT_SEPARATOR: &str = "\n\n--- PDF Content ---\n";

pub struct PdfAnalyzer {
    client: RemoteModelClient,
    extractor: Arc<dyn TextExtractor>,
    default_model: String,
}

impl PdfAnalyzer {
    pub fn new(
        client: RemoteModelClient,
        extractor: Arc<dyn TextExtractor>,
        default_model: String,
    ) -> Self {
        Self {
            client,
            extractor,
            default_model,
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run one analysis. Never fails: errors become an error outcome.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        info!(
            "Analyzing {} with model {}",
            request.file_reference, request.model_id
        );

        let document = match uri::resolve(&request.file_reference) {
            Ok(document) => document,
            Err(e) => {
                warn!("Cannot resolve file reference: {}", e);
                return AnalysisOutcome::failed(format!("Error: {}", e), None);
            }
        };
        if !document.is_accessible() {
            let e = AnalyzerError::FileNotAccessible {
                path: document.absolute_path,
            };
            warn!("{}", e);
            return AnalysisOutcome::failed(format!("Error: {}", e), None);
        }
        let path = document.absolute_path;
        info!("Resolved PDF path: {}", path.display());

        info!("Attempting direct PDF upload...");
        let direct_failure = match self.try_direct(&path, request).await {
            Ok(response) => {
                info!("Direct PDF upload succeeded (HTTP {})", response.status_code);
                return AnalysisOutcome::answered(response.answer_text, Strategy::Direct, None);
            }
            Err(e) => {
                warn!(
                    "Direct PDF upload failed ({:?}), falling back to text extraction: {}",
                    e.kind(),
                    e
                );
                e.to_string()
            }
        };

        match self.try_fallback(path, request).await {
            Ok(response) => {
                info!("Text extraction fallback succeeded (HTTP {})", response.status_code);
                AnalysisOutcome::answered(
                    response.answer_text,
                    Strategy::Fallback,
                    Some(direct_failure),
                )
            }
            Err(e) => {
                error!("Text extraction fallback failed ({:?}): {}", e.kind(), e);
                AnalysisOutcome::failed(format!("Error: {}", e), Some(direct_failure))
            }
        }
    }

    async fn try_direct(
        &self,
        path: &Path,
        request: &AnalysisRequest,
    ) -> Result<ModelResponse, AnalyzerError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|_| AnalyzerError::FileNotAccessible {
                path: path.to_path_buf(),
            })?;

        self.client
            .submit_document(&bytes, &request.instruction, &request.model_id)
            .await
    }

    async fn try_fallback(
        &self,
        path: PathBuf,
        request: &AnalysisRequest,
    ) -> Result<ModelResponse, AnalyzerError> {
        info!("Using text extraction fallback...");
        let text = self.extract_text(path).await?;
        info!("Extracted text from PDF. Length: {}", text.chars().count());

        let prompt = fallback_prompt(&request.instruction, &text);
        self.client.submit_chat(&prompt, &request.model_id).await
    }

    async fn extract_text(&self, path: PathBuf) -> Result<String, AnalyzerError> {
        let extractor = Arc::clone(&self.extractor);
        let task_path = path.clone();
        tokio::task::spawn_blocking(move || extractor.extract_text(&task_path))
            .await
            .unwrap_or_else(|e| {
                Err(AnalyzerError::UnreadableDocument {
                    path,
                    reason: format!("extraction task failed: {}", e),
                })
            })
    }
}

/// Instruction followed by the extracted document text.
pub fn fallback_prompt(instruction: &str, extracted_text: &str) -> String {
    format!("{}{}{}", instruction, CONTENT_SEPARATOR, extracted_text)
}

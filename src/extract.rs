//! Local PDF text extraction, used by the fallback strategy.

use std::path::Path;

use crate::error::AnalyzerError;

/// Something that can turn a PDF on disk into its linear text.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, in document order.
    fn extract_text(&self, path: &Path) -> Result<String, AnalyzerError>;
}

/// Extractor backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, AnalyzerError> {
        let bytes = std::fs::read(path).map_err(|_| AnalyzerError::FileNotAccessible {
            path: path.to_path_buf(),
        })?;

        // pdf-extract panics on some malformed inputs instead of returning an error.
        let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes));

        match result {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(AnalyzerError::UnreadableDocument {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
            Err(_) => Err(AnalyzerError::UnreadableDocument {
                path: path.to_path_buf(),
                reason: "PDF parser aborted on malformed input".to_string(),
            }),
        }
    }
}

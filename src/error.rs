//! Error kinds produced by the analysis pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Longest slice of a remote error body shown in a diagnostic.
const BODY_SNIPPET_CHARS: usize = 500;

/// Coarse classification of an [`AnalyzerError`], used in logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidReference,
    FileNotAccessible,
    UnreadableDocument,
    RemoteApi,
    UnexpectedResponseShape,
    Transport,
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid file reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("PDF file not found or not readable at: {}", .path.display())]
    FileNotAccessible { path: PathBuf },

    #[error("could not extract text from PDF {}: {reason}", .path.display())]
    UnreadableDocument { path: PathBuf, reason: String },

    #[error("{provider} API error: {status} - {}", snippet(.body))]
    RemoteApi {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("unexpected response format from {provider}: {detail}")]
    UnexpectedResponseShape {
        provider: &'static str,
        detail: String,
    },

    #[error("request to {target} failed: {reason}")]
    Transport { target: String, reason: String },
}

impl AnalyzerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::FileNotAccessible { .. } => ErrorKind::FileNotAccessible,
            Self::UnreadableDocument { .. } => ErrorKind::UnreadableDocument,
            Self::RemoteApi { .. } => ErrorKind::RemoteApi,
            Self::UnexpectedResponseShape { .. } => ErrorKind::UnexpectedResponseShape,
            Self::Transport { .. } => ErrorKind::Transport,
        }
    }
}

/// First line-safe slice of a response body, for one-line diagnostics.
fn snippet(body: &str) -> String {
    let flat: String = body
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let flat = flat.trim();
    if flat.chars().count() > BODY_SNIPPET_CHARS {
        let cut: String = flat.chars().take(BODY_SNIPPET_CHARS).collect();
        format!("{}...", cut)
    } else {
        flat.to_string()
    }
}

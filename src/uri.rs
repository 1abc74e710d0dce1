//! File reference resolution.
//!
//! Clients hand us PDFs as URI-like strings. Three shapes are accepted,
//! checked in this order:
//!
//! 1. `file:///path` (triple slash). A drive-letter path written as
//!    `file:///C:/...` loses the separator in front of the drive letter.
//! 2. `file://path` (double slash). The remainder is taken as the path.
//! 3. Anything else is parsed as a generic URI and must be a `file:` URI.
//!
//! Percent-decoding is best effort: invalid UTF-8 after decoding is logged
//! and replaced rather than rejected.

use std::fs::File;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::warn;
use url::Url;

use crate::error::AnalyzerError;
use crate::types::ResolvedDocument;

const TRIPLE_SLASH: &str = "file:///";
const DOUBLE_SLASH: &str = "file://";

/// Resolve a file reference into an absolute local path plus access flags.
pub fn resolve(reference: &str) -> Result<ResolvedDocument, AnalyzerError> {
    let path = normalize_reference(reference)?;
    let absolute_path = std::path::absolute(&path).map_err(|e| AnalyzerError::InvalidReference {
        reference: reference.to_string(),
        reason: format!("cannot make '{}' absolute: {}", path.display(), e),
    })?;

    let exists = absolute_path.exists();
    let readable = exists && is_readable_file(&absolute_path);

    Ok(ResolvedDocument {
        absolute_path,
        exists,
        readable,
    })
}

/// Turn a reference into a platform-native path without touching the filesystem.
pub fn normalize_reference(reference: &str) -> Result<PathBuf, AnalyzerError> {
    let reference = reference.trim();

    if reference.starts_with(TRIPLE_SLASH) {
        let mut rest = &reference[DOUBLE_SLASH.len()..];
        if has_separator_before_drive_letter(rest) {
            rest = &rest[1..];
        }
        return Ok(PathBuf::from(decode_path(&to_native_separators(rest))));
    }

    if let Some(rest) = reference.strip_prefix(DOUBLE_SLASH) {
        return Ok(PathBuf::from(decode_path(&to_native_separators(rest))));
    }

    let url = Url::parse(reference).map_err(|e| AnalyzerError::InvalidReference {
        reference: reference.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "file" {
        return Err(AnalyzerError::InvalidReference {
            reference: reference.to_string(),
            reason: format!("unsupported scheme '{}', expected a file URI", url.scheme()),
        });
    }
    url.to_file_path().map_err(|_| AnalyzerError::InvalidReference {
        reference: reference.to_string(),
        reason: "URI does not map to a local file path".to_string(),
    })
}

/// `/C:...` style paths, as produced by `file:///C:/...` URIs.
fn has_separator_before_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':'
}

fn to_native_separators(path: &str) -> String {
    path.replace('/', &MAIN_SEPARATOR.to_string())
}

fn decode_path(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            warn!("Failed to decode path '{}': {}", path, e);
            String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
        }
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_slash_unix_path() {
        let path = normalize_reference("file:///tmp/docs/a.pdf").unwrap();
        assert_eq!(path, PathBuf::from(format!("{0}tmp{0}docs{0}a.pdf", MAIN_SEPARATOR)));
    }

    #[test]
    fn test_drive_letter_separator_is_stripped() {
        let path = normalize_reference("file:///C:/docs/a.pdf").unwrap();
        let text = path.to_string_lossy();
        assert!(text.starts_with("C:"), "got {}", text);
        assert!(text.ends_with("a.pdf"));
    }

    #[test]
    fn test_encoded_space_is_decoded() {
        let path = normalize_reference("file:///tmp/my%20docs/a%20b.pdf").unwrap();
        let text = path.to_string_lossy();
        assert!(text.contains("my docs"));
        assert!(text.ends_with("a b.pdf"));
    }

    #[test]
    fn test_plus_is_not_treated_as_space() {
        let path = normalize_reference("file:///tmp/c++.pdf").unwrap();
        assert!(path.to_string_lossy().ends_with("c++.pdf"));
    }

    #[test]
    fn test_invalid_utf8_escape_is_best_effort() {
        let path = normalize_reference("file:///tmp/bad%FFname.pdf").unwrap();
        let text = path.to_string_lossy();
        assert!(text.starts_with(&format!("{0}tmp{0}bad", MAIN_SEPARATOR)));
        assert!(text.ends_with("name.pdf"));
    }

    #[test]
    fn test_double_slash_keeps_remainder() {
        let path = normalize_reference("file://docs/a.pdf").unwrap();
        assert_eq!(path, PathBuf::from(format!("docs{}a.pdf", MAIN_SEPARATOR)));
    }

    #[cfg(unix)]
    #[test]
    fn test_generic_file_uri() {
        let path = normalize_reference("file:/tmp/a%20b.pdf").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/a b.pdf"));
    }

    #[test]
    fn test_non_file_scheme_is_rejected() {
        let err = normalize_reference("https://example.com/a.pdf").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidReference);
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_unparseable_reference_is_rejected() {
        let err = normalize_reference("not a uri at all").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidReference);
    }

    #[cfg(unix)]
    #[test]
    fn test_all_shapes_resolve_to_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("same file.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        let raw = file.to_str().unwrap();
        let encoded = raw.replace(' ', "%20");

        let triple = resolve(&format!("file://{}", encoded)).unwrap();
        let unencoded = resolve(&format!("file://{}", raw)).unwrap();
        let generic = resolve(&format!("file:{}", encoded)).unwrap();
        let localhost = resolve(&format!("file://localhost{}", encoded));

        assert_eq!(triple.absolute_path, file);
        assert_eq!(unencoded.absolute_path, file);
        assert_eq!(generic.absolute_path, file);
        // `file://localhost/...` takes the double-slash branch and is not the same file.
        assert_ne!(localhost.unwrap().absolute_path, file);
        assert!(triple.exists && triple.readable);
    }

    #[test]
    fn test_relative_remainder_becomes_absolute() {
        let resolved = resolve("file://relative/dir/a.pdf").unwrap();
        assert!(resolved.absolute_path.is_absolute());
        assert!(!resolved.exists);
        assert!(!resolved.readable);
    }

    #[test]
    fn test_missing_file_is_reported_not_rejected() {
        let resolved = resolve("file:///tmp/__pdf_analyzer_no_such_file__.pdf").unwrap();
        assert!(!resolved.exists);
        assert!(!resolved.is_accessible());
    }

    #[test]
    fn test_directory_is_not_readable_document() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve(&format!("file://{}", dir.path().display())).unwrap();
        assert!(resolved.exists);
        assert!(!resolved.readable);
    }
}

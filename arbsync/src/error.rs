//! All error types for the arbsync crate.
//!
//! These are returned from all fallible operations (reading and writing ARB
//! files, language lookups, translation, key operations, etc.). Validation
//! findings are *not* errors; see [`crate::validation`].

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed error returned by translator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown language `{0}`")]
    UnknownLanguage(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("{found} placeholders found but only {capacity} sentinels are available")]
    PlaceholderPoolExhausted { found: usize, capacity: usize },

    #[error("translation failed: {message}")]
    Translation {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("key count mismatch: {old} old keys vs {new} new keys")]
    KeyCountMismatch { old: usize, new: usize },
}

/// Stable, machine-readable classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    FileNotFound,
    Parse,
    Io,
    Json,
    UnknownLanguage,
    InvalidDocument,
    PlaceholderPoolExhausted,
    Translation,
    KeyCountMismatch,
}

impl Error {
    /// Creates a parse error for `path` carrying the parser's message.
    pub fn parse_error(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates a new translation error with optional source error
    pub fn translation_error(message: impl Into<String>, source: Option<BoxError>) -> Self {
        Error::Translation {
            message: message.into(),
            source,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            Error::FileNotFound { .. } => ErrorCode::FileNotFound,
            Error::Parse { .. } => ErrorCode::Parse,
            Error::Io(_) => ErrorCode::Io,
            Error::Json(_) => ErrorCode::Json,
            Error::UnknownLanguage(_) => ErrorCode::UnknownLanguage,
            Error::InvalidDocument(_) => ErrorCode::InvalidDocument,
            Error::PlaceholderPoolExhausted { .. } => ErrorCode::PlaceholderPoolExhausted,
            Error::Translation { .. } => ErrorCode::Translation,
            Error::KeyCountMismatch { .. } => ErrorCode::KeyCountMismatch,
        }
    }

    /// Wraps any error raised while translating a batch into a single
    /// [`Error::Translation`]. Translation errors pass through untouched.
    pub(crate) fn into_translation_failure(self) -> Self {
        match self {
            Error::Translation { .. } => self,
            other => Error::Translation {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_file_not_found_error() {
        let error = Error::FileNotFound {
            path: PathBuf::from("l10n/intl_en.arb"),
        };
        assert_eq!(error.to_string(), "file not found: l10n/intl_en.arb");
        assert_eq!(error.error_code(), ErrorCode::FileNotFound);
    }

    #[test]
    fn test_parse_error_carries_path_and_message() {
        let error = Error::parse_error("intl_fr.arb", "expected value at line 1 column 2");
        let display = error.to_string();
        assert!(display.contains("intl_fr.arb"));
        assert!(display.contains("expected value"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_translation_error_with_source() {
        let source_error = Box::new(io::Error::other("backend down"));
        let error = Error::translation_error("request failed", Some(source_error));
        assert_eq!(error.to_string(), "translation failed: request failed");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_pool_exhaustion_wraps_into_translation_failure() {
        let error = Error::PlaceholderPoolExhausted {
            found: 11,
            capacity: 10,
        }
        .into_translation_failure();
        assert_eq!(error.error_code(), ErrorCode::Translation);
        assert!(error.to_string().contains("11 placeholders"));
    }

    #[test]
    fn test_translation_failure_is_not_double_wrapped() {
        let error = Error::translation_error("boom", None).into_translation_failure();
        assert_eq!(error.to_string(), "translation failed: boom");
    }

    #[test]
    fn test_key_count_mismatch_display() {
        let error = Error::KeyCountMismatch { old: 2, new: 3 };
        assert_eq!(
            error.to_string(),
            "key count mismatch: 2 old keys vs 3 new keys"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownLanguage("xx".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownLanguage"));
        assert!(debug.contains("xx"));
    }
}

//! Error types for unocr library.

use std::io;
use thiserror::Error;

/// Result type alias for unocr operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing OCR text.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input document is not valid JSON for the document schema.
    #[error("Document parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document contains no words, so no body font can be determined.
    #[error("Document is empty: no word elements found")]
    EmptyDocument,

    /// A font uses a size unit other than pixels.
    #[error("Font {font} uses unsupported size unit {unit:?} (expected \"px\")")]
    UnsupportedFontUnit {
        /// Font id
        font: String,
        /// The offending unit
        unit: String,
    },

    /// A word references a font missing from the font table.
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    /// Two elements share the same id.
    #[error("Duplicate element id: {0}")]
    DuplicateElementId(u64),

    /// The scorer returned a different number of scores than candidates.
    #[error("Scorer returned {actual} scores for {expected} candidates")]
    ScoreCount {
        /// Number of candidates submitted
        expected: usize,
        /// Number of scores returned
        actual: usize,
    },

    /// The scorer returned a score that cannot be ranked.
    #[error("Scorer returned invalid score {score} at position {index}")]
    InvalidScore {
        /// Candidate position
        index: usize,
        /// The returned value
        score: f64,
    },

    /// The scoring service is temporarily unavailable (retryable).
    #[error("Scorer unavailable: {0}")]
    ScorerUnavailable(String),

    /// The scoring service rejected the request.
    #[error("Scorer error: {0}")]
    Scorer(String),

    /// Decision cache failure.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether retrying the failed operation may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::ScorerUnavailable(_) => true,
            Error::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut
                    | io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::EmptyDocument;
        assert_eq!(err.to_string(), "Document is empty: no word elements found");

        let err = Error::ScoreCount {
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Scorer returned 2 scores for 3 candidates");

        let err = Error::UnsupportedFontUnit {
            font: "font_0".to_string(),
            unit: "pt".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Font font_0 uses unsupported size unit \"pt\" (expected \"px\")"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::ScorerUnavailable("503".into()).is_transient());
        assert!(!Error::Scorer("bad request".into()).is_transient());
        let timeout: Error = io::Error::new(io::ErrorKind::TimedOut, "slow").into();
        assert!(timeout.is_transient());
    }
}

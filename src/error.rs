//! Error types
//!
//! Every failure class the pipeline can hit has its own variant so callers
//! (and tests) can tell an unreadable file from a crashed parser from a
//! missing capability. The extraction boundary collapses these to `None`;
//! they never escape `FormatExtractor::extract` or `ImageFallbackChain::label_image`.

use std::path::PathBuf;

/// Why a single file produced no text
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF parser panicked on {0} - likely malformed fonts or structure")]
    PdfPanicked(PathBuf),

    #[error("image decode failed: {0}")]
    ImageDecode(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("metadata read failed: {0}")]
    Metadata(String),

    #[error("capability not available: {0}")]
    CapabilityMissing(&'static str),

    #[error("no text content")]
    Empty,
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failures in the resolve/move half of the pipeline
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    #[error("{0} has no parent directory")]
    NoParent(PathBuf),

    #[error("gave up after {attempts} collisions for '{name}' in {parent}")]
    TooManyCollisions {
        parent: PathBuf,
        name: String,
        attempts: u32,
    },

    #[error("source does not exist: {0}")]
    SourceMissing(PathBuf),

    #[error("destination already exists: {0}")]
    DestinationExists(PathBuf),

    /// Copy finished but the source could only be partly removed
    #[error("copied {from} to {to} but could not remove the source: {source}")]
    SourceNotRemoved {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the naming service
#[derive(Debug, thiserror::Error)]
pub enum NamingError {
    #[error("API key not found: set OPENAI_API_KEY or store one in the keychain")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("response contained no usable name")]
    EmptyResponse,
}

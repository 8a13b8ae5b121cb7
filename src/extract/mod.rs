//! Per-file text extraction
//!
//! ## Supported Formats
//! - Text: .txt, .md, .rst, .csv, .json, source files (direct read)
//! - PDF: first pages via pdf-extract
//! - Images: OCR through the image fallback chain, when OCR is available
//!
//! [`FormatExtractor::extract`] never fails: every error is logged and turned
//! into `None`. [`FormatExtractor::try_extract`] keeps the typed error.

pub mod format;
pub mod pdf;
pub mod plain_text;

use std::path::Path;

use crate::error::ExtractError;
use crate::vision::ImageFallbackChain;

pub use format::FileFormat;

/// Extracts a bounded text excerpt from one file
pub struct FormatExtractor {
    images: ImageFallbackChain,
}

impl FormatExtractor {
    pub fn new(images: ImageFallbackChain) -> Self {
        Self { images }
    }

    /// The image chain, shared with the orchestrator's image fallback
    pub fn image_chain(&self) -> &ImageFallbackChain {
        &self.images
    }

    /// Non-empty text of at most `max_chars` characters, or `None`
    pub fn extract(&self, path: &Path, max_chars: usize) -> Option<String> {
        match self.try_extract(path, max_chars) {
            Ok(text) => Some(text),
            Err(ExtractError::Unsupported(_)) | Err(ExtractError::Empty) => None,
            Err(e) => {
                tracing::debug!("[Extract] Skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Same as [`extract`](Self::extract) but reports why nothing came out
    pub fn try_extract(&self, path: &Path, max_chars: usize) -> Result<String, ExtractError> {
        if !path.is_file() {
            return Err(ExtractError::NotAFile(path.to_path_buf()));
        }

        let text = match FileFormat::from_path(path) {
            FileFormat::PlainText => plain_text::read_plain_text(path, max_chars)?,
            FileFormat::Pdf => pdf::extract_pdf_text(path, max_chars)?,
            FileFormat::Image => self.images.ocr_text(path, max_chars)?,
            FileFormat::Unsupported => {
                return Err(ExtractError::Unsupported(
                    path.extension()
                        .map(|e| e.to_string_lossy().to_string())
                        .unwrap_or_default(),
                ))
            }
        };

        if text.is_empty() {
            return Err(ExtractError::Empty);
        }
        Ok(text)
    }
}

//! OCR engines
//!
//! The default engine shells out to the `tesseract` binary. The image is
//! decoded and downsized here first so tesseract always receives a sane PNG.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::ExtractError;

/// Maximum image dimension (width or height) handed to OCR
const MAX_DIMENSION: u32 = 2400;

/// Recognizes text in an image file. An empty string is a valid answer.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Tesseract command-line engine
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: String,
    language: String,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether the binary can be executed at all
    pub fn is_available(&self) -> bool {
        duct::cmd(self.binary.as_str(), ["--version"])
            .stdout_null()
            .stderr_null()
            .run()
            .is_ok()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, path: &Path) -> Result<String, ExtractError> {
        let png = prepare_image_for_ocr(path)?;

        let text = duct::cmd(
            self.binary.as_str(),
            ["stdin", "stdout", "-l", self.language.as_str()],
        )
        .stdin_bytes(png)
        .stderr_null()
        .read()
        .map_err(|e| ExtractError::Ocr(e.to_string()))?;

        tracing::debug!("[OCR] {} chars from {}", text.chars().count(), path.display());
        Ok(text)
    }
}

/// Decode, downsize if needed, and re-encode as PNG
fn prepare_image_for_ocr(path: &Path) -> Result<Vec<u8>, ExtractError> {
    let img = image::open(path).map_err(|e| ExtractError::ImageDecode(e.to_string()))?;
    let img = resize_if_needed(img);

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ExtractError::ImageDecode(format!("Failed to encode image: {}", e)))?;

    Ok(buffer.into_inner())
}

/// Resize image if it exceeds maximum dimensions
fn resize_if_needed(img: DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return img;
    }

    let scale = MAX_DIMENSION as f32 / width.max(height) as f32;
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resize_large_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4800, 1200));
        let resized = resize_if_needed(img);
        assert_eq!(resized.width(), MAX_DIMENSION);
        assert!(resized.height() <= MAX_DIMENSION);
    }

    #[test]
    fn test_small_image_untouched() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        let resized = resize_if_needed(img);
        assert_eq!((resized.width(), resized.height()), (640, 480));
    }

    #[test]
    fn test_undecodable_image_is_decode_error() {
        let mut file = NamedTempFile::with_suffix(".png").unwrap();
        file.write_all(b"\x00\x01").unwrap();

        let result = prepare_image_for_ocr(file.path());
        assert!(matches!(result, Err(ExtractError::ImageDecode(_))));
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let engine = TesseractOcr {
            binary: "definitely-not-a-real-ocr-binary".to_string(),
            language: "eng".to_string(),
        };
        assert!(!engine.is_available());
    }

    #[test]
    fn test_language_override() {
        let engine = TesseractOcr::new().with_language("deu+eng");
        assert_eq!(engine.language, "deu+eng");
        assert_eq!(engine.binary, "tesseract");
    }
}

//! File format classification by extension

use std::path::Path;

/// Format family a file is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Read directly as (lossy) UTF-8
    PlainText,
    /// Text layer of the first pages
    Pdf,
    /// Raster image, handled by OCR
    Image,
    /// Anything else
    Unsupported,
}

impl FileFormat {
    /// Classify a path by its extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase());

        match ext.as_deref() {
            Some(e) if Self::is_plain_text_ext(e) => FileFormat::PlainText,
            Some("pdf") => FileFormat::Pdf,
            Some(e) if Self::is_image_ext(e) => FileFormat::Image,
            _ => FileFormat::Unsupported,
        }
    }

    /// Check if extension is plain text
    fn is_plain_text_ext(ext: &str) -> bool {
        matches!(
            ext,
            "txt" | "md" | "rst" | "csv" | "json" | "py" | "xml" | "html" | "htm" | "yaml"
                | "yml" | "log" | "ini" | "cfg" | "toml" | "rs" | "js" | "ts" | "sh"
        )
    }

    fn is_image_ext(ext: &str) -> bool {
        matches!(ext, "png" | "jpg" | "jpeg" | "bmp" | "tiff" | "tif")
    }

    pub fn is_image(path: &Path) -> bool {
        Self::from_path(path) == FileFormat::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_is_case_insensitive() {
        assert_eq!(FileFormat::from_path(Path::new("a/NOTES.TXT")), FileFormat::PlainText);
        assert_eq!(FileFormat::from_path(Path::new("Report.PDF")), FileFormat::Pdf);
        assert_eq!(FileFormat::from_path(Path::new("IMG_001.JPG")), FileFormat::Image);
    }

    #[test]
    fn test_source_and_structured_text() {
        for name in ["main.py", "data.json", "table.csv", "index.rst", "README.md"] {
            assert_eq!(FileFormat::from_path(Path::new(name)), FileFormat::PlainText, "{}", name);
        }
    }

    #[test]
    fn test_images() {
        for name in ["a.png", "a.jpeg", "a.bmp", "a.tiff", "a.tif"] {
            assert!(FileFormat::is_image(Path::new(name)), "{}", name);
        }
        assert!(!FileFormat::is_image(Path::new("a.gif")));
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(FileFormat::from_path(Path::new("setup.exe")), FileFormat::Unsupported);
        assert_eq!(FileFormat::from_path(Path::new("Makefile")), FileFormat::Unsupported);
        assert_eq!(FileFormat::from_path(Path::new(".hidden")), FileFormat::Unsupported);
    }
}

//! PDF text extraction via pdf-extract
//!
//! Only the first few pages are considered; a folder's name rarely depends on
//! page 40 of a manual.

use std::path::Path;

use crate::error::ExtractError;
use crate::utils::{char_len, truncate_chars};

/// Pages read from the start of each PDF
pub const MAX_PDF_PAGES: usize = 3;

/// Extract text from the first pages of a PDF.
/// Wrapped in catch_unwind: pdf-extract (and its font parsers) can panic on
/// malformed input.
pub fn extract_pdf_text(path: &Path, max_chars: usize) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;

    tracing::debug!("[Extract] PDF file size: {} bytes ({})", bytes.len(), path.display());

    let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            tracing::debug!("[Extract] PDF extraction failed for {}: {}", path.display(), e);
            return Err(ExtractError::Pdf(e.to_string()));
        }
        Err(_panic) => {
            tracing::warn!(
                "[Extract] PDF extraction panicked for {} - likely malformed font/glyph",
                path.display()
            );
            return Err(ExtractError::PdfPanicked(path.to_path_buf()));
        }
    };

    let text = join_leading_pages(&pages, max_chars);

    tracing::debug!(
        "[Extract] PDF: {} pages available, {} chars kept from {}",
        pages.len(),
        char_len(&text),
        path.display()
    );

    Ok(text)
}

/// Join at most [`MAX_PDF_PAGES`] pages with newlines, stopping once the
/// accumulated page text reaches `max_chars`, then truncate.
pub(crate) fn join_leading_pages(pages: &[String], max_chars: usize) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut accumulated = 0;

    for page in pages.iter().take(MAX_PDF_PAGES) {
        kept.push(page);
        accumulated += char_len(page);
        if accumulated >= max_chars {
            break;
        }
    }

    let joined = kept.join("\n");
    truncate_chars(&joined, max_chars).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_only_first_three_pages() {
        let text = join_leading_pages(&pages(&["one", "two", "three", "four"]), 1000);
        assert_eq!(text, "one\ntwo\nthree");
    }

    #[test]
    fn test_stops_once_budget_reached() {
        let text = join_leading_pages(&pages(&["abcdef", "ghi", "jkl"]), 5);
        assert_eq!(text, "abcde");
    }

    #[test]
    fn test_stops_after_page_that_fills_budget() {
        // 4 + 4 >= 8: the third page is never added
        let text = join_leading_pages(&pages(&["abcd", "efgh", "ijkl"]), 8);
        assert_eq!(text, "abcd\nefg");
    }

    fn fixture(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    #[test]
    fn test_extracts_page_text() {
        let text = extract_pdf_text(&fixture("invoice.pdf"), 2000).unwrap();
        assert!(text.contains("Invoice"), "{:?}", text);
        assert!(text.contains("Acme"), "{:?}", text);
    }

    #[test]
    fn test_page_text_respects_budget() {
        let text = extract_pdf_text(&fixture("invoice.pdf"), 4).unwrap();
        assert!(char_len(&text) <= 4);
    }

    #[test]
    fn test_corrupt_pdf_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(b"%PDF-1.4\nthis is not really a pdf").unwrap();

        let result = extract_pdf_text(file.path(), 100);
        assert!(matches!(
            result,
            Err(ExtractError::Pdf(_)) | Err(ExtractError::PdfPanicked(_))
        ));
    }
}

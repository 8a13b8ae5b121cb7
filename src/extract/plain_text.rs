use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ExtractError;
use crate::utils::truncate_chars;

/// Worst-case UTF-8 width; bounds how many bytes we read for `max_chars`
const MAX_UTF8_WIDTH: u64 = 4;

/// Read at most `max_chars` characters, replacing undecodable bytes
pub fn read_plain_text(path: &Path, max_chars: usize) -> Result<String, ExtractError> {
    let file = File::open(path).map_err(|e| ExtractError::io(path, e))?;

    let mut bytes = Vec::new();
    file.take((max_chars as u64).saturating_mul(MAX_UTF8_WIDTH))
        .read_to_end(&mut bytes)
        .map_err(|e| ExtractError::io(path, e))?;

    let text = String::from_utf8_lossy(&bytes);
    let text = truncate_chars(&text, max_chars).to_string();

    tracing::debug!(
        "[Extract] Direct read: {} bytes -> {} chars from {}",
        bytes.len(),
        text.chars().count(),
        path.display()
    );

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(b"ok \xff\xfe bytes").unwrap();

        let text = read_plain_text(file.path(), 100).unwrap();
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" bytes"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_multibyte_budget() {
        let mut file = NamedTempFile::with_suffix(".md").unwrap();
        file.write_all("ééééé".as_bytes()).unwrap();

        let text = read_plain_text(file.path(), 3).unwrap();
        assert_eq!(text, "ééé");
    }

    #[test]
    fn test_unbounded_budget_reads_whole_file() {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(b"Invoices and billing details").unwrap();

        let text = read_plain_text(file.path(), usize::MAX).unwrap();
        assert_eq!(text, "Invoices and billing details");
    }
}

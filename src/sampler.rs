//! Folder sampling
//!
//! Walks a folder depth-first (each directory's files by name, then its
//! subdirectories by name, so the order is the same on every platform) and
//! collects text excerpts until the
//! sample budget is spent. The walk is lazy: once `max_files` samples exist,
//! nothing further is read.

use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::extract::FormatExtractor;

/// A text excerpt from one file, labeled with its path relative to the folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub label: String,
    pub text: String,
}

impl Sample {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Header plus excerpt, as shown to the naming service
    pub fn to_prompt_text(&self) -> String {
        format!("--- {} ---\n{}", self.label, self.text)
    }
}

/// Collects samples from a folder tree through a [`FormatExtractor`]
pub struct FolderSampler<'a> {
    extractor: &'a FormatExtractor,
}

impl<'a> FolderSampler<'a> {
    pub fn new(extractor: &'a FormatExtractor) -> Self {
        Self { extractor }
    }

    /// At most `max_files` samples, each at most `chars_per_file` characters.
    /// Returns an empty list when `folder` is not a directory.
    pub fn sample(&self, folder: &Path, max_files: usize, chars_per_file: usize) -> Vec<Sample> {
        let mut samples = Vec::new();

        if !folder.is_dir() {
            tracing::debug!("[Sampler] Not a directory: {}", folder.display());
            return samples;
        }
        if max_files == 0 {
            return samples;
        }

        for entry in walk_files(folder) {
            let path = entry.path();
            let Some(text) = self.extractor.extract(path, chars_per_file) else {
                continue;
            };
            if text.trim().is_empty() {
                continue;
            }

            samples.push(Sample::new(relative_label(folder, path), text));

            if samples.len() >= max_files {
                tracing::debug!(
                    "[Sampler] Budget of {} samples reached in {}",
                    max_files,
                    folder.display()
                );
                break;
            }
        }

        tracing::debug!("[Sampler] {} samples from {}", samples.len(), folder.display());
        samples
    }
}

/// Regular files under `root`, depth-first. At every level a directory's own
/// files come first, by name, then its subdirectories, by name.
/// Unreadable entries are skipped. Symlinks are not followed.
pub(crate) fn walk_files(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("[Sampler] Walk error: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
}

fn relative_label(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(PathBuf::from)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::vision::{ImageFallbackChain, OcrEngine};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn extractor() -> FormatExtractor {
        FormatExtractor::new(ImageFallbackChain::empty(2000))
    }

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_not_a_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "hello");
        let extractor = extractor();
        let sampler = FolderSampler::new(&extractor);

        assert!(sampler.sample(&dir.path().join("a.txt"), 8, 100).is_empty());
        assert!(sampler.sample(&dir.path().join("missing"), 8, 100).is_empty());
    }

    #[test]
    fn test_caps_count_and_size() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write(dir.path(), &format!("sub{}/file{:02}.txt", i % 3, i), &"word ".repeat(200));
        }
        let extractor = extractor();
        let sampler = FolderSampler::new(&extractor);

        let samples = sampler.sample(dir.path(), 5, 50);
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|s| s.text.chars().count() <= 50));
    }

    #[test]
    fn test_own_files_before_subdirectories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "a/z.md", "az");
        write(dir.path(), "a/nested/y.txt", "any");
        write(dir.path(), "c.csv", "c");

        let extractor = extractor();
        let labels: Vec<String> = FolderSampler::new(&extractor)
            .sample(dir.path(), 10, 100)
            .into_iter()
            .map(|s| s.label.replace('\\', "/"))
            .collect();

        assert_eq!(labels, vec!["b.txt", "c.csv", "a/z.md", "a/nested/y.txt"]);
    }

    #[test]
    fn test_budget_takes_top_level_files_first() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.txt", "b");
        write(dir.path(), "c.csv", "c");
        write(dir.path(), "a/z.md", "az");

        let extractor = extractor();
        let labels: Vec<String> = FolderSampler::new(&extractor)
            .sample(dir.path(), 2, 100)
            .into_iter()
            .map(|s| s.label)
            .collect();

        assert_eq!(labels, vec!["b.txt", "c.csv"]);
    }

    /// Counts every file handed to OCR
    struct CountingOcr(Arc<AtomicUsize>);

    impl OcrEngine for CountingOcr {
        fn recognize(&self, path: &Path) -> Result<String, ExtractError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(format!("text of {}", path.display()))
        }
    }

    #[test]
    fn test_stops_extracting_once_budget_reached() {
        let dir = TempDir::new().unwrap();
        for name in ["a.png", "b.png", "c.png", "d.png", "e.png"] {
            write(dir.path(), name, "not really an image");
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let chain = ImageFallbackChain::builder(2000)
            .ocr(Box::new(CountingOcr(Arc::clone(&calls))))
            .build();
        let extractor = FormatExtractor::new(chain);

        let samples = FolderSampler::new(&extractor).sample(dir.path(), 2, 100);

        assert_eq!(samples.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_skips_unsupported_and_blank_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "blank.txt", "   \n\t ");
        write(dir.path(), "binary.exe", "MZ");
        write(dir.path(), "notes.txt", "Invoices and billing details for Acme Corp");

        let extractor = extractor();
        let samples = FolderSampler::new(&extractor).sample(dir.path(), 8, 2000);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].label, "notes.txt");
        assert_eq!(samples[0].text, "Invoices and billing details for Acme Corp");
    }

    #[test]
    fn test_zero_budget() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "a");
        let extractor = extractor();
        assert!(FolderSampler::new(&extractor).sample(dir.path(), 0, 100).is_empty());
    }

    #[test]
    fn test_prompt_text_has_header() {
        let sample = Sample::new("docs/readme.md", "Hello");
        assert_eq!(sample.to_prompt_text(), "--- docs/readme.md ---\nHello");
    }
}

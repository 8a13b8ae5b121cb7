//! Semantic image labeling
//!
//! There is no label vocabulary or embedding model behind this yet, so the
//! labeler always answers with no labels. It stays in the chain as the last
//! strategy so the ordering is explicit.

use std::path::Path;

/// Label lookup that always comes back empty
#[derive(Debug, Clone, Default)]
pub struct SemanticLabeler;

impl SemanticLabeler {
    pub fn new() -> Self {
        Self
    }

    /// Candidate labels for an image, best first
    pub fn labels(&self, path: &Path) -> Vec<String> {
        tracing::trace!("[Semantic] no label model; skipping {}", path.display());
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_always_empty() {
        assert!(SemanticLabeler::new().labels(Path::new("beach.jpg")).is_empty());
    }
}

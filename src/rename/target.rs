//! Collision-free target paths

use std::path::{Path, PathBuf};

use crate::error::RenameError;

/// Upper bound on `_<n>` probes before giving up
pub const DEFAULT_MAX_PROBES: u32 = 100_000;

/// Finds the first free sibling name: `name`, then `name_1`, `name_2`, ...
#[derive(Debug, Clone, Copy)]
pub struct TargetResolver {
    max_probes: u32,
}

impl Default for TargetResolver {
    fn default() -> Self {
        Self {
            max_probes: DEFAULT_MAX_PROBES,
        }
    }
}

impl TargetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_probes(mut self, max_probes: u32) -> Self {
        self.max_probes = max_probes;
        self
    }

    /// Resolve `parent/desired` to a path with no existing entry.
    /// Only existence checks touch the filesystem.
    pub fn resolve(&self, parent: &Path, desired: &str) -> Result<PathBuf, RenameError> {
        let candidate = parent.join(desired);
        if !entry_exists(&candidate) {
            return Ok(candidate);
        }

        for i in 1..=self.max_probes {
            let candidate = parent.join(format!("{}_{}", desired, i));
            if !entry_exists(&candidate) {
                tracing::debug!("[Resolve] '{}' taken, using suffix _{}", desired, i);
                return Ok(candidate);
            }
        }

        Err(RenameError::TooManyCollisions {
            parent: parent.to_path_buf(),
            name: desired.to_string(),
            attempts: self.max_probes,
        })
    }
}

/// True for any entry, including dangling symlinks
pub(crate) fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_free_name_unchanged() {
        let dir = TempDir::new().unwrap();
        let target = TargetResolver::new().resolve(dir.path(), "Invoices").unwrap();
        assert_eq!(target, dir.path().join("Invoices"));
    }

    #[test]
    fn test_existing_gets_first_suffix() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Invoices")).unwrap();

        let target = TargetResolver::new().resolve(dir.path(), "Invoices").unwrap();
        assert!(target.ends_with("Invoices_1"));
    }

    #[test]
    fn test_skips_taken_suffixes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Invoices")).unwrap();
        fs::create_dir(dir.path().join("Invoices_1")).unwrap();
        fs::write(dir.path().join("Invoices_2"), "a file counts too").unwrap();

        let target = TargetResolver::new().resolve(dir.path(), "Invoices").unwrap();
        assert!(target.ends_with("Invoices_3"));
    }

    #[test]
    fn test_does_not_create_anything() {
        let dir = TempDir::new().unwrap();
        let target = TargetResolver::new().resolve(dir.path(), "Reports").unwrap();
        assert!(!target.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_probe_cap() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("x")).unwrap();
        fs::create_dir(dir.path().join("x_1")).unwrap();
        fs::create_dir(dir.path().join("x_2")).unwrap();

        let result = TargetResolver::new().with_max_probes(2).resolve(dir.path(), "x");
        assert!(matches!(
            result,
            Err(RenameError::TooManyCollisions { attempts: 2, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_counts_as_taken() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("Photos")).unwrap();

        let target = TargetResolver::new().resolve(dir.path(), "Photos").unwrap();
        assert!(target.ends_with("Photos_1"));
    }
}

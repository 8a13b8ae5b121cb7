//! Folder discovery

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Immediate subdirectories of `target`, sorted by name. With
/// `include_root`, `target` itself comes first so loose files in it get a
/// name too. Symlinked directories are not followed.
pub fn find_folders(target: &Path, include_root: bool) -> io::Result<Vec<PathBuf>> {
    let mut folders = Vec::new();

    for entry in fs::read_dir(target)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("[Scan] Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            folders.push(entry.path());
        }
    }

    folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if include_root {
        folders.insert(0, target.to_path_buf());
    }

    tracing::debug!("[Scan] {} folders under {}", folders.len(), target.display());
    Ok(folders)
}

//! Directory moves
//!
//! A plain `rename` when source and destination share a filesystem; otherwise
//! a recursive copy followed by removal of the source. A failed copy never
//! leaves a half-written destination behind.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::RenameError;
use crate::rename::target::entry_exists;

/// Move the directory `from` to `to`. `to` must not exist yet.
pub fn move_dir(from: &Path, to: &Path) -> Result<(), RenameError> {
    if !from.is_dir() {
        return Err(RenameError::SourceMissing(from.to_path_buf()));
    }

    if entry_exists(to) {
        return Err(RenameError::DestinationExists(to.to_path_buf()));
    }

    // Try rename first (same filesystem), fall back to copy+delete
    match fs::rename(from, to) {
        Ok(()) => {
            tracing::debug!("[Move] Renamed {} -> {}", from.display(), to.display());
            Ok(())
        }
        Err(rename_err) => {
            tracing::debug!(
                "[Move] rename failed ({}), copying {} -> {}",
                rename_err,
                from.display(),
                to.display()
            );
            copy_then_remove(from, to)
        }
    }
}

pub(crate) fn copy_then_remove(from: &Path, to: &Path) -> Result<(), RenameError> {
    copy_then_remove_with(from, to, |p| fs::remove_dir_all(p))
}

fn copy_then_remove_with<R>(from: &Path, to: &Path, remove_source: R) -> Result<(), RenameError>
where
    R: FnOnce(&Path) -> io::Result<()>,
{
    let move_err = |source: io::Error| RenameError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Err(e) = copy_dir_all(from, to) {
        // Only clean up what this call created
        if to.is_dir() {
            if let Err(cleanup) = fs::remove_dir_all(to) {
                tracing::warn!(
                    "[Move] Could not remove partial copy {}: {}",
                    to.display(),
                    cleanup
                );
            }
        }
        if !from.is_dir() {
            tracing::warn!("[Move] Source vanished during failed move: {}", from.display());
        }
        return Err(move_err(e));
    }

    // `to` is complete from here on; `from` may end up partly removed
    remove_source(from).map_err(|e| {
        tracing::warn!(
            "[Move] Copied to {} but could not remove source {}: {}",
            to.display(),
            from.display(),
            e
        );
        RenameError::SourceNotRemoved {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        }
    })
}

/// Copy a directory recursively. The top-level destination must not exist.
fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;

        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else if ty.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}

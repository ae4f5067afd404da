//! Filesystem mutations used by the engine's actions
//!
//! Every function maps failures to [`Error::Io`] carrying the offending path.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result};

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Rename `from` to `to` within the same directory.
///
/// This is a single `rename(2)` and therefore atomic on the same volume.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|e| Error::io(from, e))
}

/// Move `from` to `to`, creating missing parents.
///
/// Tries an atomic rename first and falls back to copy-then-remove when the
/// destination lives on another device.
pub fn move_path(from: &Path, to: &Path) -> Result<()> {
    ensure_parent(to)?;
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            tracing::debug!(from = %from.display(), to = %to.display(), "cross-device move, copying");
            copy_path(from, to)?;
            remove_path(from)
        }
        Err(e) => Err(Error::io(from, e)),
    }
}

/// Copy a file or a whole directory tree from `from` to `to`.
pub fn copy_path(from: &Path, to: &Path) -> Result<()> {
    ensure_parent(to)?;
    let metadata = fs::metadata(from).map_err(|e| Error::io(from, e))?;
    if !metadata.is_dir() {
        fs::copy(from, to).map_err(|e| Error::io(from, e))?;
        return Ok(());
    }

    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            Error::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Permanently remove a file, symlink or directory tree.
pub fn remove_path(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
    } else {
        fs::remove_file(path).map_err(|e| Error::io(path, e))
    }
}

//! Deterministic path helpers

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Split a path's file name into stem and suffix.
///
/// The suffix keeps its leading dot and only covers the last extension, so
/// `archive.tar.gz` splits into `("archive.tar", ".gz")` and a dotfile such
/// as `.bashrc` has no suffix at all.
pub fn split_name(path: &Path) -> (OsString, OsString) {
    let stem = path.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    let mut suffix = OsString::new();
    if let Some(extension) = path.extension() {
        suffix.push(".");
        suffix.push(extension);
    }
    (stem, suffix)
}

/// Find a sibling of `desired` that `exists` reports as free.
///
/// Returns `desired` itself when it is free, otherwise probes
/// `stem (1).ext`, `stem (2).ext`, ... in increasing order and returns the
/// first free candidate. The probe order is fixed, so the result only depends
/// on what `exists` reports.
pub fn find_unused_filename(desired: &Path, exists: impl Fn(&Path) -> bool) -> PathBuf {
    if !exists(desired) {
        return desired.to_path_buf();
    }

    let (stem, suffix) = split_name(desired);
    let mut counter: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!(" ({counter})"));
        name.push(&suffix);

        let candidate = desired.with_file_name(name);
        if !exists(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Expand a leading `~` component to the current user's home directory.
///
/// Paths that do not start with a bare `~` component (including `~other`)
/// are returned unchanged.
pub fn expand_user(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(Error::HomeDirNotFound)?;
            if rest.as_os_str().is_empty() {
                Ok(home)
            } else {
                Ok(home.join(rest))
            }
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}

/// Check whether two paths refer to the same filesystem object.
///
/// A case-only difference on a case-insensitive filesystem counts as the
/// same object. Paths that cannot be inspected are never the same.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        match (std::fs::metadata(a), std::fs::metadata(b)) {
            (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
            _ => false,
        }
    }

    #[cfg(not(unix))]
    {
        match (dunce::canonicalize(a), dunce::canonicalize(b)) {
            (Ok(ca), Ok(cb)) => ca == cb,
            _ => false,
        }
    }
}

/// Remove `.` components and fold `..` into the preceding component.
///
/// Purely lexical: symlinks are not consulted. `..` at the root stays at the
/// root; leading `..` of a relative path are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Check whether a file name contains a platform path separator.
pub fn contains_separator(name: &str) -> bool {
    name.chars().any(std::path::is_separator)
}

/// Whether `path` ends in a separator, marking it as a directory.
pub fn is_separator_terminated(path: &str) -> bool {
    path.chars().last().is_some_and(std::path::is_separator)
}

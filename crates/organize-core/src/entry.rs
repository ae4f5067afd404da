//! Filesystem entry under evaluation

use std::borrow::Cow;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use organize_fs::Error as FsError;

use crate::Result;

/// One file or directory discovered under a location.
///
/// During a simulation an entry may only exist in the overlay, for example
/// after an earlier rule moved it. Its content then still lives at the
/// original place on disk, which is what metadata is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
    basedir: PathBuf,
    content: Option<PathBuf>,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>, basedir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            basedir: basedir.into(),
            content: None,
        }
    }

    /// Read metadata from `content` instead of the entry's own path.
    pub fn with_content(mut self, content: impl Into<PathBuf>) -> Self {
        let content = content.into();
        self.content = (content != self.path).then_some(content);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the entry's data is on disk.
    pub fn content_path(&self) -> &Path {
        self.content.as_deref().unwrap_or(&self.path)
    }

    /// Root of the location this entry was discovered under.
    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Full file name, lossily decoded. Valid UTF-8 names come back untouched.
    pub fn name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    pub fn stem(&self) -> Cow<'_, str> {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    /// Extension without the leading dot.
    pub fn extension(&self) -> Option<Cow<'_, str>> {
        self.path.extension().map(|e| e.to_string_lossy())
    }

    pub fn metadata(&self) -> Result<Metadata> {
        let content = self.content_path();
        std::fs::metadata(content).map_err(|e| FsError::io(content, e).into())
    }
}

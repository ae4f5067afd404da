//! Action capability and built-in actions
//!
//! An action receives the entry's *current* path and returns where the entry
//! lives afterwards, so each action in a chain operates on the result of the
//! previous one. All filesystem effects go through [`FileOps`], which makes
//! the same code path serve real and simulated runs.

mod delete;
mod echo;
mod relocate;
mod rename;
mod trash;

pub use delete::Delete;
pub use echo::Echo;
pub use relocate::{Copy, Move};
pub use rename::Rename;
pub use trash::Trash;

use std::fmt;
use std::path::{Path, PathBuf};

use organize_fs::TrashBin;

use crate::{AttributeMap, FileOps, Result};

/// What an action did to the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Entry location afterwards; `None` once the entry is gone
    pub path: Option<PathBuf>,
    /// Human-readable description for the run report
    pub summary: String,
}

impl Applied {
    /// The entry now lives at `path` (possibly unchanged).
    pub fn at(path: impl Into<PathBuf>, summary: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            summary: summary.into(),
        }
    }

    /// The entry no longer exists; the chain must stop.
    pub fn removed(summary: impl Into<String>) -> Self {
        Self {
            path: None,
            summary: summary.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.path.is_none()
    }
}

/// Trait for entry actions
pub trait Action: fmt::Debug {
    /// Registry tag of this action (e.g. "rename")
    fn name(&self) -> &str;

    /// Apply the action to the entry at `path`.
    ///
    /// `basedir` is the location root the entry was found under and
    /// `attributes` holds everything the rule's filters contributed.
    fn run(
        &self,
        basedir: &Path,
        path: &Path,
        attributes: &AttributeMap,
        ops: &mut FileOps,
    ) -> Result<Applied>;
}

/// How an action handles a destination that is already taken.
///
/// With `overwrite` the occupant is moved into `trash` first; otherwise the
/// next unused `name (n).ext` variant is chosen.
#[derive(Debug, Clone, Default)]
pub(crate) struct Conflict {
    pub overwrite: bool,
    pub trash: TrashBin,
}

impl Conflict {
    /// Destination for an entry that leaves `source`.
    ///
    /// A free target, or one that is the entry itself, is used as is.
    pub fn resolve(&self, ops: &mut FileOps, source: &Path, target: PathBuf) -> Result<PathBuf> {
        if !ops.exists(&target) || ops.same_file(source, &target) {
            return Ok(target);
        }
        if self.overwrite {
            return self.evict(ops, target);
        }
        let unused = ops.unused_filename(&target, source);
        tracing::debug!(
            wanted = %target.display(),
            chosen = %unused.display(),
            "target exists, enumerating"
        );
        Ok(unused)
    }

    /// Destination for a duplicate of `source`; the source stays occupied.
    pub fn resolve_copy(
        &self,
        ops: &mut FileOps,
        source: &Path,
        target: PathBuf,
    ) -> Result<PathBuf> {
        if !ops.exists(&target) {
            return Ok(target);
        }
        if self.overwrite && !ops.same_file(source, &target) {
            return self.evict(ops, target);
        }
        Ok(organize_fs::find_unused_filename(&target, |p| ops.exists(p)))
    }

    fn evict(&self, ops: &mut FileOps, target: PathBuf) -> Result<PathBuf> {
        tracing::warn!(
            path = %target.display(),
            simulate = ops.is_simulated(),
            "overwriting existing entry, moving it to the trash"
        );
        ops.trash(&target, &self.trash)?;
        Ok(target)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

//! Simulate-aware gateway for every filesystem mutation
//!
//! Actions never touch the filesystem directly; they call [`FileOps`], which
//! either performs the mutation or, when simulating, records its effect in an
//! overlay. Existence checks and location listings consult the overlay, so
//! decisions taken later in a simulated run see the simulated state: two
//! entries renamed to the same name get `name (1)` and `name (2)` just as
//! they would for real, and a later rule finds what an earlier rule moved.
//!
//! Every overlay path remembers the disk path its content comes from. A
//! directory moved during a simulation takes its children along.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::path::{Path, PathBuf};

use organize_fs::{TrashBin, io};

use crate::Result;

/// Performs or simulates filesystem mutations for one run.
#[derive(Debug, Default)]
pub struct FileOps {
    simulate: bool,
    /// Simulated paths mapped to the disk path holding their content
    created: BTreeMap<PathBuf, PathBuf>,
    removed: BTreeSet<PathBuf>,
    /// Destinations written since the last [`FileOps::begin_pass`]
    claimed: BTreeSet<PathBuf>,
    predictions: Vec<String>,
}

impl FileOps {
    pub fn new(simulate: bool) -> Self {
        Self {
            simulate,
            ..Self::default()
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    /// Whether `path` exists, taking simulated effects into account.
    ///
    /// A directory that only holds simulated entries exists too.
    pub fn exists(&self, path: &Path) -> bool {
        self.content(path).is_some() || self.has_created_below(path)
    }

    /// Whether `path` is a directory, taking simulated effects into account.
    pub fn is_dir(&self, path: &Path) -> bool {
        self.content(path).is_some_and(|c| c.is_dir()) || self.has_created_below(path)
    }

    /// The disk path holding the data of `path`, or `None` if `path` does
    /// not exist.
    ///
    /// Outside a simulation this is `path` itself whenever it exists.
    pub fn content(&self, path: &Path) -> Option<PathBuf> {
        if !self.simulate {
            return path.exists().then(|| path.to_path_buf());
        }
        if let Some(content) = self.created.get(path) {
            return Some(content.clone());
        }
        if self.removed.contains(path) {
            return None;
        }
        for ancestor in path.ancestors().skip(1) {
            if let Some(content) = self.created.get(ancestor) {
                let mapped = content.join(path.strip_prefix(ancestor).ok()?);
                return mapped.exists().then_some(mapped);
            }
            if self.removed.contains(ancestor) {
                return None;
            }
        }
        path.exists().then(|| path.to_path_buf())
    }

    /// Simulated paths strictly below `dir`, with their content, in
    /// lexical order.
    pub fn created_below<'a>(&'a self, dir: &'a Path) -> impl Iterator<Item = (&'a Path, &'a Path)> {
        self.created
            .range::<Path, _>((Bound::Excluded(dir), Bound::Unbounded))
            .take_while(move |(path, _)| path.starts_with(dir))
            .map(|(path, content)| (path.as_path(), content.as_path()))
    }

    /// Start a pass over a fresh listing. Forgets earlier claims.
    pub fn begin_pass(&mut self) {
        self.claimed.clear();
    }

    /// Whether a rename, move or copy wrote to `path` during this pass.
    ///
    /// A listed entry at such a path was replaced after the listing was
    /// taken; what is there now has already been handled.
    pub fn is_claimed(&self, path: &Path) -> bool {
        self.claimed.contains(path)
    }

    /// Whether `a` and `b` name the same filesystem object.
    pub fn same_file(&self, a: &Path, b: &Path) -> bool {
        if a == b {
            return true;
        }
        if self.simulate && (self.is_virtual(a) || self.is_virtual(b)) {
            return false;
        }
        organize_fs::same_file(a, b)
    }

    /// First free variant of `desired`, treating `source` as free since it
    /// is about to move away.
    pub fn unused_filename(&self, desired: &Path, source: &Path) -> PathBuf {
        organize_fs::find_unused_filename(desired, |p| p != source && self.exists(p))
    }

    /// Rename within the same directory.
    pub fn rename(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.claimed.insert(to.to_path_buf());
        if self.simulate {
            self.predict_readable(from);
            tracing::info!(from = %from.display(), to = %to.display(), "[simulate] rename");
            self.relocate(from, to);
            return Ok(());
        }
        io::rename(from, to)?;
        tracing::info!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }

    /// Move to another location, creating missing parents.
    pub fn move_path(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.claimed.insert(to.to_path_buf());
        if self.simulate {
            self.predict_readable(from);
            tracing::info!(from = %from.display(), to = %to.display(), "[simulate] move");
            self.relocate(from, to);
            return Ok(());
        }
        io::move_path(from, to)?;
        tracing::info!(from = %from.display(), to = %to.display(), "moved");
        Ok(())
    }

    /// Copy, leaving `from` in place.
    pub fn copy_path(&mut self, from: &Path, to: &Path) -> Result<()> {
        self.claimed.insert(to.to_path_buf());
        if self.simulate {
            self.predict_readable(from);
            tracing::info!(from = %from.display(), to = %to.display(), "[simulate] copy");
            self.place(from, to);
            return Ok(());
        }
        io::copy_path(from, to)?;
        tracing::info!(from = %from.display(), to = %to.display(), "copied");
        Ok(())
    }

    /// Move `path` into `bin`. Returns its location inside the bin if known.
    ///
    /// When simulating, the bin is never resolved or touched.
    pub fn trash(&mut self, path: &Path, bin: &TrashBin) -> Result<Option<PathBuf>> {
        if self.simulate {
            self.predict_readable(path);
            tracing::info!(path = %path.display(), "[simulate] trash");
            self.vacate(path);
            return Ok(None);
        }
        Ok(bin.put(path)?)
    }

    /// Permanently delete `path`.
    pub fn remove(&mut self, path: &Path) -> Result<()> {
        if self.simulate {
            self.predict_readable(path);
            tracing::info!(path = %path.display(), "[simulate] delete");
            self.vacate(path);
            return Ok(());
        }
        io::remove_path(path)?;
        tracing::info!(path = %path.display(), "deleted");
        Ok(())
    }

    /// Take the predictions recorded since the last call.
    ///
    /// Predictions are problems a simulated mutation would likely run into
    /// for real. They are never raised as errors.
    pub fn take_predictions(&mut self) -> Vec<String> {
        std::mem::take(&mut self.predictions)
    }

    fn is_virtual(&self, path: &Path) -> bool {
        self.content(path).as_deref() != Some(path)
    }

    fn has_created_below(&self, dir: &Path) -> bool {
        self.created_below(dir).next().is_some()
    }

    fn relocate(&mut self, from: &Path, to: &Path) {
        if from == to {
            return;
        }
        self.place(from, to);
        self.vacate(from);
    }

    /// Make `to` a simulated copy of `from`, children included.
    fn place(&mut self, from: &Path, to: &Path) {
        if from == to {
            return;
        }
        let content = self.content(from).unwrap_or_else(|| from.to_path_buf());
        let created: Vec<_> = self
            .created_below(from)
            .map(|(path, content)| (rebase(path, from, to), content.to_path_buf()))
            .collect();
        let removed: Vec<_> = self
            .removed
            .iter()
            .filter(|path| path.starts_with(from) && path.as_path() != from)
            .map(|path| rebase(path, from, to))
            .collect();

        self.clear_below(to);
        self.removed.remove(to);
        self.created.insert(to.to_path_buf(), content);
        self.created.extend(created);
        self.removed.extend(removed);
    }

    fn vacate(&mut self, path: &Path) {
        self.clear_below(path);
        self.created.remove(path);
        self.removed.insert(path.to_path_buf());
    }

    fn clear_below(&mut self, dir: &Path) {
        let below = |path: &PathBuf| path.starts_with(dir) && path.as_path() != dir;
        self.created.retain(|path, _| !below(path));
        self.removed.retain(|path| !below(path));
    }

    fn predict_readable(&mut self, path: &Path) {
        if !self.exists(path) {
            self.predictions
                .push(format!("{} would not exist at this point", path.display()));
            return;
        }
        if self.is_virtual(path) {
            return;
        }
        let read_only_parent = path
            .parent()
            .and_then(|p| std::fs::metadata(p).ok())
            .is_some_and(|m| m.permissions().readonly());
        if read_only_parent {
            self.predictions.push(format!(
                "{} is in a read-only directory and could not be moved",
                path.display()
            ));
        }
    }
}

fn rebase(path: &Path, from: &Path, to: &Path) -> PathBuf {
    match path.strip_prefix(from) {
        Ok(rest) => to.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

//! Directory locations a rule is applied to

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use organize_fs::{Error as FsError, expand_user, normalize};
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use crate::{Entry, Error, FileOps, Result};

/// Which kind of entry a location yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Targets {
    #[default]
    Files,
    Dirs,
}

/// A directory (or single file) to collect entries from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Deepest level to descend to when recursive; 1 means direct children
    pub max_depth: Option<usize>,
    pub targets: Targets,
    /// Yield entries whose name starts with a dot, and descend into them
    pub include_hidden: bool,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            recursive: false,
            max_depth: None,
            targets: Targets::Files,
            include_hidden: true,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Absolute, home-expanded root of this location.
    pub fn root(&self) -> Result<PathBuf> {
        let expanded = expand_user(&self.path)?;
        let absolute = std::path::absolute(&expanded).map_err(|e| FsError::io(&expanded, e))?;
        Ok(normalize(&absolute))
    }

    /// Collect the entries of this location in lexical order, as `ops`
    /// sees the filesystem.
    ///
    /// The list is a snapshot: actions applied to earlier entries do not
    /// change which entries are visited. A location naming a single file
    /// yields that file with its parent directory as basedir. In a
    /// simulation, entries moved or created earlier in the run are listed
    /// where they would be and removed ones are left out.
    ///
    /// # Errors
    ///
    /// [`Error::LocationNotFound`] if the root does not exist and
    /// [`Error::Scan`] if it cannot be read. Unreadable subdirectories are
    /// skipped with a warning.
    pub fn entries(&self, ops: &FileOps) -> Result<Vec<Entry>> {
        let root = self.root()?;
        let content = ops.content(&root);
        if !ops.exists(&root) {
            return Err(Error::LocationNotFound { path: root });
        }

        if let Some(content) = &content
            && !content.is_dir()
        {
            let basedir = root.parent().map(Path::to_path_buf).unwrap_or_default();
            return Ok(match self.targets {
                Targets::Files => vec![Entry::new(&root, basedir).with_content(content)],
                Targets::Dirs => Vec::new(),
            });
        }

        let max_depth = if self.recursive {
            self.max_depth.unwrap_or(usize::MAX).max(1)
        } else {
            1
        };
        let mut found = BTreeMap::new();
        if let Some(content) = &content {
            self.walk(content, &root, max_depth, &mut found)
                .map_err(|e| Error::Scan {
                    path: root.clone(),
                    message: e.to_string(),
                })?;
        }
        if ops.is_simulated() {
            self.overlay(&root, max_depth, ops, &mut found);
        }

        let entries: Vec<_> = found
            .into_iter()
            .filter(|(_, item)| match self.targets {
                Targets::Files => !item.is_dir,
                Targets::Dirs => item.is_dir,
            })
            .map(|(path, item)| Entry::new(path, root.clone()).with_content(item.content))
            .collect();
        tracing::debug!(location = %root.display(), count = entries.len(), "collected entries");
        Ok(entries)
    }

    /// Walk the directory `source`, recording its entries as if it were at
    /// `mount`. Only an unreadable `source` is an error.
    fn walk(
        &self,
        source: &Path,
        mount: &Path,
        max_depth: usize,
        found: &mut BTreeMap<PathBuf, Found>,
    ) -> std::result::Result<(), walkdir::Error> {
        if max_depth == 0 {
            return Ok(());
        }
        let walker = WalkDir::new(source)
            .min_depth(1)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| self.include_hidden || !is_hidden(e));

        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) if e.depth() == 0 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        path = %e.path().unwrap_or(source).display(),
                        error = %e,
                        "skipping unreadable entry"
                    );
                    continue;
                }
            };
            let Ok(rest) = item.path().strip_prefix(source) else {
                continue;
            };
            found.insert(
                mount.join(rest),
                Found {
                    is_dir: item.file_type().is_dir(),
                    content: item.path().to_path_buf(),
                },
            );
        }
        Ok(())
    }

    /// Bring a listing in line with the simulated state of `ops`.
    fn overlay(
        &self,
        root: &Path,
        max_depth: usize,
        ops: &FileOps,
        found: &mut BTreeMap<PathBuf, Found>,
    ) {
        found.retain(|path, item| match ops.content(path) {
            Some(content) if content == item.content => true,
            Some(content) => {
                item.is_dir = content.is_dir();
                item.content = content;
                true
            }
            None => false,
        });

        for (path, content) in ops.created_below(root) {
            let Ok(rest) = path.strip_prefix(root) else {
                continue;
            };
            let depth = rest.components().count();
            let mut current = root.to_path_buf();
            for (level, component) in (1..).zip(rest.components()) {
                let hidden = !self.include_hidden && is_hidden_name(component.as_os_str());
                if level > max_depth || hidden {
                    break;
                }
                current.push(component);
                if level < depth {
                    // A parent that may only exist because of what was moved into it
                    found.entry(current.clone()).or_insert_with(|| Found {
                        is_dir: true,
                        content: ops.content(&current).unwrap_or_else(|| current.clone()),
                    });
                    continue;
                }

                let is_dir = content.is_dir();
                found.insert(
                    current.clone(),
                    Found {
                        is_dir,
                        content: content.to_path_buf(),
                    },
                );
                if is_dir {
                    let mut children = BTreeMap::new();
                    if let Err(e) = self.walk(content, &current, max_depth - level, &mut children)
                    {
                        tracing::warn!(
                            path = %content.display(),
                            error = %e,
                            "skipping unreadable entry"
                        );
                    }
                    children.retain(|child, _| ops.content(child).is_some());
                    found.extend(children);
                }
            }
        }
    }
}

/// One listed path before it becomes an [`Entry`].
#[derive(Debug)]
struct Found {
    is_dir: bool,
    content: PathBuf,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && is_hidden_name(entry.file_name())
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

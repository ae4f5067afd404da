//! [`TestTree`] fixture for rule scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use walkdir::WalkDir;

/// A temporary directory tree with helpers for setup and assertion.
///
/// Paths are always given relative to the root, with `/` as separator. A
/// path ending in `/` denotes a directory.
///
/// # Example
///
/// ```rust,no_run
/// use organize_test_utils::TestTree;
///
/// let tree = TestTree::with_files(&["inbox/a.txt", "inbox/report.pdf", "archive/"]);
/// tree.assert_exists("inbox/a.txt");
/// assert_eq!(tree.files(), vec!["inbox/a.txt", "inbox/report.pdf"]);
/// ```
pub struct TestTree {
    temp_dir: TempDir,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a tree where each file contains its own relative path.
    pub fn with_files(paths: &[&str]) -> Self {
        let tree = Self::new();
        for path in paths {
            if path.ends_with('/') {
                tree.mkdir(path);
            } else {
                tree.write(path, path);
            }
        }
        tree
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative.trim_end_matches('/'))
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// All files below the root, relative and sorted.
    pub fn files(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter_map(|(path, content)| content.map(|_| path))
            .collect()
    }

    /// Every entry below the root mapped to its content, `None` for
    /// directories. Directory keys end in `/`.
    pub fn snapshot(&self) -> BTreeMap<String, Option<String>> {
        WalkDir::new(self.root())
            .min_depth(1)
            .into_iter()
            .map(|e| e.unwrap())
            .map(|e| {
                let relative = e
                    .path()
                    .strip_prefix(self.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                if e.file_type().is_dir() {
                    (format!("{relative}/"), None)
                } else {
                    (relative, Some(fs::read_to_string(e.path()).unwrap_or_default()))
                }
            })
            .collect()
    }

    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected path to exist: {}", path.display());
    }

    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_missing(&self, relative: &str) {
        let path = self.path(relative);
        assert!(!path.exists(), "Expected path NOT to exist: {}", path.display());
    }

    /// # Panics
    /// Panics if the file cannot be read or its content differs.
    pub fn assert_content(&self, relative: &str, expected: &str) {
        let actual = self.read(relative);
        assert_eq!(
            actual,
            expected,
            "Unexpected content in {}",
            self.path(relative).display()
        );
    }
}

//! Recoverable holding area for deleted and overwritten entries

use std::path::{Path, PathBuf};

use crate::{Error, Result, io, path};

/// Where trashed entries end up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrashBin {
    /// The operating system's trash (recycle bin). Falls back to
    /// [`TrashBin::fallback_dir`] when the platform mechanism fails.
    #[default]
    System,
    /// A plain directory; entries are moved in under a collision-free name.
    Directory(PathBuf),
}

impl TrashBin {
    /// Use `dir` as the holding area.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// Conventional holding directory used when no OS trash is reachable.
    pub fn fallback_dir() -> Result<PathBuf> {
        let base = dirs::data_local_dir().ok_or(Error::TrashUnavailable)?;
        Ok(base.join("organize").join("trash"))
    }

    /// Move `target` into the trash.
    ///
    /// Returns the entry's location inside the trash when it is known (it is
    /// not for the OS trash).
    pub fn put(&self, target: &Path) -> Result<Option<PathBuf>> {
        match self {
            Self::System => match trash::delete(target) {
                Ok(()) => {
                    tracing::info!(path = %target.display(), "moved to system trash");
                    Ok(None)
                }
                Err(e) => {
                    tracing::warn!(
                        path = %target.display(),
                        error = %e,
                        "system trash failed, using fallback directory"
                    );
                    let dir = Self::fallback_dir()?;
                    Self::put_in_dir(&dir, target).map(Some)
                }
            },
            Self::Directory(dir) => Self::put_in_dir(dir, target).map(Some),
        }
    }

    fn put_in_dir(dir: &Path, target: &Path) -> Result<PathBuf> {
        let name = target.file_name().ok_or_else(|| Error::NoFileName {
            path: target.to_path_buf(),
        })?;
        std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

        let destination = path::find_unused_filename(&dir.join(name), Path::exists);
        io::move_path(target, &destination).map_err(|e| Error::Trash {
            path: target.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::info!(
            path = %target.display(),
            trashed = %destination.display(),
            "moved to trash directory"
        );
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn directory_bin_keeps_content_recoverable() {
        let temp = TempDir::new().unwrap();
        let bin_dir = temp.path().join("bin");
        let file = temp.path().join("old.txt");
        fs::write(&file, "precious").unwrap();

        let stored = TrashBin::directory(&bin_dir).put(&file).unwrap().unwrap();

        assert!(!file.exists());
        assert_eq!(stored, bin_dir.join("old.txt"));
        assert_eq!(fs::read_to_string(stored).unwrap(), "precious");
    }

    #[test]
    fn directory_bin_enumerates_on_collision() {
        let temp = TempDir::new().unwrap();
        let bin = TrashBin::directory(temp.path().join("bin"));

        for content in ["first", "second"] {
            let file = temp.path().join("same.txt");
            fs::write(&file, content).unwrap();
            bin.put(&file).unwrap();
        }

        let bin_dir = temp.path().join("bin");
        assert_eq!(fs::read_to_string(bin_dir.join("same.txt")).unwrap(), "first");
        assert_eq!(
            fs::read_to_string(bin_dir.join("same (1).txt")).unwrap(),
            "second"
        );
    }

    #[test]
    fn default_is_system() {
        assert_eq!(TrashBin::default(), TrashBin::System);
    }
}

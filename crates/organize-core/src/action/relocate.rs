//! Move and copy entries to a templated destination

use std::fmt;
use std::path::{Path, PathBuf};

use organize_fs::{TrashBin, expand_user, is_separator_terminated, normalize};
use serde::Deserialize;
use serde_json::Value;

use super::{Action, Applied, Conflict};
use crate::rules::parse_params;
use crate::template::{Context, Template};
use crate::{AttributeMap, Error, FileOps, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    Dest(String),
    Detailed {
        dest: String,
        #[serde(default)]
        overwrite: bool,
    },
}

/// Destination shared by [`Move`] and [`Copy`].
#[derive(Debug, Clone)]
struct Destination {
    dest: Template,
    conflict: Conflict,
}

impl Destination {
    fn new(tag: &str, dest: &str, overwrite: bool) -> Result<Self> {
        if dest.trim().is_empty() {
            return Err(Error::InvalidParams {
                tag: tag.into(),
                message: "destination must not be empty".into(),
            });
        }
        Ok(Self {
            dest: Template::parse(dest)?,
            conflict: Conflict {
                overwrite,
                trash: TrashBin::default(),
            },
        })
    }

    fn from_params(tag: &str, params: &Value, trash: &TrashBin) -> Result<Self> {
        let (dest, overwrite) = match parse_params::<Params>(tag, params)? {
            Params::Dest(dest) => (dest, false),
            Params::Detailed { dest, overwrite } => (dest, overwrite),
        };
        let mut destination = Self::new(tag, &dest, overwrite)?;
        destination.conflict.trash = trash.clone();
        Ok(destination)
    }

    /// Full target path for the entry at `path`, before collision handling.
    ///
    /// Relative destinations are taken relative to `basedir`. A destination
    /// ending in a separator, or naming an existing directory, receives the
    /// entry under its current name.
    fn target(
        &self,
        basedir: &Path,
        path: &Path,
        attributes: &AttributeMap,
        ops: &FileOps,
    ) -> Result<PathBuf> {
        let rendered = self.dest.render(&Context::new(basedir, path, attributes))?;
        if rendered.is_empty() {
            return Err(Error::InvalidName { name: rendered });
        }
        let dest = expand_user(Path::new(&rendered))?;
        let dest = if dest.is_absolute() {
            normalize(&dest)
        } else {
            normalize(&basedir.join(dest))
        };

        let into_dir = is_separator_terminated(&rendered) || ops.is_dir(&dest);
        if !into_dir {
            return Ok(dest);
        }
        let name = path.file_name().ok_or_else(|| organize_fs::Error::NoFileName {
            path: path.to_path_buf(),
        })?;
        Ok(dest.join(name))
    }
}

/// Moves the entry to `dest`, creating missing directories on the way.
///
/// ```yaml
/// - move: "~/Documents/Invoices/{last_modified:%Y}/"
/// - move: { dest: "archive/", overwrite: true }
/// ```
#[derive(Debug, Clone)]
pub struct Move(Destination);

impl Move {
    pub const TAG: &'static str = "move";

    pub fn new(dest: &str, overwrite: bool) -> Result<Self> {
        Destination::new(Self::TAG, dest, overwrite).map(Self)
    }

    pub fn with_trash(mut self, trash: TrashBin) -> Self {
        self.0.conflict.trash = trash;
        self
    }

    pub fn from_params(params: &Value, trash: &TrashBin) -> Result<Self> {
        Destination::from_params(Self::TAG, params, trash).map(Self)
    }
}

impl Action for Move {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn run(
        &self,
        basedir: &Path,
        path: &Path,
        attributes: &AttributeMap,
        ops: &mut FileOps,
    ) -> Result<Applied> {
        let wanted = self.0.target(basedir, path, attributes, ops)?;
        let target = self.0.conflict.resolve(ops, path, wanted)?;
        if target == path {
            return Ok(Applied::at(path, "move skipped, already in place"));
        }
        ops.move_path(path, &target)?;
        Ok(Applied::at(
            &target,
            format!("move to \"{}\"", target.display()),
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move(dest={}, overwrite={})",
            self.0.dest, self.0.conflict.overwrite
        )
    }
}

/// Copies the entry to `dest`. Later actions keep working on the original.
#[derive(Debug, Clone)]
pub struct Copy(Destination);

impl Copy {
    pub const TAG: &'static str = "copy";

    pub fn new(dest: &str, overwrite: bool) -> Result<Self> {
        Destination::new(Self::TAG, dest, overwrite).map(Self)
    }

    pub fn with_trash(mut self, trash: TrashBin) -> Self {
        self.0.conflict.trash = trash;
        self
    }

    pub fn from_params(params: &Value, trash: &TrashBin) -> Result<Self> {
        Destination::from_params(Self::TAG, params, trash).map(Self)
    }
}

impl Action for Copy {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn run(
        &self,
        basedir: &Path,
        path: &Path,
        attributes: &AttributeMap,
        ops: &mut FileOps,
    ) -> Result<Applied> {
        let wanted = self.0.target(basedir, path, attributes, ops)?;
        let target = self.0.conflict.resolve_copy(ops, path, wanted)?;
        ops.copy_path(path, &target)?;
        Ok(Applied::at(
            path,
            format!("copy to \"{}\"", target.display()),
        ))
    }
}

impl fmt::Display for Copy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Copy(dest={}, overwrite={})",
            self.0.dest, self.0.conflict.overwrite
        )
    }
}

//! Rename an entry within its directory

use std::fmt;
use std::path::Path;

use organize_fs::{TrashBin, contains_separator};
use serde::Deserialize;
use serde_json::Value;

use super::{Action, Applied, Conflict, file_name};
use crate::rules::parse_params;
use crate::template::{Context, Template};
use crate::{AttributeMap, Error, FileOps, Result};

/// Renames the entry, keeping it in the same directory.
///
/// `name` is a template (`"{path.stem}.pdf"`). When the new name is taken by
/// another entry, `overwrite` decides between trashing the occupant and
/// picking the next free `name (n).ext`. Moving between directories is the
/// job of [`super::Move`].
#[derive(Debug, Clone)]
pub struct Rename {
    name: Template,
    conflict: Conflict,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        overwrite: bool,
    },
}

impl Rename {
    pub const TAG: &'static str = "rename";

    /// Create a rename action.
    ///
    /// Fails if the template is malformed or contains a path separator.
    pub fn new(name: &str, overwrite: bool) -> Result<Self> {
        if contains_separator(name) {
            return Err(Error::InvalidParams {
                tag: Self::TAG.into(),
                message: format!(
                    "'{name}' contains a path separator; rename only takes a file name, \
                     use move to change directories"
                ),
            });
        }
        Ok(Self {
            name: Template::parse(name)?,
            conflict: Conflict {
                overwrite,
                trash: TrashBin::default(),
            },
        })
    }

    /// Trash bin receiving overwritten entries.
    pub fn with_trash(mut self, trash: TrashBin) -> Self {
        self.conflict.trash = trash;
        self
    }

    pub fn from_params(params: &Value, trash: &TrashBin) -> Result<Self> {
        let (name, overwrite) = match parse_params::<Params>(Self::TAG, params)? {
            Params::Name(name) => (name, false),
            Params::Detailed { name, overwrite } => (name, overwrite),
        };
        Ok(Self::new(&name, overwrite)?.with_trash(trash.clone()))
    }
}

impl Action for Rename {
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
        let expanded = self
            .name
            .render(&Context::new(basedir, path, attributes))?;
        if expanded.is_empty()
            || expanded == "."
            || expanded == ".."
            || contains_separator(&expanded)
        {
            return Err(Error::InvalidName { name: expanded });
        }

        let wanted = path.with_file_name(&expanded);
        let new_path = self.conflict.resolve(ops, path, wanted)?;
        tracing::info!(
            path = %path.display(),
            name = %file_name(&new_path),
            simulate = ops.is_simulated(),
            "new name chosen"
        );

        if new_path != path {
            ops.rename(path, &new_path)?;
        }
        Ok(Applied::at(
            &new_path,
            format!("rename to \"{}\"", file_name(&new_path)),
        ))
    }
}

impl fmt::Display for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rename(name={}, overwrite={})",
            self.name, self.conflict.overwrite
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn run(action: &Rename, dir: &Path, file: &str, simulate: bool) -> Applied {
        let mut ops = FileOps::new(simulate);
        action
            .run(dir, &dir.join(file), &AttributeMap::new(), &mut ops)
            .unwrap()
    }

    #[test]
    fn separator_in_template_is_rejected() {
        let err = Rename::new("sub/{path.name}", false).unwrap_err();
        assert!(matches!(err, Error::InvalidParams { .. }));
    }

    #[test]
    fn separator_injected_by_attribute_fails_entry() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        let mut attrs = AttributeMap::new();
        attrs.insert("target", "../escape.txt").unwrap();

        let action = Rename::new("{target}", false).unwrap();
        let err = action
            .run(
                temp.path(),
                &temp.path().join("a.txt"),
                &attrs,
                &mut FileOps::new(false),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
        assert!(temp.path().join("a.txt").exists());
    }

    #[test]
    fn lowercases_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("scan.PDF"), "scan").unwrap();

        let action = Rename::new("{path.stem}.pdf", false).unwrap();
        let applied = run(&action, temp.path(), "scan.PDF", false);

        assert_eq!(applied.path, Some(temp.path().join("scan.pdf")));
        assert_eq!(
            fs::read_to_string(temp.path().join("scan.pdf")).unwrap(),
            "scan"
        );
    }

    #[test]
    fn collision_enumerates_without_overwrite() {
        let temp = TempDir::new().unwrap();
        for name in ["a.txt", "report.pdf"] {
            fs::write(temp.path().join(name), name).unwrap();
        }

        let action = Rename::from_params(&json!("report.pdf"), &TrashBin::default()).unwrap();
        let applied = run(&action, temp.path(), "a.txt", false);

        assert_eq!(applied.path, Some(temp.path().join("report (1).pdf")));
        assert_eq!(
            fs::read_to_string(temp.path().join("report.pdf")).unwrap(),
            "report.pdf"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("report (1).pdf")).unwrap(),
            "a.txt"
        );
    }

    #[test]
    fn renaming_onto_own_enumerated_name_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        for name in ["report.pdf", "report (1).pdf"] {
            fs::write(temp.path().join(name), name).unwrap();
        }

        let action = Rename::new("report.pdf", false).unwrap();
        let applied = run(&action, temp.path(), "report (1).pdf", false);

        assert_eq!(applied.path, Some(temp.path().join("report (1).pdf")));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
    }

    #[test]
    fn overwrite_trashes_previous_occupant() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let dir = temp.path().join("work");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("new.txt"), "new").unwrap();
        fs::write(dir.join("old.txt"), "old").unwrap();

        let action = Rename::from_params(
            &json!({"name": "old.txt", "overwrite": true}),
            &TrashBin::directory(&bin),
        )
        .unwrap();
        let applied = run(&action, &dir, "new.txt", false);

        assert_eq!(applied.path, Some(dir.join("old.txt")));
        assert_eq!(fs::read_to_string(dir.join("old.txt")).unwrap(), "new");
        assert_eq!(fs::read_to_string(bin.join("old.txt")).unwrap(), "old");
    }

    #[test]
    fn simulate_reports_decision_without_touching_disk() {
        let temp = TempDir::new().unwrap();
        for name in ["a.txt", "report.pdf"] {
            fs::write(temp.path().join(name), name).unwrap();
        }

        let action = Rename::new("report.pdf", true).unwrap();
        let applied = run(&action, temp.path(), "a.txt", true);

        assert_eq!(applied.path, Some(temp.path().join("report.pdf")));
        assert!(temp.path().join("a.txt").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("report.pdf")).unwrap(),
            "report.pdf"
        );
    }

    #[test]
    fn display_mirrors_configuration() {
        let action = Rename::new("{path.stem}.pdf", true).unwrap();
        assert_eq!(
            action.to_string(),
            "Rename(name={path.stem}.pdf, overwrite=true)"
        );
    }
}

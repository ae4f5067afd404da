use std::path::Path;

use organize_fs::TrashBin;
use serde_json::Value;

use super::{Action, Applied};
use crate::{AttributeMap, Error, FileOps, Result};

/// Moves the entry into the trash bin. Ends the action chain.
#[derive(Debug, Clone, Default)]
pub struct Trash {
    bin: TrashBin,
}

impl Trash {
    pub const TAG: &'static str = "trash";

    pub fn new(bin: TrashBin) -> Self {
        Self { bin }
    }

    /// `trash` takes no parameters.
    pub fn from_params(params: &Value, bin: &TrashBin) -> Result<Self> {
        if !params.is_null() {
            return Err(Error::InvalidParams {
                tag: Self::TAG.into(),
                message: "takes no parameters".into(),
            });
        }
        Ok(Self::new(bin.clone()))
    }
}

impl Action for Trash {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn run(
        &self,
        _basedir: &Path,
        path: &Path,
        _attributes: &AttributeMap,
        ops: &mut FileOps,
    ) -> Result<Applied> {
        let summary = match ops.trash(path, &self.bin)? {
            Some(location) => format!("trash (kept at \"{}\")", location.display()),
            None => "trash".to_string(),
        };
        Ok(Applied::removed(summary))
    }
}

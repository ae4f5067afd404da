use std::path::Path;

use serde_json::Value;

use super::{Action, Applied};
use crate::{AttributeMap, Error, FileOps, Result};

/// Permanently removes the entry. Ends the action chain.
///
/// Directories are removed with everything below them. Prefer
/// [`super::Trash`] unless the content is truly disposable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Delete;

impl Delete {
    pub const TAG: &'static str = "delete";

    pub fn from_params(params: &Value) -> Result<Self> {
        if !params.is_null() {
            return Err(Error::InvalidParams {
                tag: Self::TAG.into(),
                message: "takes no parameters".into(),
            });
        }
        Ok(Self)
    }
}

impl Action for Delete {
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
        ops.remove(path)?;
        Ok(Applied::removed("delete"))
    }
}

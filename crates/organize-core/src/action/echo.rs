use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::{Action, Applied};
use crate::rules::parse_params;
use crate::template::{Context, Template};
use crate::{AttributeMap, FileOps, Result};

/// Logs a rendered message. Never touches the filesystem.
#[derive(Debug, Clone)]
pub struct Echo {
    msg: Template,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    Msg(String),
    Detailed { msg: String },
}

impl Echo {
    pub const TAG: &'static str = "echo";

    pub fn new(msg: &str) -> Result<Self> {
        Ok(Self {
            msg: Template::parse(msg)?,
        })
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        match parse_params::<Params>(Self::TAG, params)? {
            Params::Msg(msg) | Params::Detailed { msg } => Self::new(&msg),
        }
    }
}

impl Action for Echo {
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
        let message = self.msg.render(&Context::new(basedir, path, attributes))?;
        tracing::info!(path = %path.display(), simulate = ops.is_simulated(), "{message}");
        Ok(Applied::at(path, format!("echo \"{message}\"")))
    }
}

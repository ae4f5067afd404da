//! Rules, their locations, and the registry that builds them
//!
//! A [`Rule`] pairs one or more [`Location`]s with an ordered filter chain and
//! an ordered action chain. The [`Registry`] turns tagged definitions (as read
//! from a rules document) into filter and action objects.

mod location;
mod registry;
mod rule;

pub use location::{Location, Targets};
pub use registry::{ActionFactory, BuildContext, FilterFactory, Registry};
pub use rule::Rule;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// Deserialize the parameters of `tag` into its typed form.
pub(crate) fn parse_params<T: DeserializeOwned>(tag: &str, params: &Value) -> Result<T> {
    T::deserialize(params).map_err(|e| Error::InvalidParams {
        tag: tag.to_string(),
        message: e.to_string(),
    })
}

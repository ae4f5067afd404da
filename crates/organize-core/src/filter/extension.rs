//! Match entries by file extension

use serde::Deserialize;
use serde_json::Value;

use super::{Filter, MatchResult};
use crate::rules::parse_params;
use crate::{AttributeMap, Entry, Result};

/// Matches entries whose extension is one of a configured set.
///
/// Comparison is case-insensitive and a leading dot in the configuration is
/// ignored, so `PDF`, `.pdf` and `pdf` are equivalent. With no extensions
/// configured, every entry that has an extension matches.
///
/// Contributes `extension`: the entry's actual extension, case preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    extensions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    One(String),
    Many(Vec<String>),
}

impl Extension {
    pub const TAG: &'static str = "extension";

    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let extensions = match parse_params::<Option<Params>>(Self::TAG, params)? {
            None => Vec::new(),
            Some(Params::One(one)) => vec![one],
            Some(Params::Many(many)) => many,
        };
        Ok(Self::new(extensions))
    }
}

impl Filter for Extension {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn attribute_keys(&self) -> Vec<String> {
        vec!["extension".into()]
    }

    fn evaluate(&self, entry: &Entry) -> Result<MatchResult> {
        let Some(extension) = entry.extension() else {
            return Ok(MatchResult::NoMatch);
        };
        let wanted = self.extensions.is_empty()
            || self
                .extensions
                .iter()
                .any(|e| *e == extension.to_lowercase());
        if !wanted {
            return Ok(MatchResult::NoMatch);
        }

        let mut attributes = AttributeMap::new();
        attributes.insert("extension", extension.into_owned())?;
        Ok(MatchResult::Match(attributes))
    }
}

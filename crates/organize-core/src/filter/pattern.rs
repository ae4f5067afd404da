//! Match file names against a regular expression

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Filter, MatchResult};
use crate::rules::parse_params;
use crate::{AttributeMap, Entry, Error, Result};

/// Matches the full file name (including extension) against a pattern.
///
/// Contributes `regex`: a mapping of the pattern's named groups, so a
/// template can use `{regex.year}`. Groups that did not participate in the
/// match are `null`.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    regex: Regex,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    Expr(String),
    Detailed { expr: String },
}

impl RegexFilter {
    pub const TAG: &'static str = "regex";

    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidParams {
            tag: Self::TAG.into(),
            message: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        match parse_params::<Params>(Self::TAG, params)? {
            Params::Expr(expr) | Params::Detailed { expr } => Self::new(&expr),
        }
    }
}

impl Filter for RegexFilter {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn attribute_keys(&self) -> Vec<String> {
        vec!["regex".into()]
    }

    fn evaluate(&self, entry: &Entry) -> Result<MatchResult> {
        let name = entry.name();
        let Some(captures) = self.regex.captures(&name) else {
            return Ok(MatchResult::NoMatch);
        };

        let groups: Map<String, Value> = self
            .regex
            .capture_names()
            .flatten()
            .map(|group| {
                let value = captures
                    .name(group)
                    .map_or(Value::Null, |m| Value::String(m.as_str().to_string()));
                (group.to_string(), value)
            })
            .collect();

        let mut attributes = AttributeMap::new();
        attributes.insert("regex", Value::Object(groups))?;
        Ok(MatchResult::Match(attributes))
    }
}

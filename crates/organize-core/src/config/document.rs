//! Serde model of a rules document

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rules::{Location, Targets};

/// Top-level rules document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesDocument {
    /// Directory used instead of the OS trash
    #[serde(default)]
    pub trash_dir: Option<PathBuf>,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// One rule as written in a document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(deserialize_with = "one_or_many")]
    pub locations: Vec<LocationDefinition>,
    /// Default recursion for every location of the rule
    #[serde(default)]
    pub subfolders: bool,
    /// Default targets for every location of the rule
    #[serde(default)]
    pub targets: Targets,
    #[serde(default)]
    pub filters: Vec<Definition>,
    #[serde(default)]
    pub actions: Vec<Definition>,
}

fn enabled_by_default() -> bool {
    true
}

/// A location, either a bare path or a table with per-location settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LocationDefinition {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default, alias = "subfolders")]
        recursive: Option<bool>,
        #[serde(default)]
        max_depth: Option<usize>,
        #[serde(default)]
        targets: Option<Targets>,
        #[serde(default)]
        include_hidden: Option<bool>,
    },
}

impl RuleDefinition {
    /// Display name, falling back to the rule's position in the document.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("rule #{}", index + 1))
    }

    /// Locations with rule-level defaults applied.
    pub fn resolve_locations(&self) -> Vec<Location> {
        self.locations
            .iter()
            .map(|def| match def {
                LocationDefinition::Path(path) => Location::new(path)
                    .recursive(self.subfolders)
                    .targets(self.targets),
                LocationDefinition::Detailed {
                    path,
                    recursive,
                    max_depth,
                    targets,
                    include_hidden,
                } => {
                    let mut location = Location::new(path)
                        .recursive(recursive.unwrap_or(self.subfolders))
                        .targets(targets.unwrap_or(self.targets))
                        .include_hidden(include_hidden.unwrap_or(true));
                    location.max_depth = *max_depth;
                    location
                }
            })
            .collect()
    }
}

/// A tagged filter or action definition.
///
/// Written either as a bare tag (`trash`), meaning no parameters, or as a
/// single-key mapping `{tag: params}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub tag: String,
    pub params: Value,
}

impl Definition {
    pub fn new(tag: impl Into<String>, params: Value) -> Self {
        Self {
            tag: tag.into(),
            params,
        }
    }
}

impl<'de> Deserialize<'de> for Definition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Tag(String),
            Map(BTreeMap<String, Value>),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Tag(tag) => Ok(Self::new(tag, Value::Null)),
            Raw::Map(map) if map.len() == 1 => {
                let (tag, params) = map.into_iter().next().ok_or_else(|| {
                    de::Error::custom("expected a single tag")
                })?;
                Ok(Self::new(tag, params))
            }
            Raw::Map(map) => Err(de::Error::custom(format!(
                "expected a single tag, found {}: {}",
                map.len(),
                map.keys().cloned().collect::<Vec<_>>().join(", ")
            ))),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<LocationDefinition>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(LocationDefinition),
        Many(Vec<LocationDefinition>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(one) => vec![one],
        OneOrMany::Many(many) => many,
    })
}

//! Match entries by modification time

use chrono::{DateTime, Local, TimeDelta};
use serde::Deserialize;
use serde_json::Value;

use super::{Filter, MatchResult};
use crate::rules::parse_params;
use crate::{AttributeMap, Entry, Error, Result};
use organize_fs::Error as FsError;

/// Direction of the age comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeComparison {
    /// Last modified longer ago than the threshold
    #[default]
    Older,
    /// Last modified within the threshold
    Newer,
}

/// Matches entries by how long ago they were last modified.
///
/// Contributes `last_modified`: the modification time as an RFC 3339
/// timestamp in local time, usable with a date spec like
/// `{last_modified:%Y-%m}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastModified {
    threshold: TimeDelta,
    mode: TimeComparison,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    #[serde(default)]
    days: f64,
    #[serde(default)]
    hours: f64,
    #[serde(default)]
    minutes: f64,
    #[serde(default)]
    seconds: f64,
    #[serde(default)]
    mode: TimeComparison,
}

impl LastModified {
    pub const TAG: &'static str = "last_modified";

    pub fn new(threshold: TimeDelta, mode: TimeComparison) -> Self {
        Self { threshold, mode }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        let p: Params = parse_params(Self::TAG, params)?;
        let seconds = p.days * 86_400.0 + p.hours * 3_600.0 + p.minutes * 60.0 + p.seconds;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(Error::InvalidParams {
                tag: Self::TAG.into(),
                message: "threshold must be a non-negative duration".into(),
            });
        }
        let threshold = TimeDelta::milliseconds((seconds * 1_000.0).round() as i64);
        Ok(Self::new(threshold, p.mode))
    }
}

impl Filter for LastModified {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn attribute_keys(&self) -> Vec<String> {
        vec!["last_modified".into()]
    }

    fn evaluate(&self, entry: &Entry) -> Result<MatchResult> {
        let modified = entry
            .metadata()?
            .modified()
            .map_err(|e| FsError::io(entry.content_path(), e))?;
        let modified: DateTime<Local> = modified.into();
        let age = Local::now() - modified;

        let matched = match self.mode {
            TimeComparison::Older => age > self.threshold,
            TimeComparison::Newer => age < self.threshold,
        };
        if !matched {
            return Ok(MatchResult::NoMatch);
        }

        let mut attributes = AttributeMap::new();
        attributes.insert("last_modified", modified.to_rfc3339())?;
        Ok(MatchResult::Match(attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn fresh_file_is_newer_not_older() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fresh.txt");
        fs::write(&path, "x").unwrap();
        let entry = Entry::new(&path, temp.path());

        let newer = LastModified::from_params(&json!({"days": 1, "mode": "newer"})).unwrap();
        let older = LastModified::from_params(&json!({"days": 1})).unwrap();

        let MatchResult::Match(attrs) = newer.evaluate(&entry).unwrap() else {
            panic!("expected match");
        };
        let stamp = attrs.get("last_modified").unwrap().as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(!older.evaluate(&entry).unwrap().is_match());
    }

    #[test]
    fn params_combine_units() {
        let filter = LastModified::from_params(&json!({"hours": 1, "minutes": 30})).unwrap();
        assert_eq!(
            filter,
            LastModified::new(TimeDelta::minutes(90), TimeComparison::Older)
        );
    }

    #[test]
    fn rejects_negative_and_unknown_params() {
        assert!(LastModified::from_params(&json!({"days": -1})).is_err());
        assert!(LastModified::from_params(&json!({"weeks": 1})).is_err());
        assert!(LastModified::from_params(&json!({"mode": "sideways"})).is_err());
    }
}

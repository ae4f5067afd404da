//! Match entries by size

use serde::Deserialize;
use serde_json::Value;
use walkdir::WalkDir;

use super::{Filter, MatchResult};
use crate::rules::parse_params;
use crate::{AttributeMap, Entry, Error, Result};

/// Matches entries whose size satisfies every condition.
///
/// Conditions look like `>1 MB`, `<= 500KiB` or `0`. Decimal units (`KB`,
/// `MB`, `GB`, `TB`) use powers of 1000, binary units (`KiB`, `MiB`, ...)
/// powers of 1024. Numbers may use exponent notation (`1.5e3 KB`). A
/// condition without an operator means equality. The size
/// of a directory is the total size of the files below it.
///
/// Contributes `size`: the size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Size {
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Condition {
    op: Op,
    bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    One(String),
    Many(Vec<String>),
}

impl Size {
    pub const TAG: &'static str = "size";

    /// Parse a list of conditions.
    pub fn new<I, S>(conditions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let conditions = conditions
            .into_iter()
            .map(|c| Condition::parse(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { conditions })
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        match parse_params::<Params>(Self::TAG, params)? {
            Params::One(one) => Self::new(one.split(',')),
            Params::Many(many) => Self::new(many),
        }
    }

    fn size_of(entry: &Entry) -> Result<u64> {
        let metadata = entry.metadata()?;
        if !metadata.is_dir() {
            return Ok(metadata.len());
        }
        Ok(WalkDir::new(entry.content_path())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum())
    }
}

impl Condition {
    fn parse(text: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidParams {
            tag: Size::TAG.into(),
            message: format!("{message} in '{text}'"),
        };

        let trimmed = text.trim();
        let (op, rest) = [
            ("<=", Op::Le),
            (">=", Op::Ge),
            ("==", Op::Eq),
            ("<", Op::Lt),
            (">", Op::Gt),
            ("=", Op::Eq),
        ]
        .iter()
        .find_map(|(prefix, op)| trimmed.strip_prefix(prefix).map(|rest| (*op, rest)))
        .unwrap_or((Op::Eq, trimmed));

        // The unit is the trailing run of letters, so `1e3` stays a number.
        let rest = rest.trim();
        let split = rest.trim_end_matches(|c: char| c.is_ascii_alphabetic()).len();
        let (number, unit) = rest.split_at(split);
        let number: f64 = number
            .trim()
            .parse()
            .map_err(|_| invalid("expected a number"))?;
        if !number.is_finite() || number < 0.0 {
            return Err(invalid("size must be a finite, non-negative number"));
        }

        let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
            "" | "b" => 1,
            "k" | "kb" => 1_000,
            "m" | "mb" => 1_000_000,
            "g" | "gb" => 1_000_000_000,
            "t" | "tb" => 1_000_000_000_000,
            "ki" | "kib" => 1 << 10,
            "mi" | "mib" => 1 << 20,
            "gi" | "gib" => 1 << 30,
            "ti" | "tib" => 1 << 40,
            _ => return Err(invalid("unknown unit")),
        };

        Ok(Self {
            op,
            bytes: (number * multiplier as f64).round() as u64,
        })
    }

    fn holds(&self, size: u64) -> bool {
        match self.op {
            Op::Lt => size < self.bytes,
            Op::Le => size <= self.bytes,
            Op::Gt => size > self.bytes,
            Op::Ge => size >= self.bytes,
            Op::Eq => size == self.bytes,
        }
    }
}

impl Filter for Size {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn attribute_keys(&self) -> Vec<String> {
        vec!["size".into()]
    }

    fn evaluate(&self, entry: &Entry) -> Result<MatchResult> {
        let size = Self::size_of(entry)?;
        if !self.conditions.iter().all(|c| c.holds(size)) {
            return Ok(MatchResult::NoMatch);
        }

        let mut attributes = AttributeMap::new();
        attributes.insert("size", size)?;
        Ok(MatchResult::Match(attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("> 1 MB", Op::Gt, 1_000_000)]
    #[case("<=500KiB", Op::Le, 512_000)]
    #[case("0", Op::Eq, 0)]
    #[case(">= 0.5 GB", Op::Ge, 500_000_000)]
    #[case("<2k", Op::Lt, 2_000)]
    #[case("1e3", Op::Eq, 1_000)]
    #[case("> 2.5e3 KiB", Op::Gt, 2_560_000)]
    fn parses_conditions(#[case] text: &str, #[case] op: Op, #[case] bytes: u64) {
        assert_eq!(Condition::parse(text).unwrap(), Condition { op, bytes });
    }

    #[rstest]
    #[case("> lots")]
    #[case("10 parsecs")]
    #[case("")]
    #[case("1e")]
    #[case("1e400")]
    #[case("-3 KB")]
    fn rejects_malformed_conditions(#[case] text: &str) {
        assert!(Condition::parse(text).is_err());
    }

    #[test]
    fn matches_file_size_range() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        fs::write(&path, vec![0u8; 1500]).unwrap();
        let entry = Entry::new(&path, temp.path());

        let filter = Size::from_params(&json!(">1kb, <2kb")).unwrap();
        let MatchResult::Match(attrs) = filter.evaluate(&entry).unwrap() else {
            panic!("expected match");
        };
        assert_eq!(attrs.get("size"), Some(&json!(1500)));

        let filter = Size::from_params(&json!(["> 2 KB"])).unwrap();
        assert!(!filter.evaluate(&entry).unwrap().is_match());
    }

    #[test]
    fn missing_entry_is_an_error() {
        let filter = Size::new(["> 0"]).unwrap();
        assert!(filter.evaluate(&Entry::new("/no/such/file", "/no")).is_err());
    }
}

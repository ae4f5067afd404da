//! Match entries by their name without extension

use serde::Deserialize;
use serde_json::Value;

use super::{Filter, MatchResult};
use crate::rules::parse_params;
use crate::{AttributeMap, Entry, Result};

/// Matches the entry's stem (file name without extension).
///
/// All configured conditions must hold. Names are compared exactly as
/// stored: no Unicode normalization is applied, so a decomposed `a` + `̈`
/// does not match a precomposed `ä`.
///
/// Contributes `name`: the entry's stem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Name {
    #[serde(default)]
    pub startswith: Option<String>,
    #[serde(default)]
    pub endswith: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
    #[serde(default, rename = "match")]
    pub exact: Option<String>,
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,
}

fn default_case_sensitive() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Params {
    Exact(String),
    Detailed(Name),
}

impl Name {
    pub const TAG: &'static str = "name";

    /// Match stems equal to `name`.
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            exact: Some(name.into()),
            case_sensitive: true,
            ..Self::default()
        }
    }

    pub fn starting_with(prefix: impl Into<String>) -> Self {
        Self {
            startswith: Some(prefix.into()),
            case_sensitive: true,
            ..Self::default()
        }
    }

    pub fn from_params(params: &Value) -> Result<Self> {
        match parse_params::<Params>(Self::TAG, params)? {
            Params::Exact(name) => Ok(Self::exact(name)),
            Params::Detailed(name) => Ok(name),
        }
    }

    fn fold(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }
}

impl Filter for Name {
    fn name(&self) -> &str {
        Self::TAG
    }

    fn attribute_keys(&self) -> Vec<String> {
        vec!["name".into()]
    }

    fn evaluate(&self, entry: &Entry) -> Result<MatchResult> {
        let stem = entry.stem();
        let folded = self.fold(&stem);

        let holds = |condition: &Option<String>, test: fn(&str, &str) -> bool| {
            condition
                .as_deref()
                .is_none_or(|wanted| test(&folded, &self.fold(wanted)))
        };
        let matched = holds(&self.startswith, |s, w| s.starts_with(w))
            && holds(&self.endswith, |s, w| s.ends_with(w))
            && holds(&self.contains, |s, w| s.contains(w))
            && holds(&self.exact, |s, w| s == w);
        if !matched {
            return Ok(MatchResult::NoMatch);
        }

        let mut attributes = AttributeMap::new();
        attributes.insert("name", stem.into_owned())?;
        Ok(MatchResult::Match(attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches(filter: &Name, file: &str) -> bool {
        filter
            .evaluate(&Entry::new(format!("/in/{file}"), "/in"))
            .unwrap()
            .is_match()
    }

    #[test]
    fn startswith_respects_accents() {
        let filter = Name::starting_with("Cálculo");
        assert!(matches(&filter, "Cálculo_1.pdf"));
        assert!(!matches(&filter, "Calculo.pdf"));
    }

    #[test]
    fn no_implicit_normalization() {
        // precomposed "ä" vs "a" followed by a combining diaeresis
        let filter = Name::exact("Erträge");
        assert!(matches(&filter, "Erträge.txt"));
        assert!(!matches(&filter, "Ertra\u{308}ge.txt"));
    }

    #[test]
    fn combined_conditions_and_case_folding() {
        let filter = Name::from_params(&json!({
            "startswith": "INV",
            "contains": "2024",
            "case_sensitive": false
        }))
        .unwrap();
        assert!(matches(&filter, "invoice-2024-03.pdf"));
        assert!(!matches(&filter, "invoice-2023-03.pdf"));
    }

    #[test]
    fn string_params_mean_exact_match() {
        let filter = Name::from_params(&json!("notes")).unwrap();
        assert!(matches(&filter, "notes.md"));
        assert!(!matches(&filter, "notes-old.md"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Name::from_params(&json!({"starts_with": "x"})).is_err());
    }
}

//! Filter capability and built-in filters
//!
//! A filter inspects an entry's metadata and either rejects it or accepts it,
//! optionally contributing attributes for templates. Filters never write to
//! the filesystem and keep no state between entries.

mod extension;
mod modified;
mod name;
mod pattern;
mod size;

pub use extension::Extension;
pub use modified::{LastModified, TimeComparison};
pub use name::Name;
pub use pattern::RegexFilter;
pub use size::Size;

use std::fmt;

use crate::{AttributeMap, Entry, Result};

/// Result of evaluating a filter against one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    NoMatch,
    Match(AttributeMap),
}

impl MatchResult {
    /// A match that contributes no attributes.
    pub fn matched() -> Self {
        Self::Match(AttributeMap::new())
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match(_))
    }
}

impl From<bool> for MatchResult {
    fn from(matched: bool) -> Self {
        if matched {
            Self::matched()
        } else {
            Self::NoMatch
        }
    }
}

/// Trait for entry filters
pub trait Filter: fmt::Debug {
    /// Registry tag of this filter (e.g. "extension")
    fn name(&self) -> &str;

    /// Top-level attribute keys this filter may contribute.
    ///
    /// Used to reject rules whose filters would write the same key.
    fn attribute_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Decide whether `entry` matches.
    ///
    /// Errors (for example unreadable metadata) fail only this entry.
    fn evaluate(&self, entry: &Entry) -> Result<MatchResult>;
}

//! Rule definition

use std::collections::BTreeSet;
use std::fmt;

use super::Location;
use crate::action::Action;
use crate::attributes::RESERVED_KEYS;
use crate::filter::Filter;
use crate::{Error, Result};

/// Filters and actions applied to the entries of some locations.
///
/// Filters are ANDed in declaration order. Actions run in declaration order,
/// each on the path the previous one left the entry at.
pub struct Rule {
    name: String,
    enabled: bool,
    locations: Vec<Location>,
    filters: Vec<Box<dyn Filter>>,
    actions: Vec<Box<dyn Action>>,
}

impl Rule {
    /// Create an enabled rule.
    ///
    /// Fails with [`Error::AttributeCollision`] if two filters declare the
    /// same attribute key, or a filter declares a reserved key.
    pub fn new(
        name: impl Into<String>,
        locations: Vec<Location>,
        filters: Vec<Box<dyn Filter>>,
        actions: Vec<Box<dyn Action>>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for key in filters.iter().flat_map(|f| f.attribute_keys()) {
            if RESERVED_KEYS.contains(&key.as_str()) || !seen.insert(key.clone()) {
                return Err(Error::AttributeCollision { key });
            }
        }
        Ok(Self {
            name: name.into(),
            enabled: true,
            locations,
            filters,
            actions,
        })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn filters(&self) -> &[Box<dyn Filter>] {
        &self.filters
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("locations", &self.locations)
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field(
                "actions",
                &self.actions.iter().map(|a| a.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

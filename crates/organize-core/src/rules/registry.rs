//! Registry of filter and action constructors
//!
//! Rules documents refer to filters and actions by tag. The registry maps
//! each tag to a constructor that validates the tag's parameters and builds
//! the object. Built-ins are registered by [`Registry::with_builtins`];
//! embedders can add their own tags.

use std::collections::HashMap;

use organize_fs::{TrashBin, expand_user};
use serde_json::Value;

use super::Rule;
use crate::action::{Action, Copy, Delete, Echo, Move, Rename, Trash};
use crate::config::{Definition, RuleDefinition, RulesDocument};
use crate::filter::{Extension, Filter, LastModified, Name, RegexFilter, Size};
use crate::{Error, Result};

/// Settings shared by everything built from one document.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// Where trash actions and overwrites put entries
    pub trash: TrashBin,
}

impl BuildContext {
    pub fn new(trash: TrashBin) -> Self {
        Self { trash }
    }

    /// Context for a document: its `trash_dir` if set, the OS trash otherwise.
    pub fn for_document(document: &RulesDocument) -> Result<Self> {
        let trash = match &document.trash_dir {
            Some(dir) => TrashBin::directory(expand_user(dir)?),
            None => TrashBin::System,
        };
        Ok(Self::new(trash))
    }
}

/// Builds a filter from its parameters.
pub type FilterFactory = Box<dyn Fn(&Value, &BuildContext) -> Result<Box<dyn Filter>>>;

/// Builds an action from its parameters.
pub type ActionFactory = Box<dyn Fn(&Value, &BuildContext) -> Result<Box<dyn Action>>>;

/// Central registry of filter and action constructors.
pub struct Registry {
    filters: HashMap<String, FilterFactory>,
    actions: HashMap<String, ActionFactory>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Create a registry with every built-in filter and action.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_filter(Extension::TAG, |p, _| Ok(Box::new(Extension::from_params(p)?)));
        registry.register_filter(Name::TAG, |p, _| Ok(Box::new(Name::from_params(p)?)));
        registry.register_filter(RegexFilter::TAG, |p, _| {
            Ok(Box::new(RegexFilter::from_params(p)?))
        });
        registry.register_filter(Size::TAG, |p, _| Ok(Box::new(Size::from_params(p)?)));
        registry.register_filter(LastModified::TAG, |p, _| {
            Ok(Box::new(LastModified::from_params(p)?))
        });

        registry.register_action(Rename::TAG, |p, ctx| {
            Ok(Box::new(Rename::from_params(p, &ctx.trash)?))
        });
        registry.register_action(Move::TAG, |p, ctx| {
            Ok(Box::new(Move::from_params(p, &ctx.trash)?))
        });
        registry.register_action(Copy::TAG, |p, ctx| {
            Ok(Box::new(Copy::from_params(p, &ctx.trash)?))
        });
        registry.register_action(Trash::TAG, |p, ctx| {
            Ok(Box::new(Trash::from_params(p, &ctx.trash)?))
        });
        registry.register_action(Delete::TAG, |p, _| Ok(Box::new(Delete::from_params(p)?)));
        registry.register_action(Echo::TAG, |p, _| Ok(Box::new(Echo::from_params(p)?)));

        registry
    }

    /// Register a filter constructor, replacing any previous one for `tag`.
    pub fn register_filter<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(&Value, &BuildContext) -> Result<Box<dyn Filter>> + 'static,
    {
        self.filters.insert(tag.into(), Box::new(factory));
    }

    /// Register an action constructor, replacing any previous one for `tag`.
    pub fn register_action<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(&Value, &BuildContext) -> Result<Box<dyn Action>> + 'static,
    {
        self.actions.insert(tag.into(), Box::new(factory));
    }

    /// List registered filter tags (sorted).
    pub fn filter_tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.filters.keys().map(|s| s.as_str()).collect();
        tags.sort();
        tags
    }

    /// List registered action tags (sorted).
    pub fn action_tags(&self) -> Vec<&str> {
        let mut tags: Vec<_> = self.actions.keys().map(|s| s.as_str()).collect();
        tags.sort();
        tags
    }

    pub fn build_filter(&self, def: &Definition, ctx: &BuildContext) -> Result<Box<dyn Filter>> {
        let factory = self.filters.get(&def.tag).ok_or_else(|| Error::UnknownTag {
            kind: "filter",
            tag: def.tag.clone(),
        })?;
        factory(&def.params, ctx)
    }

    pub fn build_action(&self, def: &Definition, ctx: &BuildContext) -> Result<Box<dyn Action>> {
        let factory = self.actions.get(&def.tag).ok_or_else(|| Error::UnknownTag {
            kind: "action",
            tag: def.tag.clone(),
        })?;
        factory(&def.params, ctx)
    }

    /// Build a rule from its definition.
    ///
    /// `index` is the rule's position in the document, used to name
    /// anonymous rules.
    pub fn build_rule(
        &self,
        def: &RuleDefinition,
        index: usize,
        ctx: &BuildContext,
    ) -> Result<Rule> {
        if def.locations.is_empty() {
            return Err(Error::config(format!(
                "'{}' has no locations",
                def.display_name(index)
            )));
        }
        let filters = def
            .filters
            .iter()
            .map(|f| self.build_filter(f, ctx))
            .collect::<Result<Vec<_>>>()?;
        let actions = def
            .actions
            .iter()
            .map(|a| self.build_action(a, ctx))
            .collect::<Result<Vec<_>>>()?;
        let rule = Rule::new(
            def.display_name(index),
            def.resolve_locations(),
            filters,
            actions,
        )?;
        Ok(rule.with_enabled(def.enabled))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

//! Rule executor

use std::path::PathBuf;

use super::{CancelToken, RejectedRule, Reporter, RunOutcome, RunReport};
use crate::filter::MatchResult;
use crate::rules::{BuildContext, Registry, Rule};
use crate::{AttributeMap, Entry, FileOps, Result, RulesDocument};

/// Options for a single run
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// If true, compute every decision but change nothing on disk.
    pub simulate: bool,
    /// Checked between entries
    pub cancel: Option<CancelToken>,
}

impl ExecuteOptions {
    pub fn simulate() -> Self {
        Self {
            simulate: true,
            cancel: None,
        }
    }

    pub fn real() -> Self {
        Self::default()
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Applies rules to the entries of their locations.
///
/// Rules run one at a time in declaration order, each location in order and
/// each entry in lexical order. For every entry the filters run until one
/// rejects it; a matched entry then goes through the action chain, each
/// action seeing the path the previous one produced.
///
/// A location is listed once before its entries are processed. Listed
/// entries that were removed, or whose path another entry was written to,
/// by the time their turn comes are skipped, so every file is handled at
/// most once per location.
///
/// Failures of a single entry are recorded in its [`RunOutcome`] and the run
/// moves on. Only fatal errors (see [`crate::Error::is_fatal`]) abort it.
#[derive(Debug, Default)]
pub struct Executor {
    rules: Vec<Rule>,
    rejected: Vec<RejectedRule>,
}

impl Executor {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            rejected: Vec::new(),
        }
    }

    /// Build every rule of `document`.
    ///
    /// Rules that fail to build are logged and listed in the report of each
    /// run; the remaining rules still run.
    pub fn from_document(document: &RulesDocument, registry: &Registry) -> Result<Self> {
        let ctx = BuildContext::for_document(document)?;
        let mut executor = Self::default();
        for (index, def) in document.rules.iter().enumerate() {
            match registry.build_rule(def, index, &ctx) {
                Ok(rule) => executor.rules.push(rule),
                Err(e) => {
                    let rule = def.display_name(index);
                    tracing::error!(rule = %rule, error = %e, "rule rejected");
                    executor.rejected.push(RejectedRule {
                        rule,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(executor)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rejected(&self) -> &[RejectedRule] {
        &self.rejected
    }

    /// Run all enabled rules.
    pub fn execute(&self, simulate: bool) -> Result<RunReport> {
        let options = ExecuteOptions {
            simulate,
            cancel: None,
        };
        self.execute_with(&options, &mut |_: &RunOutcome| {})
    }

    /// Run all enabled rules, passing each outcome to `reporter`.
    pub fn execute_with(
        &self,
        options: &ExecuteOptions,
        reporter: &mut dyn Reporter,
    ) -> Result<RunReport> {
        let span = tracing::info_span!("run", simulate = options.simulate);
        let _guard = span.enter();

        let mut ops = FileOps::new(options.simulate);
        let mut report = RunReport::new(options.simulate);
        report.rejected_rules = self.rejected.clone();

        'rules: for rule in &self.rules {
            if !rule.is_enabled() {
                tracing::debug!(rule = rule.name(), "rule disabled, skipping");
                continue;
            }
            for location in rule.locations() {
                let entries = location.entries(&ops)?;
                ops.begin_pass();
                for entry in entries {
                    if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                        tracing::warn!("run cancelled");
                        report.cancelled = true;
                        break 'rules;
                    }
                    if ops.is_claimed(entry.path()) {
                        tracing::debug!(
                            rule = rule.name(),
                            path = %entry.path().display(),
                            "entry replaced earlier in this pass"
                        );
                        continue;
                    }
                    if !ops.exists(entry.path()) {
                        tracing::debug!(
                            rule = rule.name(),
                            path = %entry.path().display(),
                            "entry vanished before its turn"
                        );
                        continue;
                    }
                    if let Some(outcome) = self.process(rule, &entry, &mut ops)? {
                        reporter.outcome(&outcome);
                        report.outcomes.push(outcome);
                    }
                }
            }
        }

        tracing::info!(
            matched = report.matched(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "run finished"
        );
        Ok(report)
    }

    /// Apply `rule` to one entry. `Ok(None)` means the entry did not match.
    fn process(&self, rule: &Rule, entry: &Entry, ops: &mut FileOps) -> Result<Option<RunOutcome>> {
        let mut outcome = RunOutcome::new(rule.name(), entry.path(), ops.is_simulated());

        let mut attributes = AttributeMap::new();
        for filter in rule.filters() {
            let contributed = match filter.evaluate(entry) {
                Ok(MatchResult::NoMatch) => return Ok(None),
                Ok(MatchResult::Match(contributed)) => contributed,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(
                        rule = rule.name(),
                        path = %entry.path().display(),
                        filter = filter.name(),
                        error = %e,
                        "filter failed"
                    );
                    outcome.error = Some(e.to_string());
                    outcome.skipped = action_names(rule, 0);
                    return Ok(Some(outcome));
                }
            };
            if let Err(e) = attributes.merge(contributed) {
                tracing::error!(rule = rule.name(), path = %entry.path().display(), error = %e, "entry failed");
                outcome.error = Some(e.to_string());
                outcome.skipped = action_names(rule, 0);
                return Ok(Some(outcome));
            }
        }
        tracing::debug!(rule = rule.name(), path = %entry.path().display(), "match found");

        let mut current: Option<PathBuf> = Some(entry.path().to_path_buf());
        for (index, action) in rule.actions().iter().enumerate() {
            let Some(path) = current.as_deref() else {
                outcome.skipped = action_names(rule, index);
                break;
            };
            let result = action.run(entry.basedir(), path, &attributes, ops);
            outcome.predict(ops.take_predictions());
            match result {
                Ok(applied) => {
                    outcome.actions.push(applied.summary);
                    current = applied.path;
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::error!(
                        rule = rule.name(),
                        path = %path.display(),
                        action = action.name(),
                        error = %e,
                        "action failed"
                    );
                    outcome.error = Some(e.to_string());
                    outcome.skipped = action_names(rule, index + 1);
                    break;
                }
            }
        }
        outcome.path = current;
        Ok(Some(outcome))
    }
}

fn action_names(rule: &Rule, from: usize) -> Vec<String> {
    rule.actions()
        .iter()
        .skip(from)
        .map(|a| a.name().to_string())
        .collect()
}

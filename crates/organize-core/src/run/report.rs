//! Per-entry outcomes and the run report

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Prefix marking problems a simulated run expects a real run to hit.
pub const PREDICTED: &str = "[predicted]";

/// What happened to one matched entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    /// Name of the rule that matched
    pub rule: String,
    /// Path the entry was found at
    pub original: PathBuf,
    /// Where the entry ended up; `None` if it was deleted or trashed
    pub path: Option<PathBuf>,
    /// Summaries of the actions that were applied, in order
    pub actions: Vec<String>,
    /// Actions that did not run because the entry was gone or an action failed
    pub skipped: Vec<String>,
    pub simulate: bool,
    /// Why processing this entry stopped early
    pub error: Option<String>,
    /// Problems a real run would likely run into (simulate only)
    pub predictions: Vec<String>,
}

impl RunOutcome {
    pub fn new(rule: impl Into<String>, original: impl Into<PathBuf>, simulate: bool) -> Self {
        let original = original.into();
        Self {
            rule: rule.into(),
            path: Some(original.clone()),
            original,
            actions: Vec::new(),
            skipped: Vec::new(),
            simulate,
            error: None,
            predictions: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_removed(&self) -> bool {
        self.path.is_none()
    }

    pub(crate) fn predict(&mut self, predictions: Vec<String>) {
        self.predictions
            .extend(predictions.into_iter().map(|p| format!("{PREDICTED} {p}")));
    }
}

/// A rule that could not be built from its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRule {
    pub rule: String,
    pub error: String,
}

/// Report from one run of the executor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub simulate: bool,
    /// Outcomes of matched entries, in processing order
    pub outcomes: Vec<RunOutcome>,
    /// Rules skipped because their definition was invalid
    pub rejected_rules: Vec<RejectedRule>,
    /// Whether the run stopped early on request
    pub cancelled: bool,
}

impl RunReport {
    pub fn new(simulate: bool) -> Self {
        Self {
            simulate,
            ..Self::default()
        }
    }

    pub fn matched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Whether any entry failed or any rule was rejected.
    pub fn has_errors(&self) -> bool {
        self.failed() > 0 || !self.rejected_rules.is_empty()
    }

    /// Outcome for the entry originally found at `path`, if it matched.
    pub fn outcome_for(&self, path: &Path) -> Option<&RunOutcome> {
        self.outcomes.iter().find(|o| o.original == path)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simulate {
            writeln!(f, "SIMULATION - no files were changed")?;
        }
        for rejected in &self.rejected_rules {
            writeln!(f, "rejected rule '{}': {}", rejected.rule, rejected.error)?;
        }
        for outcome in &self.outcomes {
            writeln!(f, "[{}] {}", outcome.rule, outcome.original.display())?;
            for action in &outcome.actions {
                writeln!(f, "  - {action}")?;
            }
            for prediction in &outcome.predictions {
                writeln!(f, "  ? {prediction}")?;
            }
            if let Some(error) = &outcome.error {
                writeln!(f, "  ! {error}")?;
            }
            if !outcome.skipped.is_empty() {
                writeln!(f, "  skipped: {}", outcome.skipped.join(", "))?;
            }
        }
        if self.cancelled {
            writeln!(f, "cancelled")?;
        }
        write!(f, "{} matched, {} failed", self.matched(), self.failed())
    }
}

/// Receives each outcome as soon as it is recorded.
pub trait Reporter {
    fn outcome(&mut self, outcome: &RunOutcome);
}

impl<F: FnMut(&RunOutcome)> Reporter for F {
    fn outcome(&mut self, outcome: &RunOutcome) {
        self(outcome)
    }
}

//! Running rules and reporting what happened

mod cancel;
mod engine;
mod report;

pub use cancel::CancelToken;
pub use engine::{ExecuteOptions, Executor};
pub use report::{PREDICTED, RejectedRule, Reporter, RunOutcome, RunReport};

//! Declarative file organization engine
//!
//! Rules select entries from locations with filters and transform them with
//! actions:
//!
//! - **Filters** ([`filter`]) inspect an entry's metadata, decide whether it
//!   matches and contribute attributes such as `extension` or `regex.year`
//! - **Actions** ([`action`]) rename, move, copy, trash or delete the entry,
//!   threading its current path from one action to the next
//! - **Templates** ([`Template`]) build names and destinations from the
//!   attributes and path metadata
//! - **Simulation**: every mutation goes through [`FileOps`], so a simulated
//!   run takes exactly the decisions a real run would, without touching disk
//!
//! # Example
//!
//! ```ignore
//! use organize_core::{Executor, Registry, config};
//!
//! let document = config::load_document("rules.yaml".as_ref())?;
//! let executor = Executor::from_document(&document, &Registry::with_builtins())?;
//! let report = executor.execute(true)?;
//! println!("{report}");
//! ```

pub mod action;
pub mod attributes;
pub mod config;
pub mod entry;
pub mod error;
pub mod fileops;
pub mod filter;
pub mod logging;
pub mod rules;
pub mod run;
pub mod template;

pub use action::{Action, Applied};
pub use attributes::AttributeMap;
pub use config::{RulesDocument, load_document, parse_document};
pub use entry::Entry;
pub use error::{Error, Result};
pub use fileops::FileOps;
pub use filter::{Filter, MatchResult};
pub use rules::{BuildContext, Location, Registry, Rule, Targets};
pub use run::{CancelToken, ExecuteOptions, Executor, Reporter, RunOutcome, RunReport};
pub use template::Template;

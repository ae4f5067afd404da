//! Rules documents
//!
//! A rules document lists rules in YAML, TOML or JSON:
//!
//! ```yaml
//! trash_dir: ~/.organize-trash   # optional, defaults to the OS trash
//! rules:
//!   - name: Invoices
//!     locations: ~/Downloads
//!     filters:
//!       - extension: pdf
//!       - name: { startswith: Invoice }
//!     actions:
//!       - rename: "{path.stem}.pdf"
//!       - move: ~/Documents/Invoices/
//! ```
//!
//! Filters and actions are either a bare tag (`- trash`) or a single-key
//! mapping from tag to parameters. Parameters are interpreted by the
//! [`Registry`](crate::rules::Registry) when the rules are built.

mod document;
mod loader;

pub use document::{Definition, LocationDefinition, RuleDefinition, RulesDocument};
pub use loader::{Format, load_document, parse_document};

//! Shared test utilities for the organize workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`], a temporary directory built from and read back
//!   as a list of relative paths

pub mod tree;

pub use tree::TestTree;

//! Filesystem primitives for the organize rule engine
//!
//! Provides collision-free path resolution, home expansion, cross-device
//! safe moves and the recoverable trash bin used by the engine's actions.

pub mod error;
pub mod io;
pub mod path;
pub mod trash;

pub use error::{Error, Result};
pub use path::{
    contains_separator, expand_user, find_unused_filename, is_separator_terminated, normalize,
    same_file, split_name,
};
pub use trash::TrashBin;

//! Naming operations for fstree.
//!
//! This crate generates successor filenames following the `name-N.ext`
//! convention, resolves them against an existence check, and validates
//! candidate names before anything is persisted.

mod error;
mod naming;
mod validate;

pub use error::NameError;
pub use naming::{MAX_RENAME_ATTEMPTS, next_unique_name, unique_child_name, unique_name};
pub use validate::validate_filename;

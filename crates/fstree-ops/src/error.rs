//! Error types for naming operations.

use fstree_core::TreeError;
use thiserror::Error;

/// Errors that can occur while choosing a name.
#[derive(Debug, Error)]
pub enum NameError {
    /// The name cannot be used as a filename.
    #[error("Invalid name '{name}': {reason}")]
    Invalid { name: String, reason: String },

    /// No free name was found within the attempt limit.
    #[error("No free name for '{name}' after {attempts} attempts")]
    Exhausted { name: String, attempts: usize },

    /// The entry used for collision checks has the wrong shape.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

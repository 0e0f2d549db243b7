//! Fatal compilation errors.
//!
//! Anything listed here aborts the whole run: downstream text could otherwise
//! name identifiers that are never defined. Unrepresentable schemas are not
//! errors; they are dropped where they occur.

use thiserror::Error;

use crate::openapi::Registry;

/// Result alias used throughout the compiler.
pub type Result<T, E = CompileError> = std::result::Result<T, E>;

/// Errors that abort a compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A `$ref` names a key that its registry does not hold.
    #[error("unresolved reference '{reference}': components.{registry} has no entry '{key}'")]
    MissingReference {
        /// Registry the reference points into
        registry: Registry,
        /// Unescaped component key that was not found
        key: String,
        /// The reference as written
        reference: String,
    },

    /// A `$ref` that is malformed, external, or points into the wrong registry.
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference {
        /// The reference as written
        reference: String,
        /// What is wrong with it
        reason: String,
    },

    /// Registry entries that reference each other without reaching a definition.
    #[error("reference cycle while resolving '{reference}'")]
    ReferenceCycle {
        /// Reference the resolution started from
        reference: String,
    },

    /// Two component keys compile to the same type name.
    #[error(
        "components.{first_registry}.{first} and components.{second_registry}.{second} both compile to the type name '{name}'"
    )]
    NameCollision {
        /// The shared type name
        name: String,
        /// Registry of the key seen first
        first_registry: Registry,
        /// Key seen first
        first: String,
        /// Registry of the colliding key
        second_registry: Registry,
        /// Colliding key
        second: String,
    },
}

impl CompileError {
    pub(crate) fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        CompileError::InvalidReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

//! Expansion errors.
//!
//! Every variant is terminal for one expansion: a failed expansion produces no fragments.

use std::panic::Location;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// The macro was attached to something other than a struct or class.
    #[error("@{macro_name} can only be applied to a struct or class declarations.")]
    UnsupportedDeclarationKind { macro_name: &'static str, found: &'static str },

    /// A node did not have the kind the expansion requires.
    #[error("Cast fail to {expected} from {found}")]
    CastFailure { expected: &'static str, found: String },

    /// A value the expansion depends on was missing.
    #[error("Unwrap fail for {what}. location: {location}")]
    UnwrapFailure { what: String, location: String },

    /// A forwarded `macros` literal contained an interpolation segment.
    #[error("Forwarded macros must be plain string literals, found interpolation \\({expression})")]
    UnexpectedInterpolation { expression: String },
}

impl ExpansionError {
    /// Build an [`ExpansionError::UnwrapFailure`] that records the caller's location.
    #[track_caller]
    pub fn unwrap_failure(what: impl Into<String>) -> Self {
        let location = Location::caller();
        ExpansionError::UnwrapFailure {
            what: what.into(),
            location: format!("{}:{}", location.file(), location.line()),
        }
    }
}

/// `Option` → `Result` with an [`ExpansionError::UnwrapFailure`] naming the call site.
pub(crate) trait Require<T> {
    fn require(self, what: &str) -> Result<T, ExpansionError>;
}

impl<T> Require<T> for Option<T> {
    #[track_caller]
    fn require(self, what: &str) -> Result<T, ExpansionError> {
        match self {
            Some(value) => Ok(value),
            None => Err(ExpansionError::unwrap_failure(what)),
        }
    }
}

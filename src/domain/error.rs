//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent misuse of the core structures.
/// They are programmer errors: never retried, surfaced to the direct caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("value accessed on an empty box")]
    EmptyValueAccess,

    #[error("structural violation: {0}")]
    StructuralViolation(String),

    #[error("duplicate {kind}: {id}")]
    DuplicateEntity { kind: &'static str, id: String },
}

impl DomainError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::StructuralViolation(message.into())
    }

    pub fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        Self::DuplicateEntity {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

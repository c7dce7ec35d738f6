//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a user, wallet or transaction does not exist.
//! - [`Forbidden`] thrown when a wallet or transaction is owned by another
//!   user.
//! - [`Validation`] thrown when an input or a lifecycle transition is
//!   rejected.
//! - [`Database`] thrown when the store fails; the unit of work is rolled
//!   back.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Validation`]: EngineError::Validation
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` for errors caused by the store rather than the caller.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::InvalidCursor(a), Self::InvalidCursor(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_database_errors_are_internal() {
        assert!(EngineError::Database(DbErr::Custom("boom".to_string())).is_internal());
        assert!(!EngineError::KeyNotFound("wallet".to_string()).is_internal());
        assert!(!EngineError::Forbidden("wallet".to_string()).is_internal());
    }

    #[test]
    fn database_errors_compare_by_message() {
        assert_eq!(
            EngineError::Database(DbErr::Custom("boom".to_string())),
            EngineError::Database(DbErr::Custom("boom".to_string()))
        );
        assert_ne!(
            EngineError::Validation("a".to_string()),
            EngineError::InvalidAmount("a".to_string())
        );
    }
}

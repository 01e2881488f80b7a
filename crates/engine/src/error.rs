//! The module contains the errors the engine can throw.
//!
//! Every variant maps onto one class of the HTTP error taxonomy:
//!
//! - [`KeyNotFound`] a referenced row does not exist.
//! - [`ExistingKey`] a uniqueness rule would be broken (email, escrow per
//!   contract, ...).
//! - [`Forbidden`] the principal lacks the capability for the operation.
//! - [`Unauthorized`] credentials are wrong or the account is inactive.
//! - [`InvalidState`] a status transition or precondition was rejected.
//! - [`InvalidInput`] a request value is malformed or out of range.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`InvalidState`]: EngineError::InvalidState
//!  [`InvalidInput`]: EngineError::InvalidInput
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("password hashing failed: {0}")]
    Password(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Turns a unique-constraint violation into [`EngineError::ExistingKey`]
    /// carrying `message`; any other database error is kept as is.
    pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::ExistingKey(message.to_string()),
            _ => Self::Database(err),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Password(a), Self::Password(b)) => a.to_string() == b.to_string(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

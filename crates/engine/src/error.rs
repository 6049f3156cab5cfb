//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned when user input breaks an expense invariant.
//! - [`InvalidId`] returned when an identifier is not a valid expense id.
//! - [`KeyNotFound`] returned when an item is not found.
//! - [`Database`] and [`Mail`] returned when a collaborator fails.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`InvalidId`]: EngineError::InvalidId
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Database`]: EngineError::Database
//!  [`Mail`]: EngineError::Mail
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid {0} id")]
    InvalidId(String),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("mail delivery failed: {0}")]
    Mail(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Mail(a), Self::Mail(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidValue`] returned when an enumerated field (channel, direction,
//!   unit) holds something outside its domain.
//! - [`InvalidAmount`] returned when a money amount cannot be parsed.
//! - [`Database`] returned when the underlying store fails.
//!
//!  [`InvalidValue`]: EngineError::InvalidValue
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Currency error: {0}")]
    Currency(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidDate(a), Self::InvalidDate(b)) => a == b,
            (Self::Currency(a), Self::Currency(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

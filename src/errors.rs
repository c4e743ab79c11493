//! Error types for the SqlHaus crate
//!
//! This module contains all error types that can be returned by SqlHaus operations.

use config::ConfigError;
use query_object::StatementError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlHausError {
    #[error("Statement error: {0}")]
    Statement(#[from] StatementError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Statement not found: {0}")]
    StatementNotFound(String),

    #[error("Statement already registered: {0}")]
    StatementAlreadyRegistered(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Error types for the stc server application.
//!
//! This module provides the error taxonomy used across the data layer, with specialized
//! error types for configuration, the embedded document store, and user records. All errors
//! use `thiserror` for ergonomic definitions with automatic `Display` and `Error` trait
//! implementations, and convert into [`Error`] through `?`.

pub mod config;
pub mod document;
pub mod user;

use thiserror::Error;

use crate::server::error::{config::ConfigError, document::DocumentError, user::UserError};

/// Main error type for the stc server application.
///
/// This enum aggregates all domain-specific error types and external library errors into a
/// single unified error type. It uses `thiserror`'s `#[from]` attribute to enable automatic
/// conversion from underlying error types via the `?` operator.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Document store errors (closed client, malformed documents, filters or updates)
/// - User errors (uniqueness violations)
/// - External library errors (database, JSON serialization)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Document store error (closed client, invalid document, filter or update).
    #[error(transparent)]
    DocumentError(#[from] DocumentError),
    /// User record error (username or email already registered).
    #[error(transparent)]
    UserError(#[from] UserError),
    /// Database error (query failures, connection issues).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// JSON error (document body could not be serialized or deserialized).
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

//! Error types for the labor payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the calculator, the store and the configuration layer
//! can report.

use thiserror::Error;

/// The main error type for the labor payroll engine.
///
/// Callers match on the variant to decide what to do: `InvalidInput` goes back
/// to whoever supplied the data, `Conflict` lets the caller choose between
/// replacing and aborting, and `Storage` is propagated untouched.
///
/// # Example
///
/// ```
/// use labor_payroll::error::PayrollError;
///
/// let error = PayrollError::NotFound {
///     entity: "labor profile",
///     key: "Ravi".to_string(),
/// };
/// assert_eq!(error.to_string(), "labor profile not found: Ravi");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// A caller-supplied value was missing, malformed or out of range.
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput {
        /// The name of the offending field.
        field: String,
        /// A description of what made the value invalid.
        message: String,
    },

    /// A write collided with an existing row (duplicate name or duplicate day).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the colliding row.
        message: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// The database connection or a query failed.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Applying the embedded schema migrations failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A filesystem operation on a backup or database file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path being read or written.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl PayrollError {
    /// Shorthand for building an [`PayrollError::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        PayrollError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

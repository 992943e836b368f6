use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Operation cancelled")]
    Cancelled,
}

impl StoreError {
    pub fn not_found(table: &str, detail: impl Display) -> Self {
        Self::NotFound(format!("{} {}", table, detail))
    }

    pub fn validation(table: &str, field: &str, message: impl Display) -> Self {
        Self::ValidationError(format!("{}.{}: {}", table, field, message))
    }

    pub fn serialization(table: &str, operation: &str, err: impl Display) -> Self {
        Self::SerializationError(format!("{} {}: {}", table, operation, err))
    }

    /// Map a handle error for a write or an unconditional read.
    ///
    /// A missing row is a failure here, not a lookup miss.
    pub fn database_operation(table: &str, operation: &str, err: DbError) -> Self {
        match err {
            DbError::Timeout(timeout) => Self::Timeout(timeout),
            DbError::Cancelled => Self::Cancelled,
            DbError::NoRows => {
                Self::DatabaseError(format!("{} {}: statement returned no rows", table, operation))
            }
            other => {
                tracing::warn!(table, operation, error = %other, "database operation failed");
                Self::DatabaseError(format!("{} {}: {}", table, operation, other))
            }
        }
    }

    /// Map a handle error for a lookup, translating the driver's no-rows signal
    pub fn lookup(table: &str, operation: &str, err: DbError) -> Self {
        match err {
            DbError::NoRows => Self::NotFound(format!("{} {}", table, operation)),
            other => Self::database_operation(table, operation, other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// True for everything that is neither a lookup miss nor rejected input
    pub fn is_persistence(&self) -> bool {
        !self.is_not_found() && !self.is_validation()
    }
}

/// Errors reported by a [`crate::DatabaseHandle`]
#[derive(Error, Debug, Clone)]
pub enum DbError {
    #[error("no rows in result set")]
    NoRows,

    #[error("driver error: {0}")]
    Driver(Arc<sqlx::Error>),

    #[error("statement exceeded its deadline of {0:?}")]
    Timeout(Duration),

    #[error("statement cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl DbError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NoRows,
            other => Self::Driver(Arc::new(other)),
        }
    }
}

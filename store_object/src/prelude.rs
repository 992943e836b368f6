//! Convenience re-exports for common store-object usage

// Handle abstraction
pub use crate::traits::{DatabaseHandle, ExecResult, SharedDatabase};
pub use crate::context::QueryContext;
pub use crate::row::Row;

// Error types
pub use crate::errors::{DbError, StoreError};

// Core store functionality
pub use crate::generic_store::{GenericStore, PgDatabase, SearchResult, SearchSource};

// Query building
pub use crate::query_builder::{
    GroupBy, PageLimits, QueryBuilder, QueryFilter, SelectField, SortOrder, SqlGenerator, SqlValue,
};

// Validation
pub use crate::validation::{ensure_id, ensure_not_empty, ensure_time_range};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;

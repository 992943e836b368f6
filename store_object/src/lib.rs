//! Store Object - Core data-access layer for the affiliate stores
//!
//! This crate provides the foundational types shared by every entity store:
//! the database handle abstraction, the PostgreSQL handle, the query builder,
//! pagination, error mapping and the generic store helpers.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod context;
pub mod errors;
pub mod generic_store;
pub mod prelude;
pub mod query_builder;
pub mod row;
pub mod traits;
pub mod validation;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::QueryContext;
pub use errors::{DbError, StoreError};
pub use generic_store::{GenericStore, PgDatabase, SearchResult, SearchSource};
pub use query_builder::{
    GroupBy, PageLimits, Pagination, QueryBuilder, QueryFilter, QueryOperator, SelectField, SortOrder,
    SqlGenerator, SqlValue,
};
pub use row::Row;
pub use traits::{DatabaseHandle, ExecResult, SharedDatabase};

use crate::context::QueryContext;
use crate::errors::DbError;
use crate::query_builder::SqlValue;
use crate::row::Row;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Outcome of a statement that returns no rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    /// Only drivers with a last-insert-id concept fill this in; PostgreSQL uses `RETURNING`
    pub last_insert_id: Option<i64>,
}

/// Executes parameterized statements against a relational database.
///
/// Parameters are positional and bound in order to `$1..$n`. Every call is
/// bounded by the given [`QueryContext`].
#[async_trait]
pub trait DatabaseHandle: Send + Sync + Debug {
    /// Execute a statement and report rows affected
    async fn execute(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecResult, DbError>;

    /// Fetch exactly one row; [`DbError::NoRows`] when the statement yields none
    async fn query_row(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Row, DbError>;

    /// Fetch every row the statement yields
    async fn query(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, DbError>;
}

/// Handle shared between stores
pub type SharedDatabase = Arc<dyn DatabaseHandle>;

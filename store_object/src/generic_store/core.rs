use crate::context::QueryContext;
use crate::errors::StoreError;
use crate::query_builder::{PageLimits, SqlValue};
use crate::row::Row;
use crate::traits::SharedDatabase;
use serde::de::DeserializeOwned;

/// Column every `INSERT ... RETURNING` statement must yield
pub const RETURNING_ID: &str = "id";
/// Column every COUNT statement must yield
pub const COUNT_COLUMN: &str = "total";

/// Shared plumbing behind each entity store.
///
/// Wraps the database handle for one primary table and applies the uniform
/// error mapping: lookups turn the driver's no-rows signal into
/// [`StoreError::NotFound`], writes never do.
#[derive(Clone)]
pub struct GenericStore {
    pub(crate) db: SharedDatabase,
    pub(crate) table: &'static str,
    pub(crate) limits: PageLimits,
}

impl std::fmt::Debug for GenericStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStore")
            .field("table", &self.table)
            .field("limits", &self.limits)
            .finish()
    }
}

impl GenericStore {
    pub fn new(db: SharedDatabase, table: &'static str) -> Self {
        Self {
            db,
            table,
            limits: PageLimits::default(),
        }
    }

    pub fn with_page_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn page_limits(&self) -> &PageLimits {
        &self.limits
    }

    pub fn db(&self) -> &SharedDatabase {
        &self.db
    }

    /// Run an `INSERT ... RETURNING id` and hand back the generated id
    pub async fn insert(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "insert");
        let row = self
            .db
            .query_row(ctx, sql, params)
            .await
            .map_err(|e| StoreError::database_operation(self.table, operation, e))?;

        let id = row.get_i64(RETURNING_ID).ok_or_else(|| {
            StoreError::DatabaseError(format!(
                "{} {}: insert did not return an id",
                self.table, operation
            ))
        })?;
        crate::debug_log!(table = self.table, operation, id, "row inserted");
        Ok(id)
    }

    /// Run an UPDATE or DELETE; zero affected rows is still success
    pub async fn execute(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<u64, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "execute");
        let result = self
            .db
            .execute(ctx, sql, params)
            .await
            .map_err(|e| StoreError::database_operation(self.table, operation, e))?;

        if result.rows_affected == 0 {
            tracing::debug!(table = self.table, operation, "statement affected no rows");
        }
        Ok(result.rows_affected)
    }

    /// Fetch a single row; no row is [`StoreError::NotFound`]
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<T, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "fetch_one");
        let row = self
            .db
            .query_row(ctx, sql, params)
            .await
            .map_err(|e| StoreError::lookup(self.table, operation, e))?;
        self.decode(operation, row)
    }

    /// Fetch a result set for a search or rollup.
    ///
    /// An explicit no-rows signal from the handle is [`StoreError::NotFound`];
    /// an empty set is returned as is.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "fetch_all");
        let rows = self
            .db
            .query(ctx, sql, params)
            .await
            .map_err(|e| StoreError::lookup(self.table, operation, e))?;
        self.decode_all(operation, rows)
    }

    /// Fetch child records (logs, attachments); no rows is an empty list
    pub async fn fetch_children<T: DeserializeOwned>(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<T>, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "fetch_children");
        match self.db.query(ctx, sql, params).await {
            Ok(rows) => self.decode_all(operation, rows),
            Err(crate::errors::DbError::NoRows) => Ok(Vec::new()),
            Err(e) => Err(StoreError::database_operation(self.table, operation, e)),
        }
    }

    /// Run a COUNT statement whose result column is [`COUNT_COLUMN`]
    pub async fn count(
        &self,
        ctx: &QueryContext,
        operation: &str,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        crate::trace_log!(table = self.table, operation, sql, params = params.len(), "count");
        let row = self
            .db
            .query_row(ctx, sql, params)
            .await
            .map_err(|e| StoreError::lookup(self.table, operation, e))?;

        row.get_i64(COUNT_COLUMN).ok_or_else(|| {
            StoreError::serialization(self.table, operation, "count column missing or not an integer")
        })
    }

    fn decode<T: DeserializeOwned>(&self, operation: &str, row: Row) -> Result<T, StoreError> {
        row.decode()
            .map_err(|e| StoreError::serialization(self.table, operation, e))
    }

    fn decode_all<T: DeserializeOwned>(
        &self,
        operation: &str,
        rows: Vec<Row>,
    ) -> Result<Vec<T>, StoreError> {
        rows.into_iter()
            .map(|row| self.decode(operation, row))
            .collect()
    }
}

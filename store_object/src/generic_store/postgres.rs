//! PostgreSQL implementation of [`DatabaseHandle`]

use crate::context::QueryContext;
use crate::errors::DbError;
use crate::query_builder::SqlValue;
use crate::row::Row;
use crate::traits::{DatabaseHandle, ExecResult};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo};

/// Bind a single positional parameter
macro_rules! bind_sql_value {
    ($query:expr, $value:expr) => {
        match $value {
            SqlValue::Null => $query.bind(Option::<String>::None),
            SqlValue::Bool(b) => $query.bind(*b),
            SqlValue::Int(i) => $query.bind(*i),
            SqlValue::Float(f) => $query.bind(*f),
            SqlValue::Text(s) => $query.bind(s.clone()),
            SqlValue::Timestamp(ts) => $query.bind(*ts),
            SqlValue::Uuid(id) => $query.bind(*id),
            SqlValue::Json(v) => $query.bind(sqlx::types::Json(v.clone())),
        }
    };
}

/// Production handle over a pooled PostgreSQL connection
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn prepare<'q>(sql: &'q str, params: &[SqlValue]) -> Query<'q, Postgres, PgArguments> {
        let mut query = sqlx::query(sql);
        for param in params {
            query = bind_sql_value!(query, param);
        }
        query
    }
}

#[async_trait]
impl DatabaseHandle for PgDatabase {
    async fn execute(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecResult, DbError> {
        crate::trace_log!(sql, params = params.len(), "pg execute");
        ctx.run(async {
            let result = Self::prepare(sql, params).execute(&self.pool).await?;
            Ok::<_, DbError>(ExecResult {
                rows_affected: result.rows_affected(),
                last_insert_id: None,
            })
        })
        .await
    }

    async fn query_row(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Row, DbError> {
        crate::trace_log!(sql, params = params.len(), "pg query_row");
        ctx.run(async {
            match Self::prepare(sql, params).fetch_optional(&self.pool).await? {
                Some(pg_row) => convert_row(&pg_row),
                None => Err(DbError::NoRows),
            }
        })
        .await
    }

    async fn query(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Vec<Row>, DbError> {
        crate::trace_log!(sql, params = params.len(), "pg query");
        ctx.run(async {
            let pg_rows = Self::prepare(sql, params).fetch_all(&self.pool).await?;
            pg_rows.iter().map(convert_row).collect::<Result<Vec<_>, DbError>>()
        })
        .await
    }
}

/// Convert a driver row into a [`Row`] keyed by column label
fn convert_row(pg_row: &PgRow) -> Result<Row, DbError> {
    let mut row = Row::new();
    for column in pg_row.columns() {
        let value = decode_column(pg_row, column.ordinal(), column.type_info().name())
            .map_err(|e| match e {
                DbError::Other(msg) => DbError::Other(format!("column {}: {}", column.name(), msg)),
                other => other,
            })?;
        row.insert(column.name(), value);
    }
    Ok(row)
}

fn decode_column(pg_row: &PgRow, idx: usize, type_name: &str) -> Result<Value, DbError> {
    let value = match type_name {
        "BOOL" => pg_row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
        "INT2" => pg_row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
        "INT4" => pg_row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
        "INT8" => pg_row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
        "FLOAT4" => pg_row
            .try_get::<Option<f32>, _>(idx)?
            .map(|f| Value::from(f64::from(f))),
        "FLOAT8" => pg_row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            pg_row.try_get::<Option<String>, _>(idx)?.map(Value::from)
        }
        "TIMESTAMPTZ" => pg_row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx)?
            .map(|ts| Value::from(ts.to_rfc3339())),
        "TIMESTAMP" => pg_row
            .try_get::<Option<chrono::NaiveDateTime>, _>(idx)?
            .map(|ts| Value::from(ts.and_utc().to_rfc3339())),
        "DATE" => pg_row
            .try_get::<Option<chrono::NaiveDate>, _>(idx)?
            .map(|d| Value::from(d.to_string())),
        "UUID" => pg_row
            .try_get::<Option<uuid::Uuid>, _>(idx)?
            .map(|id| Value::from(id.to_string())),
        "JSON" | "JSONB" => pg_row.try_get::<Option<Value>, _>(idx)?,
        "TEXT[]" | "VARCHAR[]" => pg_row
            .try_get::<Option<Vec<String>>, _>(idx)?
            .map(Value::from),
        other => return Err(DbError::other(format!("unsupported column type {}", other))),
    };
    Ok(value.unwrap_or(Value::Null))
}

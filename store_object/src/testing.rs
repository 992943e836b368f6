//! Scripted in-memory [`DatabaseHandle`] for unit tests
//!
//! Responses are served in the order they were pushed. A standing failure set
//! with [`FakeDatabase::fail_with`] overrides the script. Every statement and
//! its parameters are recorded for assertions.

use crate::context::QueryContext;
use crate::errors::DbError;
use crate::query_builder::SqlValue;
use crate::row::Row;
use crate::traits::{DatabaseHandle, ExecResult};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Exec(ExecResult),
    Row(Row),
    Rows(Vec<Row>),
    Error(DbError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Execute,
    QueryRow,
    Query,
}

/// A statement as the store sent it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub kind: StatementKind,
    pub sql: String,
    pub params: Vec<SqlValue>,
}

#[derive(Debug, Default)]
pub struct FakeDatabase {
    responses: Mutex<VecDeque<FakeResponse>>,
    failure: Mutex<Option<DbError>>,
    statements: Mutex<Vec<RecordedStatement>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn push(&self, response: FakeResponse) -> &Self {
        self.responses.lock().push_back(response);
        self
    }

    pub fn push_exec(&self, rows_affected: u64) -> &Self {
        self.push(FakeResponse::Exec(ExecResult {
            rows_affected,
            last_insert_id: None,
        }))
    }

    pub fn push_row(&self, row: Row) -> &Self {
        self.push(FakeResponse::Row(row))
    }

    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.push(FakeResponse::Rows(rows))
    }

    pub fn push_error(&self, err: DbError) -> &Self {
        self.push(FakeResponse::Error(err))
    }

    /// Fail every subsequent call with `err`
    pub fn fail_with(&self, err: DbError) {
        *self.failure.lock() = Some(err);
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.statements.lock().clone()
    }

    pub fn last_statement(&self) -> Option<RecordedStatement> {
        self.statements.lock().last().cloned()
    }

    pub fn statement_count(&self) -> usize {
        self.statements.lock().len()
    }

    fn next(&self, kind: StatementKind, sql: &str, params: &[SqlValue]) -> Option<FakeResponse> {
        self.statements.lock().push(RecordedStatement {
            kind,
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        if let Some(err) = self.failure.lock().clone() {
            return Some(FakeResponse::Error(err));
        }
        self.responses.lock().pop_front()
    }
}

#[async_trait]
impl DatabaseHandle for FakeDatabase {
    async fn execute(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ExecResult, DbError> {
        ctx.run(async {
            match self.next(StatementKind::Execute, sql, params) {
                None => Ok(ExecResult {
                    rows_affected: 1,
                    last_insert_id: None,
                }),
                Some(FakeResponse::Exec(result)) => Ok(result),
                Some(FakeResponse::Error(err)) => Err(err),
                Some(other) => Err(DbError::other(format!(
                    "fake: execute got scripted {:?}",
                    other
                ))),
            }
        })
        .await
    }

    async fn query_row(
        &self,
        ctx: &QueryContext,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Row, DbError> {
        ctx.run(async {
            match self.next(StatementKind::QueryRow, sql, params) {
                None => Err(DbError::NoRows),
                Some(FakeResponse::Row(row)) => Ok(row),
                Some(FakeResponse::Rows(rows)) => rows.into_iter().next().ok_or(DbError::NoRows),
                Some(FakeResponse::Error(err)) => Err(err),
                Some(other) => Err(DbError::other(format!(
                    "fake: query_row got scripted {:?}",
                    other
                ))),
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
        ctx.run(async {
            match self.next(StatementKind::Query, sql, params) {
                None => Ok(Vec::new()),
                Some(FakeResponse::Rows(rows)) => Ok(rows),
                Some(FakeResponse::Row(row)) => Ok(vec![row]),
                Some(FakeResponse::Error(err)) => Err(err),
                Some(other) => Err(DbError::other(format!(
                    "fake: query got scripted {:?}",
                    other
                ))),
            }
        })
        .await
    }
}

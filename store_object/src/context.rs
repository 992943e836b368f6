//! Per-call cancellation and deadline bounds
//!
//! Every store operation receives a [`QueryContext`]. Handles run their I/O
//! through [`QueryContext::run`], which drops the in-flight statement once the
//! deadline passes or the cancellation token fires.

use crate::errors::DbError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    deadline: Option<(Instant, Duration)>,
    cancel: Option<CancellationToken>,
}

impl QueryContext {
    /// A context with no deadline and no cancellation
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Bound this context by `timeout` from now
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    /// Attach a cancellation token
    pub fn cancellable(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(CancellationToken::is_cancelled)
            .unwrap_or(false)
    }

    /// Time left before the deadline, if one is set
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|(deadline, _)| deadline.saturating_duration_since(Instant::now()))
    }

    /// Drive `fut` to completion within the bounds of this context
    pub async fn run<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: Future<Output = Result<T, DbError>>,
    {
        if self.is_cancelled() {
            return Err(DbError::Cancelled);
        }
        if let Some((deadline, timeout)) = self.deadline {
            if Instant::now() >= deadline {
                return Err(DbError::Timeout(timeout));
            }
        }

        let guarded = async {
            match &self.cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(DbError::Cancelled),
                    result = fut => result,
                },
                None => fut.await,
            }
        };

        match self.deadline {
            Some((deadline, timeout)) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or(Err(DbError::Timeout(timeout))),
            None => guarded.await,
        }
    }
}

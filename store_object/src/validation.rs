//! Input checks applied before a statement is sent
//!
//! Each check returns [`StoreError::ValidationError`] naming the table and the
//! offending field.

use crate::errors::StoreError;
use chrono::{DateTime, Utc};

/// Ids are generated by the database and always positive
pub fn ensure_id(table: &str, field: &str, id: i64) -> Result<(), StoreError> {
    if id <= 0 {
        return Err(StoreError::validation(
            table,
            field,
            format!("expected a positive id, got {}", id),
        ));
    }
    Ok(())
}

/// Reject an inverted time window; open bounds are accepted
pub fn ensure_time_range(
    table: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), StoreError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(StoreError::validation(
                table,
                "created_at",
                format!("range start {} is after range end {}", from, to),
            ));
        }
    }
    Ok(())
}

pub fn ensure_not_empty(table: &str, field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(table, field, "must not be empty"));
    }
    Ok(())
}

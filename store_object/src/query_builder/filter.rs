//! WHERE-clause conditions
//!
//! Conditions hold typed parameter values; rendering into `$n` placeholders
//! happens in [`SqlGenerator`](super::sql_generation::SqlGenerator).

use crate::query_builder::value::SqlValue;

/// Query condition operators
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOperator {
    Eq,        // =
    Ne,        // !=
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    ILike,     // ILIKE (case insensitive)
    In,        // IN
    NotIn,     // NOT IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
}

/// Single condition in WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    /// One value for comparisons, many for IN / NOT IN, none for IS NULL
    pub values: Vec<SqlValue>,
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
    /// Hand-written SQL fragment; each `?` is renumbered to the next `$n`
    Expr { sql: String, values: Vec<SqlValue> },
}

impl QueryFilter {
    /// Create a simple condition
    pub fn condition(field: &str, operator: QueryOperator, values: Vec<SqlValue>) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            values,
        })
    }

    /// Create AND group
    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    /// Create OR group
    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    pub fn expr(sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self::Expr {
            sql: sql.into(),
            values,
        }
    }

    pub fn eq(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Eq, vec![value.into()])
    }

    pub fn ne(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Ne, vec![value.into()])
    }

    pub fn gt(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Gt, vec![value.into()])
    }

    pub fn gte(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Gte, vec![value.into()])
    }

    pub fn lt(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Lt, vec![value.into()])
    }

    pub fn lte(field: &str, value: impl Into<SqlValue>) -> Self {
        Self::condition(field, QueryOperator::Lte, vec![value.into()])
    }

    /// LIKE condition with a caller-supplied pattern
    pub fn like(field: &str, pattern: &str) -> Self {
        Self::condition(field, QueryOperator::Like, vec![pattern.into()])
    }

    /// ILIKE condition with a caller-supplied pattern
    pub fn ilike(field: &str, pattern: &str) -> Self {
        Self::condition(field, QueryOperator::ILike, vec![pattern.into()])
    }

    /// Case-insensitive substring match; wildcards in `needle` match literally
    pub fn contains(field: &str, needle: &str) -> Self {
        Self::ilike(field, &format!("%{}%", escape_like(needle)))
    }

    pub fn in_values<T: Into<SqlValue>>(field: &str, values: Vec<T>) -> Self {
        Self::condition(
            field,
            QueryOperator::In,
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn not_in_values<T: Into<SqlValue>>(field: &str, values: Vec<T>) -> Self {
        Self::condition(
            field,
            QueryOperator::NotIn,
            values.into_iter().map(Into::into).collect(),
        )
    }

    pub fn is_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNull, Vec::new())
    }

    pub fn is_not_null(field: &str) -> Self {
        Self::condition(field, QueryOperator::IsNotNull, Vec::new())
    }
}

/// Escape LIKE metacharacters (`\`, `%`, `_`) in user input
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

//! Search query builder
//!
//! Collects optional predicates from a search query, then renders the WHERE,
//! ORDER BY and LIMIT/OFFSET fragments. Absent or empty filter values add no
//! predicate, so an empty query renders no WHERE clause at all.

use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::{PageLimits, Pagination};
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::value::SqlValue;

/// Query builder for constructing search queries
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) pagination: Pagination,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            order_by: Vec::new(),
            pagination: Pagination::new(),
        }
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    pub fn filter_if(self, apply: bool, filter: QueryFilter) -> Self {
        if apply {
            self.filter(filter)
        } else {
            self
        }
    }

    /// `field = value` when the value is present and non-empty
    pub fn eq_if<T: Into<SqlValue>>(self, field: &str, value: Option<T>) -> Self {
        match value.map(Into::into) {
            Some(value) if !value.is_zero() => self.filter(QueryFilter::eq(field, value)),
            _ => self,
        }
    }

    /// Case-insensitive substring match when the needle is present and non-empty
    pub fn contains_if<S: AsRef<str>>(self, field: &str, needle: Option<S>) -> Self {
        match needle {
            Some(needle) if !needle.as_ref().is_empty() => {
                self.filter(QueryFilter::contains(field, needle.as_ref()))
            }
            _ => self,
        }
    }

    /// Inclusive range; each bound applies independently
    pub fn range_if<T: Into<SqlValue>>(self, field: &str, from: Option<T>, to: Option<T>) -> Self {
        let builder = match from {
            Some(from) => self.filter(QueryFilter::gte(field, from)),
            None => self,
        };
        match to {
            Some(to) => builder.filter(QueryFilter::lte(field, to)),
            None => builder,
        }
    }

    /// `field IN (...)` when at least one value is given
    pub fn in_if<T: Into<SqlValue>>(self, field: &str, values: Vec<T>) -> Self {
        if values.is_empty() {
            self
        } else {
            self.filter(QueryFilter::in_values(field, values))
        }
    }

    /// Raw predicate with `?` placeholders
    pub fn expr(self, sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        self.filter(QueryFilter::expr(sql, values))
    }

    /// Add ordering
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    /// Page window for a 1-based page number
    pub fn paginate(mut self, page: i64, per_page: i64, limits: &PageLimits) -> Self {
        self.pagination = Pagination::for_page(page, per_page, limits);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.pagination.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.pagination.offset = Some(offset);
        self
    }

    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Build WHERE clause
    pub fn build_where_clause(&self) -> (String, Vec<SqlValue>) {
        SqlGenerator::build_where_clause(&self.conditions)
    }

    /// Individual predicates, for callers that AND-join them themselves
    pub fn build_conditions(&self) -> (Vec<String>, Vec<SqlValue>) {
        SqlGenerator::build_conditions(&self.conditions, 1)
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(&self) -> String {
        SqlGenerator::build_order_clause(&self.order_by)
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(&self) -> String {
        self.pagination.to_sql()
    }

    /// Build complete query parts (WHERE, ORDER BY, LIMIT, Values)
    pub fn build(&self) -> (String, String, String, Vec<SqlValue>) {
        let (where_clause, values) = self.build_where_clause();
        let order_clause = self.build_order_clause();
        let limit_clause = self.build_limit_clause();

        (where_clause, order_clause, limit_clause, values)
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Paginated search with a paired COUNT
//!
//! The page and the count run as two separate statements over the same FROM
//! and WHERE text and parameters. They are not wrapped in a transaction, so a
//! concurrent writer can make them observe different snapshots.

use super::core::{GenericStore, COUNT_COLUMN};
use crate::context::QueryContext;
use crate::errors::StoreError;
use crate::query_builder::{QueryBuilder, SqlValue};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed parts of a search statement
#[derive(Debug, Clone, Copy)]
pub struct SearchSource {
    /// SELECT list
    pub columns: &'static str,
    /// FROM target including joins
    pub from: &'static str,
    /// ORDER BY used when the builder has none
    pub order_by: &'static str,
}

impl SearchSource {
    /// `SELECT ... FROM ... WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
    pub fn page_sql(&self, builder: &QueryBuilder) -> (String, Vec<SqlValue>) {
        let (where_clause, order_clause, limit_clause, values) = builder.build();
        let order_clause = if order_clause.is_empty() {
            format!("ORDER BY {}", self.order_by)
        } else {
            order_clause
        };

        let sql = [
            format!("SELECT {} FROM {}", self.columns, self.from),
            where_clause,
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        (sql, values)
    }

    /// COUNT over the same FROM and an already rendered WHERE clause
    pub fn count_sql(&self, where_clause: &str) -> String {
        let mut sql = format!("SELECT COUNT(*) AS {} FROM {}", COUNT_COLUMN, self.from);
        let predicate = strip_where_keyword(where_clause.trim());
        if !predicate.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
        }
        sql
    }
}

/// Drop a leading `WHERE` keyword, matched case-insensitively up to a word boundary
fn strip_where_keyword(fragment: &str) -> &str {
    const KEYWORD: &str = "WHERE";
    match fragment.get(..KEYWORD.len()) {
        Some(head) if head.eq_ignore_ascii_case(KEYWORD) => {
            let rest = &fragment[KEYWORD.len()..];
            match rest.chars().next() {
                None => "",
                Some(c) if c.is_whitespace() || c == '(' => rest.trim_start(),
                Some(_) => fragment,
            }
        }
        _ => fragment,
    }
}

/// A page of rows and the total under the same predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> Default for SearchResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> SearchResult<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl GenericStore {
    /// Run the page query, then the count query with the same predicate
    pub async fn search<T: DeserializeOwned>(
        &self,
        ctx: &QueryContext,
        operation: &str,
        source: &SearchSource,
        builder: &QueryBuilder,
    ) -> Result<SearchResult<T>, StoreError> {
        let (page_sql, values) = source.page_sql(builder);
        let items = self.fetch_all(ctx, operation, &page_sql, &values).await?;

        let (where_clause, _) = builder.build_where_clause();
        let total_count = self
            .count(ctx, operation, &source.count_sql(&where_clause), &values)
            .await?;

        Ok(SearchResult { items, total_count })
    }

    /// COUNT(*) over `source` restricted by a WHERE fragment with `$n` placeholders.
    ///
    /// The fragment may be empty, bare predicates, or start with `WHERE`.
    pub async fn count_where(
        &self,
        ctx: &QueryContext,
        operation: &str,
        source: &SearchSource,
        where_clause: &str,
        params: &[SqlValue],
    ) -> Result<i64, StoreError> {
        self.count(ctx, operation, &source.count_sql(where_clause), params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::PageLimits;

    const SOURCE: SearchSource = SearchSource {
        columns: "b.id, b.name",
        from: "banners b",
        order_by: "b.id DESC",
    };

    #[test]
    fn page_sql_without_filters() {
        let builder = QueryBuilder::new().paginate(1, 10, &PageLimits::default());
        let (sql, values) = SOURCE.page_sql(&builder);
        assert_eq!(
            sql,
            "SELECT b.id, b.name FROM banners b ORDER BY b.id DESC LIMIT 10 OFFSET 0"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn page_sql_with_filters() {
        let builder = QueryBuilder::new()
            .eq_if("b.language", Some("en"))
            .paginate(2, 5, &PageLimits::default());
        let (sql, values) = SOURCE.page_sql(&builder);
        assert_eq!(
            sql,
            "SELECT b.id, b.name FROM banners b WHERE b.language = $1 ORDER BY b.id DESC LIMIT 5 OFFSET 5"
        );
        assert_eq!(values, vec![SqlValue::Text("en".to_string())]);
    }

    #[test]
    fn count_sql_accepts_every_fragment_shape() {
        assert_eq!(SOURCE.count_sql(""), "SELECT COUNT(*) AS total FROM banners b");
        assert_eq!(
            SOURCE.count_sql("WHERE b.status = $1"),
            "SELECT COUNT(*) AS total FROM banners b WHERE b.status = $1"
        );
        assert_eq!(
            SOURCE.count_sql("b.status = $1"),
            "SELECT COUNT(*) AS total FROM banners b WHERE b.status = $1"
        );
        for fragment in [
            "WHERE(b.status = $1)",
            "where (b.status = $1)",
            "  WHERE\t(b.status = $1) ",
            "WHERE\n(b.status = $1)",
        ] {
            assert_eq!(
                SOURCE.count_sql(fragment),
                "SELECT COUNT(*) AS total FROM banners b WHERE (b.status = $1)",
                "{:?}",
                fragment
            );
        }
        assert_eq!(SOURCE.count_sql("WHERE"), "SELECT COUNT(*) AS total FROM banners b");
    }

    #[test]
    fn count_sql_keeps_columns_that_start_with_where() {
        assert_eq!(
            SOURCE.count_sql("whereabouts = $1"),
            "SELECT COUNT(*) AS total FROM banners b WHERE whereabouts = $1"
        );
    }
}

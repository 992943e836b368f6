//! Query builder utilities
//!
//! This module provides SQL query construction utilities.

pub mod aggregation;
pub mod builder;
pub mod filter;
pub mod grouping;
pub mod ordering;
pub mod pagination;
pub mod sql_generation;
pub mod value;


pub use aggregation::{AggregateFunction, SelectField};
pub use builder::QueryBuilder;
pub use filter::{escape_like, QueryFilter, QueryOperator};
pub use grouping::GroupBy;
pub use ordering::SortOrder;
pub use pagination::{PageLimits, Pagination, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use sql_generation::SqlGenerator;
pub use value::SqlValue;

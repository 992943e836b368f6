pub mod core;
pub mod postgres;
pub mod search;

pub use core::{GenericStore, COUNT_COLUMN, RETURNING_ID};
pub use postgres::PgDatabase;
pub use search::{SearchResult, SearchSource};

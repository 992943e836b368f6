//! Traits for database access
//!
//! The database handle is the only seam between the stores and the driver.

pub mod database_handle;

pub use database_handle::{DatabaseHandle, ExecResult, SharedDatabase};

//! Error types for the affiliate store crate
//!
//! Store operations return [`StoreError`] directly; this type covers the
//! coordinator (pool construction, configuration and schema setup).

use config::ConfigError;
use store_object::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AffiliateStoreError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

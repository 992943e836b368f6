//! # Affiliate Store
//!
//! PostgreSQL persistence stores for an affiliate-management backend:
//! annotations, banners, commissions, deposits, direct transfers and
//! tracking links.
//!
//! Each store is a thin, stateless wrapper over a shared
//! [`store_object::DatabaseHandle`]. Stores build parameterized SQL, decode
//! rows into typed DTOs and translate a missing row into
//! [`store_object::StoreError::NotFound`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use affiliate_store::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         "localhost".to_string(), 5432, "affiliate".to_string(),
//!         "postgres".to_string(), "password".to_string(),
//!         1, 5, 30, 600, 3600,
//!     );
//!
//!     let stores = AffiliateStore::new(config).await?;
//!     stores.migrate().await?;
//!
//!     let ctx = stores.context();
//!     let id = stores
//!         .banners()
//!         .create(&ctx, &Banner {
//!             name: "Spring".to_string(),
//!             status: BannerStatus::ACTIVE,
//!             created_at: Utc::now(),
//!             updated_at: Utc::now(),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let banner = stores.banners().get_by_id(&ctx, id).await?;
//!     println!("Created banner: {}", banner.name);
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod status;

pub mod annotation;
pub mod banner;
pub mod commission;
pub mod core;
pub mod deposit;
pub mod direct_transfer;
pub mod errors;
pub mod migration;
pub mod prelude;
pub mod tracking;

// Re-export the main public types for convenience
pub use core::AffiliateStore;
pub use errors::AffiliateStoreError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StoreConfig};

// Re-export the data-access layer the stores are built on
pub use store_object;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;

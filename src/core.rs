//! Core AffiliateStore functionality
//!
//! This module contains the coordinator that owns the connection pool and
//! hands out the six entity stores, all sharing one database handle and one
//! set of page limits.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use store_object::{PageLimits, PgDatabase, QueryContext, SharedDatabase};
use tokio_util::sync::CancellationToken;

use crate::annotation::AnnotationStore;
use crate::banner::BannerStore;
use crate::commission::CommissionStore;
use crate::deposit::DepositStore;
use crate::direct_transfer::TransferStore;
use crate::errors::AffiliateStoreError;
use crate::tracking::TrackingStore;
use config::{AppConfig, DatabaseConfig, StoreConfig};

/// Main coordinator: connection pool plus the entity stores built on it
#[derive(Debug, Clone)]
pub struct AffiliateStore {
    pool: PgPool,
    settings: StoreConfig,
    annotations: AnnotationStore,
    banners: BannerStore,
    commissions: CommissionStore,
    deposits: DepositStore,
    transfers: TransferStore,
    trackings: TrackingStore,
}

impl AffiliateStore {
    /// Connect with default store settings
    pub async fn new(config: DatabaseConfig) -> Result<Self, AffiliateStoreError> {
        let pool = Self::connect(&config).await?;
        Ok(Self::from_pool(pool, StoreConfig::default()))
    }

    /// Connect using a loaded application configuration
    pub async fn from_config(config: &AppConfig) -> Result<Self, AffiliateStoreError> {
        config.validate()?;
        let pool = Self::connect(&config.database).await?;
        Ok(Self::from_pool(pool, config.store.clone()))
    }

    /// Build the stores over an existing pool
    pub fn from_pool(pool: PgPool, settings: StoreConfig) -> Self {
        let db: SharedDatabase = Arc::new(PgDatabase::new(pool.clone()));
        let limits = PageLimits::new(settings.default_per_page, settings.max_per_page);

        Self {
            annotations: AnnotationStore::new(db.clone()).with_page_limits(limits),
            banners: BannerStore::new(db.clone()).with_page_limits(limits),
            commissions: CommissionStore::new(db.clone()).with_page_limits(limits),
            deposits: DepositStore::new(db.clone()).with_page_limits(limits),
            transfers: TransferStore::new(db.clone()).with_page_limits(limits),
            trackings: TrackingStore::new(db).with_page_limits(limits),
            pool,
            settings,
        }
    }

    async fn connect(config: &DatabaseConfig) -> Result<PgPool, AffiliateStoreError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        tracing::info!(
            host = %config.host,
            database = %config.database,
            max_connections = config.max_connections,
            "connected to database"
        );
        Ok(pool)
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn settings(&self) -> &StoreConfig {
        &self.settings
    }

    /// A fresh context carrying the configured statement timeout, if any
    pub fn context(&self) -> QueryContext {
        match self.settings.statement_timeout() {
            Some(timeout) => QueryContext::with_timeout(timeout),
            None => QueryContext::background(),
        }
    }

    /// Like [`Self::context`], and also dropped once `token` is cancelled
    pub fn cancellable_context(&self, token: CancellationToken) -> QueryContext {
        self.context().cancellable(token)
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn banners(&self) -> &BannerStore {
        &self.banners
    }

    pub fn commissions(&self) -> &CommissionStore {
        &self.commissions
    }

    pub fn deposits(&self) -> &DepositStore {
        &self.deposits
    }

    pub fn transfers(&self) -> &TransferStore {
        &self.transfers
    }

    pub fn trackings(&self) -> &TrackingStore {
        &self.trackings
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), AffiliateStoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

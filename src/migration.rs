//! Schema setup for the affiliate stores
//!
//! Every statement is idempotent, so `migrate` may run on each start. The whole
//! batch runs in one transaction under an advisory lock, which keeps two
//! processes starting together from racing on the DDL.

use crate::core::AffiliateStore;
use crate::errors::AffiliateStoreError;

/// Lock key for `pg_advisory_xact_lock`
const MIGRATION_LOCK_KEY: i64 = 0x6166_665f_7374_6f72;

const SCHEMA: &[(&str, &str)] = &[
    (
        "affiliates",
        "CREATE TABLE IF NOT EXISTS affiliates (
            id BIGSERIAL PRIMARY KEY,
            login_name TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "annotations",
        "CREATE TABLE IF NOT EXISTS annotations (
            id BIGSERIAL PRIMARY KEY,
            affiliate_id BIGINT NOT NULL,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 0,
            created_by TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "annotation_attachments",
        "CREATE TABLE IF NOT EXISTS annotation_attachments (
            id BIGSERIAL PRIMARY KEY,
            annotation_id BIGINT NOT NULL REFERENCES annotations(id),
            file_name TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "banners",
        "CREATE TABLE IF NOT EXISTS banners (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            image_url TEXT NOT NULL DEFAULT '',
            link_url TEXT NOT NULL DEFAULT '',
            language TEXT NOT NULL DEFAULT '',
            width INTEGER NOT NULL DEFAULT 0,
            height INTEGER NOT NULL DEFAULT 0,
            sort_order INTEGER NOT NULL DEFAULT 0,
            status INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "commissions",
        "CREATE TABLE IF NOT EXISTS commissions (
            id BIGSERIAL PRIMARY KEY,
            affiliate_id BIGINT NOT NULL,
            uuid UUID NOT NULL,
            period TEXT NOT NULL DEFAULT '',
            currency TEXT NOT NULL DEFAULT '',
            net_revenue DOUBLE PRECISION NOT NULL DEFAULT 0,
            amount DOUBLE PRECISION NOT NULL DEFAULT 0,
            active_players INTEGER NOT NULL DEFAULT 0,
            min_active_players INTEGER NOT NULL DEFAULT 0,
            payout_frequency TEXT NOT NULL DEFAULT '',
            commission_status INTEGER NOT NULL DEFAULT 0,
            payment_status INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "deposits",
        "CREATE TABLE IF NOT EXISTS deposits (
            id BIGSERIAL PRIMARY KEY,
            affiliate_id BIGINT NOT NULL,
            transaction_id TEXT NOT NULL UNIQUE,
            partner_transaction_id TEXT NOT NULL DEFAULT '',
            amount DOUBLE PRECISION NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT '',
            payment_method TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 0,
            attachments JSONB NOT NULL DEFAULT '[]'::jsonb,
            remark TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "deposit_logs",
        "CREATE TABLE IF NOT EXISTS deposit_logs (
            id BIGSERIAL PRIMARY KEY,
            deposit_id BIGINT NOT NULL REFERENCES deposits(id),
            status INTEGER NOT NULL DEFAULT 0,
            remark TEXT NOT NULL DEFAULT '',
            created_by TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "direct_transfers",
        "CREATE TABLE IF NOT EXISTS direct_transfers (
            id BIGSERIAL PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            from_affiliate_id BIGINT NOT NULL,
            to_affiliate_id BIGINT NOT NULL,
            amount DOUBLE PRECISION NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 0,
            remark TEXT NOT NULL DEFAULT '',
            created_by TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "direct_transfer_logs",
        "CREATE TABLE IF NOT EXISTS direct_transfer_logs (
            id BIGSERIAL PRIMARY KEY,
            transfer_id BIGINT NOT NULL REFERENCES direct_transfers(id),
            status INTEGER NOT NULL DEFAULT 0,
            remark TEXT NOT NULL DEFAULT '',
            created_by TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "trackings",
        "CREATE TABLE IF NOT EXISTS trackings (
            id BIGSERIAL PRIMARY KEY,
            affiliate_id BIGINT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            code TEXT NOT NULL UNIQUE,
            landing_url TEXT NOT NULL DEFAULT '',
            status INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
    (
        "tracking_logs",
        "CREATE TABLE IF NOT EXISTS tracking_logs (
            id BIGSERIAL PRIMARY KEY,
            tracking_id BIGINT NOT NULL REFERENCES trackings(id),
            action INTEGER NOT NULL DEFAULT 0,
            ip_address TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_annotations_affiliate_id ON annotations (affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_annotation_attachments_annotation_id ON annotation_attachments (annotation_id)",
    "CREATE INDEX IF NOT EXISTS idx_commissions_affiliate_id ON commissions (affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_commissions_uuid ON commissions (uuid)",
    "CREATE INDEX IF NOT EXISTS idx_deposits_affiliate_id ON deposits (affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_deposits_status_created_at ON deposits (status, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_deposit_logs_deposit_id ON deposit_logs (deposit_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_direct_transfers_from ON direct_transfers (from_affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_direct_transfers_to ON direct_transfers (to_affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_direct_transfers_created_at ON direct_transfers (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_direct_transfer_logs_transfer_id ON direct_transfer_logs (transfer_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_trackings_affiliate_id ON trackings (affiliate_id)",
    "CREATE INDEX IF NOT EXISTS idx_tracking_logs_tracking_id ON tracking_logs (tracking_id, created_at)",
];

/// Names of the tables created by [`AffiliateStore::migrate`], in creation order
pub fn table_names() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|(table, _)| *table)
}

impl AffiliateStore {
    /// Create every table and index that does not exist yet
    pub async fn migrate(&self) -> Result<(), AffiliateStoreError> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MIGRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| AffiliateStoreError::Migration(format!("advisory lock: {}", e)))?;

        for (table, ddl) in SCHEMA {
            crate::debug_log!("Creating table {} with SQL: {}", table, ddl);
            sqlx::query(ddl)
                .execute(&mut *tx)
                .await
                .map_err(|e| AffiliateStoreError::Migration(format!("{}: {}", table, e)))?;
        }

        for index_sql in INDEXES {
            crate::debug_log!("Creating index with SQL: {}", index_sql);
            sqlx::query(index_sql)
                .execute(&mut *tx)
                .await
                .map_err(|e| AffiliateStoreError::Migration(format!("{}: {}", index_sql, e)))?;
        }

        tx.commit().await?;
        tracing::info!(tables = SCHEMA.len(), indexes = INDEXES.len(), "schema is up to date");
        Ok(())
    }
}

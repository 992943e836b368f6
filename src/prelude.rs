//! Convenience re-exports for common affiliate-store usage
//!
//! # Example
//!
//! ```rust
//! use affiliate_store::prelude::*;
//!
//! let query = SearchBannerQuery {
//!     status: Some(BannerStatus::ACTIVE),
//!     ..Default::default()
//! };
//! assert_eq!(query.per_page, 0);
//! ```

// Coordinator
pub use crate::core::AffiliateStore;
pub use crate::errors::AffiliateStoreError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, StoreConfig};

// Entity stores and their records
pub use crate::annotation::{
    Annotation, AnnotationAttachment, AnnotationDTO, AnnotationStatus, AnnotationStore,
    SearchAnnotationQuery, SearchAnnotationResult,
};
pub use crate::banner::{Banner, BannerStatus, BannerStore, SearchBannerQuery, SearchBannersResult};
pub use crate::commission::{
    Commission, CommissionDTO, CommissionPaymentStatus, CommissionStatus, CommissionStore,
    SearchCommissionQuery, SearchCommissionResult,
};
pub use crate::deposit::{
    Deposit, DepositDTO, DepositLog, DepositStatus, DepositStore, GetStatsChartResult,
    SearchDepositQuery, SearchDepositQueryResult, Stats, StatusSeries,
    UpdateDepositAttachmentsCommand, UpdateDepositPartnerTransactionIdCommand,
};
pub use crate::direct_transfer::{
    SearchTransfersQuery, SearchTransfersResult, StatusStats, Transfer, TransferDTO,
    TransferGrandTotalResult, TransferLog, TransferStatus, TransferStore,
};
pub use crate::tracking::{
    GetSummaryTrackingQuery, GetSummaryTrackingResult, SearchSummaryTrackingLogQuery,
    SearchTrackingQuery, SearchTrackingResult, SummaryTrackingLogResult, Tracking, TrackingAction,
    TrackingDTO, TrackingLog, TrackingLogSummary, TrackingStatus, TrackingStore,
};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Common external dependencies
pub use sqlx::PgPool;
pub use tokio;

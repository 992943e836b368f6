use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_status!(
    TransferStatus {
        PENDING = 1,
        COMPLETED = 2,
        FAILED = 3,
        CANCELLED = 4,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub transaction_id: String,
    pub from_affiliate_id: i64,
    pub to_affiliate_id: i64,
    pub amount: f64,
    pub currency: String,
    pub status: TransferStatus,
    pub remark: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transfer joined with the login names of both parties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferDTO {
    pub id: i64,
    pub transaction_id: String,
    pub from_affiliate_id: i64,
    pub from_login_name: String,
    pub to_affiliate_id: i64,
    pub to_login_name: String,
    pub amount: f64,
    pub currency: String,
    pub status: TransferStatus,
    pub remark: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferLog {
    pub id: i64,
    pub transfer_id: i64,
    pub status: TransferStatus,
    pub remark: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchTransfersQuery {
    pub transaction_id: Option<String>,
    pub from_affiliate_id: Option<i64>,
    pub to_affiliate_id: Option<i64>,
    /// Substring of either party's login name
    pub login_name: Option<String>,
    pub currency: Option<String>,
    pub status: Option<TransferStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: i64,
    pub per_page: i64,
}

/// Sum and count over every transfer matching a search, not just the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferGrandTotalResult {
    pub total_amount: f64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTransfersResult {
    pub transfers: Vec<TransferDTO>,
    pub total_count: i64,
    pub grand_total: TransferGrandTotalResult,
}

#[derive(Debug, Clone, Default)]
pub struct GetStatusStatsQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusStats {
    pub status: TransferStatus,
    pub total_amount: f64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetStatusStatsResult {
    pub stats: Vec<StatusStats>,
}

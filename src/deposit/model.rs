use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::SearchResult;

crate::define_status!(
    DepositStatus {
        PENDING = 1,
        APPROVED = 2,
        REJECTED = 3,
        CANCELLED = 4,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: i64,
    pub affiliate_id: i64,
    /// Our reference; unique
    pub transaction_id: String,
    /// Reference assigned by the payment partner once known
    pub partner_transaction_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: DepositStatus,
    /// Uploaded proof-of-payment file names
    pub attachments: Vec<String>,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositDTO {
    pub id: i64,
    pub affiliate_id: i64,
    pub login_name: String,
    pub transaction_id: String,
    pub partner_transaction_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_method: String,
    pub status: DepositStatus,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub remark: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Append-only record of a deposit status change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositLog {
    pub id: i64,
    pub deposit_id: i64,
    pub status: DepositStatus,
    pub remark: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchDepositQuery {
    pub affiliate_id: Option<i64>,
    pub login_name: Option<String>,
    pub transaction_id: Option<String>,
    pub currency: Option<String>,
    pub status: Option<DepositStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: i64,
    pub per_page: i64,
}

pub type SearchDepositQueryResult = SearchResult<DepositDTO>;

/// Amount and count of deposits in one currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub currency: String,
    pub total_amount: f64,
    pub total_count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct GetStatusStatsQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Statuses to report; empty reports every status present
    pub statuses: Vec<DepositStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSeries {
    pub status: DepositStatus,
    pub stats: Vec<Stats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetStatsChartResult {
    pub series: Vec<StatusSeries>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDepositAttachmentsCommand {
    pub id: i64,
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDepositPartnerTransactionIdCommand {
    pub id: i64,
    pub partner_transaction_id: String,
}

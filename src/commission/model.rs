use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::SearchResult;
use uuid::Uuid;

crate::define_status!(
    /// Review state of a commission
    CommissionStatus {
        PENDING = 1,
        APPROVED = 2,
        REJECTED = 3,
    }
);

crate::define_status!(
    CommissionPaymentStatus {
        UNPAID = 1,
        PAID = 2,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Commission {
    pub id: i64,
    pub affiliate_id: i64,
    /// External reference shared with the payout system
    pub uuid: Uuid,
    /// Settlement period label, e.g. `2024-05`
    pub period: String,
    pub currency: String,
    pub net_revenue: f64,
    pub amount: f64,
    pub active_players: i32,
    pub min_active_players: i32,
    pub payout_frequency: String,
    pub commission_status: CommissionStatus,
    pub payment_status: CommissionPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommissionDTO {
    pub id: i64,
    pub affiliate_id: i64,
    pub login_name: String,
    pub uuid: Uuid,
    pub period: String,
    pub currency: String,
    pub net_revenue: f64,
    pub amount: f64,
    pub active_players: i32,
    pub min_active_players: i32,
    pub payout_frequency: String,
    pub commission_status: CommissionStatus,
    pub payment_status: CommissionPaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchCommissionQuery {
    pub affiliate_id: Option<i64>,
    pub uuid: Option<Uuid>,
    pub login_name: Option<String>,
    pub currency: Option<String>,
    pub commission_status: Option<CommissionStatus>,
    pub payment_status: Option<CommissionPaymentStatus>,
    pub payout_frequency: Option<String>,
    /// Keep only commissions whose active players reach the required minimum
    pub has_min_active_player_check: bool,
    pub page: i64,
    pub per_page: i64,
}

pub type SearchCommissionResult = SearchResult<CommissionDTO>;

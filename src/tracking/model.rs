use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::SearchResult;

crate::define_status!(
    TrackingStatus {
        ACTIVE = 1,
        INACTIVE = 2,
    }
);

crate::define_status!(
    /// Event recorded against a tracking link
    TrackingAction {
        CLICK = 1,
        REGISTRATION = 2,
        FIRST_DEPOSIT = 3,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub id: i64,
    pub affiliate_id: i64,
    pub name: String,
    /// Public code embedded in the tracking URL; unique
    pub code: String,
    pub landing_url: String,
    pub status: TrackingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingDTO {
    pub id: i64,
    pub affiliate_id: i64,
    pub login_name: String,
    pub name: String,
    pub code: String,
    pub landing_url: String,
    pub status: TrackingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingLog {
    pub id: i64,
    pub tracking_id: i64,
    pub action: TrackingAction,
    pub ip_address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchTrackingQuery {
    pub affiliate_id: Option<i64>,
    pub login_name: Option<String>,
    /// Case-insensitive substring of the link name
    pub name: Option<String>,
    pub status: Option<TrackingStatus>,
    pub page: i64,
    pub per_page: i64,
}

pub type SearchTrackingResult = SearchResult<TrackingDTO>;

/// Event counts per tracking link; `from`/`to` bound the event time
#[derive(Debug, Clone, Default)]
pub struct SearchSummaryTrackingLogQuery {
    pub affiliate_id: Option<i64>,
    pub tracking_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingLogSummary {
    pub tracking_id: i64,
    pub tracking_name: String,
    pub affiliate_id: i64,
    pub login_name: String,
    pub clicks: i64,
    pub registrations: i64,
    pub first_deposits: i64,
}

pub type SummaryTrackingLogResult = SearchResult<TrackingLogSummary>;

#[derive(Debug, Clone, Default)]
pub struct GetSummaryTrackingQuery {
    pub affiliate_id: i64,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Event counts across every link of one affiliate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetSummaryTrackingResult {
    pub clicks: i64,
    pub registrations: i64,
    pub first_deposits: i64,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::SearchResult;

crate::define_status!(
    BannerStatus {
        ACTIVE = 1,
        INACTIVE = 2,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub id: i64,
    pub name: String,
    pub image_url: String,
    pub link_url: String,
    pub language: String,
    pub width: i32,
    pub height: i32,
    pub sort_order: i32,
    pub status: BannerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Banner search filters; `None` leaves a dimension unfiltered
#[derive(Debug, Clone, Default)]
pub struct SearchBannerQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub language: Option<String>,
    pub status: Option<BannerStatus>,
    pub page: i64,
    pub per_page: i64,
}

pub type SearchBannersResult = SearchResult<Banner>;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store_object::SearchResult;

crate::define_status!(
    AnnotationStatus {
        ACTIVE = 1,
        INACTIVE = 2,
        DELETED = 3,
    }
);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: i64,
    pub affiliate_id: i64,
    pub title: String,
    pub content: String,
    pub status: AnnotationStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Annotation joined with the affiliate login and its attachment file names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDTO {
    pub id: i64,
    pub affiliate_id: i64,
    pub login_name: String,
    pub title: String,
    pub content: String,
    pub status: AnnotationStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// File names ordered by upload
    #[serde(default)]
    pub attachments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationAttachment {
    pub id: i64,
    pub annotation_id: i64,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchAnnotationQuery {
    pub affiliate_id: Option<i64>,
    /// Case-insensitive substring of the affiliate login
    pub login_name: Option<String>,
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    pub status: Option<AnnotationStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: i64,
    pub per_page: i64,
}

pub type SearchAnnotationResult = SearchResult<AnnotationDTO>;

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a comment attached to a request
#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub request_id: i64,
    pub content: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

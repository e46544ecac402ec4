use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::requests::models::Comment;

/// Request DTO for attaching a comment to a request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCommentDto {
    /// The note text (required)
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,

    /// Optional author, typically the technician name
    #[validate(length(max = 255, message = "Author must not exceed 255 characters"))]
    pub author: Option<String>,
}

/// Response DTO for a comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponseDto {
    pub id: i64,
    pub request_id: i64,
    pub content: String,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponseDto {
    fn from(c: Comment) -> Self {
        Self {
            id: c.id,
            request_id: c.request_id,
            content: c.content,
            author: c.author,
            created_at: c.created_at,
        }
    }
}

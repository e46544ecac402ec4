use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::requests::dtos::CommentResponseDto;
use crate::features::requests::models::{Comment, GiftRequest, RequestStatus};

/// A file attached to a create-request form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Fields accepted when creating a request.
///
/// Assembled field by field from the multipart form by the handler;
/// `recipient_name` is the only required field.
#[derive(Debug, Clone, Default)]
pub struct CreateRequestDto {
    pub recipient_name: String,
    pub contact_info: Option<String>,
    pub requestor_contact: Option<String>,
    pub client_contact: Option<String>,
    pub description: Option<String>,
    pub technician: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub organization_name: Option<String>,
    pub receipt_id: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub computer_model: Option<String>,
    pub computer_type: Option<String>,
    pub computer_price: Option<String>,
    pub file: Option<UploadedFile>,
}

/// Create request form for OpenAPI documentation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateRequestForm {
    /// Name of the recipient (required)
    pub recipient_name: String,
    /// Legacy contact field
    pub contact_info: Option<String>,
    pub requestor_contact: Option<String>,
    pub client_contact: Option<String>,
    pub description: Option<String>,
    pub technician: Option<String>,
    /// RFC 3339 timestamp
    pub due_date: Option<String>,
    pub organization_name: Option<String>,
    pub receipt_id: Option<String>,
    /// RFC 3339 timestamp
    pub pickup_date: Option<String>,
    pub computer_model: Option<String>,
    pub computer_type: Option<String>,
    pub computer_price: Option<String>,
    /// Document to attach (e.g. a receipt PDF)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
}

/// Request DTO for partially updating a request.
///
/// Only fields present in the body are applied; absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRequestDto {
    #[validate(length(min = 1, max = 255, message = "Recipient name must be 1-255 characters"))]
    pub recipient_name: Option<String>,
    pub contact_info: Option<String>,
    pub requestor_contact: Option<String>,
    pub client_contact: Option<String>,
    pub description: Option<String>,
    pub technician: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<RequestStatus>,
    pub organization_name: Option<String>,
    pub request_date: Option<DateTime<Utc>>,
    pub receipt_id: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub computer_model: Option<String>,
    pub computer_type: Option<String>,
    pub computer_price: Option<String>,
}

/// Response DTO for a request, including its comments
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestResponseDto {
    pub id: i64,
    pub recipient_name: String,
    pub contact_info: Option<String>,
    pub requestor_contact: Option<String>,
    pub client_contact: Option<String>,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub technician: Option<String>,
    pub filename: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub organization_name: Option<String>,
    pub request_date: Option<DateTime<Utc>>,
    pub receipt_id: Option<String>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub computer_model: Option<String>,
    pub computer_type: Option<String>,
    pub computer_price: Option<String>,
    pub comments: Vec<CommentResponseDto>,
}

impl RequestResponseDto {
    /// Combine a request row with its loaded comments
    pub fn from_parts(request: GiftRequest, comments: Vec<Comment>) -> Self {
        Self {
            id: request.id,
            recipient_name: request.recipient_name,
            contact_info: request.contact_info,
            requestor_contact: request.requestor_contact,
            client_contact: request.client_contact,
            description: request.description,
            status: request.status,
            technician: request.technician,
            filename: request.filename,
            due_date: request.due_date,
            created_at: request.created_at,
            organization_name: request.organization_name,
            request_date: request.request_date,
            receipt_id: request.receipt_id,
            pickup_date: request.pickup_date,
            computer_model: request.computer_model,
            computer_type: request.computer_type,
            computer_price: request.computer_price,
            comments: comments.into_iter().map(Into::into).collect(),
        }
    }
}

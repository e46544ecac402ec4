use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Lifecycle states a request moves through, stored as lowercase text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    NotStarted,
    InProgress,
    ReadyForPickup,
    Completed,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::NotStarted => write!(f, "not_started"),
            RequestStatus::InProgress => write!(f, "in_progress"),
            RequestStatus::ReadyForPickup => write!(f, "ready_for_pickup"),
            RequestStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Database model for a repair/gift request
#[derive(Debug, Clone, FromRow)]
pub struct GiftRequest {
    pub id: i64,
    pub recipient_name: String,
    /// Legacy contact field, kept for backward compatibility
    pub contact_info: Option<String>,
    pub requestor_contact: Option<String>,
    pub client_contact: Option<String>,
    pub description: Option<String>,
    pub status: RequestStatus,
    pub technician: Option<String>,
    /// Filename of the uploaded document, if any
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(RequestStatus::NotStarted).unwrap(),
            "not_started"
        );
        assert_eq!(
            serde_json::to_value(RequestStatus::ReadyForPickup).unwrap(),
            "ready_for_pickup"
        );
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(RequestStatus::InProgress.to_string(), "in_progress");
        assert_eq!(RequestStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn status_defaults_to_not_started() {
        assert_eq!(RequestStatus::default(), RequestStatus::NotStarted);
    }
}

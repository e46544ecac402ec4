use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, ErrorBody, Result};
use crate::core::extractor::AppJson;
use crate::features::requests::dtos::{
    CommentResponseDto, CreateCommentDto, CreateRequestDto, CreateRequestForm, RequestResponseDto,
    UpdateRequestDto, UploadedFile,
};
use crate::features::requests::services::RequestService;
use crate::shared::constants::MAX_LIST_LIMIT;
use crate::shared::types::ListQuery;

/// Create a request
///
/// Accepts multipart/form-data; `recipient_name` is required, every other
/// field is optional. An attached `file` part is stored under its original
/// filename and served back under `/uploads/{filename}`.
#[utoipa::path(
    post,
    path = "/requests/",
    tag = "requests",
    request_body(
        content = CreateRequestForm,
        content_type = "multipart/form-data",
        description = "Request form with optional document attachment",
    ),
    responses(
        (status = 200, description = "Request created", body = RequestResponseDto),
        (status = 422, description = "Missing required field", body = ErrorBody)
    )
)]
pub async fn create_request(
    State(service): State<Arc<RequestService>>,
    mut multipart: Multipart,
) -> Result<Json<RequestResponseDto>> {
    let mut dto = CreateRequestDto::default();
    let mut recipient_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unnamed".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            dto.file = Some(UploadedFile {
                filename,
                data: data.to_vec(),
            });
            continue;
        }

        let text = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
        })?;
        // Browsers submit empty inputs as empty strings; treat them as absent
        if text.is_empty() {
            continue;
        }

        match field_name.as_str() {
            "recipient_name" => recipient_name = Some(text),
            "contact_info" => dto.contact_info = Some(text),
            "requestor_contact" => dto.requestor_contact = Some(text),
            "client_contact" => dto.client_contact = Some(text),
            "description" => dto.description = Some(text),
            "technician" => dto.technician = Some(text),
            "organization_name" => dto.organization_name = Some(text),
            "receipt_id" => dto.receipt_id = Some(text),
            "computer_model" => dto.computer_model = Some(text),
            "computer_type" => dto.computer_type = Some(text),
            "computer_price" => dto.computer_price = Some(text),
            "due_date" => dto.due_date = Some(parse_datetime("due_date", &text)?),
            "pickup_date" => dto.pickup_date = Some(parse_datetime("pickup_date", &text)?),
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    dto.recipient_name = recipient_name
        .ok_or_else(|| AppError::Validation("recipient_name is required".to_string()))?;

    let request = service.create(dto).await?;
    Ok(Json(request))
}

/// List requests, newest first
#[utoipa::path(
    get,
    path = "/requests/",
    tag = "requests",
    params(ListQuery),
    responses(
        (status = 200, description = "Requests ordered by creation time descending", body = Vec<RequestResponseDto>),
    )
)]
pub async fn list_requests(
    State(service): State<Arc<RequestService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RequestResponseDto>>> {
    let offset = query.offset.max(0);
    let limit = query.limit.clamp(1, MAX_LIST_LIMIT);

    let requests = service.list(offset, limit).await?;
    Ok(Json(requests))
}

/// Fetch one request including its comments
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request found", body = RequestResponseDto),
        (status = 404, description = "Request not found", body = ErrorBody)
    )
)]
pub async fn get_request(
    State(service): State<Arc<RequestService>>,
    Path(id): Path<i64>,
) -> Result<Json<RequestResponseDto>> {
    let request = service.get(id).await?;
    Ok(Json(request))
}

/// Partially update a request
///
/// Only the fields present in the body are applied; everything else keeps
/// its current value.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i64, Path, description = "Request id")),
    request_body = UpdateRequestDto,
    responses(
        (status = 200, description = "Updated request", body = RequestResponseDto),
        (status = 404, description = "Request not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    )
)]
pub async fn update_request(
    State(service): State<Arc<RequestService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateRequestDto>,
) -> Result<Json<RequestResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = service.update(id, dto).await?;
    Ok(Json(request))
}

/// Delete a request, its comments, and (best-effort) its uploaded file
#[utoipa::path(
    delete,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 204, description = "Request deleted"),
        (status = 404, description = "Request not found", body = ErrorBody)
    )
)]
pub async fn delete_request(
    State(service): State<Arc<RequestService>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attach a comment to a request
#[utoipa::path(
    post,
    path = "/requests/{id}/comments/",
    tag = "requests",
    params(("id" = i64, Path, description = "Owning request id")),
    request_body = CreateCommentDto,
    responses(
        (status = 200, description = "Comment created", body = CommentResponseDto),
        (status = 404, description = "Request not found", body = ErrorBody),
        (status = 422, description = "Validation error", body = ErrorBody)
    )
)]
pub async fn create_comment(
    State(service): State<Arc<RequestService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<CreateCommentDto>,
) -> Result<Json<CommentResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let comment = service.add_comment(id, dto).await?;
    Ok(Json(comment))
}

fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Validation(format!("Invalid {} timestamp: {}", field, e)))
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::core::error::{AppError, Result};
use crate::features::requests::dtos::{
    CommentResponseDto, CreateCommentDto, CreateRequestDto, RequestResponseDto, UpdateRequestDto,
};
use crate::features::requests::models::{Comment, GiftRequest, RequestStatus};
use crate::modules::storage::LocalStore;

/// Column list shared by every query that reads a full request row
const REQUEST_COLUMNS: &str = "id, recipient_name, contact_info, requestor_contact, \
     client_contact, description, status, technician, filename, due_date, created_at, \
     organization_name, request_date, receipt_id, pickup_date, computer_model, \
     computer_type, computer_price";

const COMMENT_COLUMNS: &str = "id, request_id, content, author, created_at";

/// Service for request and comment operations
pub struct RequestService {
    pool: SqlitePool,
    store: Arc<LocalStore>,
}

impl RequestService {
    pub fn new(pool: SqlitePool, store: Arc<LocalStore>) -> Self {
        Self { pool, store }
    }

    /// Create a request, storing the attached file (if any) under its
    /// original filename. A same-name upload overwrites the previous file.
    pub async fn create(&self, dto: CreateRequestDto) -> Result<RequestResponseDto> {
        let filename = match &dto.file {
            Some(file) => {
                self.store.save(&file.filename, &file.data).await?;
                Some(file.filename.clone())
            }
            None => None,
        };

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO requests (recipient_name, contact_info, requestor_contact, \
             client_contact, description, status, technician, filename, due_date, created_at, \
             organization_name, request_date, receipt_id, pickup_date, computer_model, \
             computer_type, computer_price) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {REQUEST_COLUMNS}"
        );
        let request = sqlx::query_as::<_, GiftRequest>(&sql)
            .bind(&dto.recipient_name)
            .bind(&dto.contact_info)
            .bind(&dto.requestor_contact)
            .bind(&dto.client_contact)
            .bind(&dto.description)
            .bind(RequestStatus::NotStarted)
            .bind(&dto.technician)
            .bind(&filename)
            .bind(dto.due_date)
            .bind(now)
            .bind(&dto.organization_name)
            .bind(now)
            .bind(&dto.receipt_id)
            .bind(dto.pickup_date)
            .bind(&dto.computer_model)
            .bind(&dto.computer_type)
            .bind(&dto.computer_price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create request: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Request created: id={}, recipient={}",
            request.id,
            request.recipient_name
        );

        Ok(RequestResponseDto::from_parts(request, Vec::new()))
    }

    /// List requests, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<Vec<RequestResponseDto>> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let requests = sqlx::query_as::<_, GiftRequest>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list requests: {:?}", e);
                AppError::Database(e)
            })?;

        let mut by_request = self.comments_for(&requests).await?;

        Ok(requests
            .into_iter()
            .map(|request| {
                let comments = by_request.remove(&request.id).unwrap_or_default();
                RequestResponseDto::from_parts(request, comments)
            })
            .collect())
    }

    /// Fetch one request with its comments
    pub async fn get(&self, id: i64) -> Result<RequestResponseDto> {
        let request = self
            .fetch_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        let comments = self.fetch_comments(id).await?;

        Ok(RequestResponseDto::from_parts(request, comments))
    }

    /// Apply the fields present in `dto` to an existing request, leaving the
    /// rest untouched, and write the merged row back
    pub async fn update(&self, id: i64, dto: UpdateRequestDto) -> Result<RequestResponseDto> {
        let mut request = self
            .fetch_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        if let Some(recipient_name) = dto.recipient_name {
            request.recipient_name = recipient_name;
        }
        if let Some(contact_info) = dto.contact_info {
            request.contact_info = Some(contact_info);
        }
        if let Some(requestor_contact) = dto.requestor_contact {
            request.requestor_contact = Some(requestor_contact);
        }
        if let Some(client_contact) = dto.client_contact {
            request.client_contact = Some(client_contact);
        }
        if let Some(description) = dto.description {
            request.description = Some(description);
        }
        if let Some(technician) = dto.technician {
            request.technician = Some(technician);
        }
        if let Some(due_date) = dto.due_date {
            request.due_date = Some(due_date);
        }
        if let Some(status) = dto.status {
            request.status = status;
        }
        if let Some(organization_name) = dto.organization_name {
            request.organization_name = Some(organization_name);
        }
        if let Some(request_date) = dto.request_date {
            request.request_date = Some(request_date);
        }
        if let Some(receipt_id) = dto.receipt_id {
            request.receipt_id = Some(receipt_id);
        }
        if let Some(pickup_date) = dto.pickup_date {
            request.pickup_date = Some(pickup_date);
        }
        if let Some(computer_model) = dto.computer_model {
            request.computer_model = Some(computer_model);
        }
        if let Some(computer_type) = dto.computer_type {
            request.computer_type = Some(computer_type);
        }
        if let Some(computer_price) = dto.computer_price {
            request.computer_price = Some(computer_price);
        }

        sqlx::query(
            "UPDATE requests SET recipient_name = ?, contact_info = ?, requestor_contact = ?, \
             client_contact = ?, description = ?, status = ?, technician = ?, due_date = ?, \
             organization_name = ?, request_date = ?, receipt_id = ?, pickup_date = ?, \
             computer_model = ?, computer_type = ?, computer_price = ? WHERE id = ?",
        )
        .bind(&request.recipient_name)
        .bind(&request.contact_info)
        .bind(&request.requestor_contact)
        .bind(&request.client_contact)
        .bind(&request.description)
        .bind(request.status)
        .bind(&request.technician)
        .bind(request.due_date)
        .bind(&request.organization_name)
        .bind(request.request_date)
        .bind(&request.receipt_id)
        .bind(request.pickup_date)
        .bind(&request.computer_model)
        .bind(&request.computer_type)
        .bind(&request.computer_price)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update request {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        tracing::info!("Request updated: id={}, status={}", id, request.status);

        let comments = self.fetch_comments(id).await?;
        Ok(RequestResponseDto::from_parts(request, comments))
    }

    /// Delete a request and its comments in one transaction, then remove the
    /// uploaded file best-effort (a failed removal is logged, not surfaced)
    pub async fn delete(&self, id: i64) -> Result<()> {
        let request = self
            .fetch_request(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM comments WHERE request_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete comments of request {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        sqlx::query("DELETE FROM requests WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete request {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        tx.commit().await.map_err(AppError::Database)?;

        if let Some(filename) = &request.filename {
            self.store.delete(filename).await;
        }

        tracing::info!("Request deleted: id={}", id);

        Ok(())
    }

    /// Attach a comment to an existing request
    pub async fn add_comment(
        &self,
        request_id: i64,
        dto: CreateCommentDto,
    ) -> Result<CommentResponseDto> {
        if self.fetch_request(request_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Request {} not found",
                request_id
            )));
        }

        let sql = format!(
            "INSERT INTO comments (request_id, content, author, created_at) \
             VALUES (?, ?, ?, ?) RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(request_id)
            .bind(&dto.content)
            .bind(&dto.author)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create comment: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!("Comment created: id={}, request_id={}", comment.id, request_id);

        Ok(comment.into())
    }

    async fn fetch_request(&self, id: i64) -> Result<Option<GiftRequest>> {
        let sql = format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?");
        sqlx::query_as::<_, GiftRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch request {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn fetch_comments(&self, request_id: i64) -> Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE request_id = ? ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(request_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch comments of request {}: {:?}", request_id, e);
                AppError::Database(e)
            })
    }

    /// Load the comments of every listed request in one query, grouped by
    /// owning request id
    async fn comments_for(
        &self,
        requests: &[GiftRequest],
    ) -> Result<HashMap<i64, Vec<Comment>>> {
        if requests.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; requests.len()].join(", ");
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE request_id IN ({placeholders}) \
             ORDER BY created_at ASC, id ASC"
        );

        let mut query = sqlx::query_as::<_, Comment>(&sql);
        for request in requests {
            query = query.bind(request.id);
        }

        let comments = query.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to fetch comments for listing: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_request: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_request.entry(comment.request_id).or_default().push(comment);
        }

        Ok(by_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    async fn test_service(name: &str) -> RequestService {
        let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");

        let root = std::env::temp_dir()
            .join("giftdesk-service-tests")
            .join(name);
        let _ = tokio::fs::remove_dir_all(&root).await;
        let store = Arc::new(LocalStore::new(root).await.expect("upload store"));

        RequestService::new(pool, store)
    }

    fn minimal_request(recipient: &str) -> CreateRequestDto {
        CreateRequestDto {
            recipient_name: recipient.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_default_status() {
        let service = test_service("create-defaults").await;

        let created = service.create(minimal_request("Ada")).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.status, RequestStatus::NotStarted);
        assert!(created.comments.is_empty());
        assert!(created.request_date.is_some());
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let service = test_service("partial-update").await;
        let created = service
            .create(CreateRequestDto {
                recipient_name: "Grace".to_string(),
                description: Some("broken hinge".to_string()),
                technician: Some("Lin".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let updated = service
            .update(
                created.id,
                UpdateRequestDto {
                    status: Some(RequestStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, RequestStatus::InProgress);
        assert_eq!(updated.recipient_name, "Grace");
        assert_eq!(updated.description.as_deref(), Some("broken hinge"));
        assert_eq!(updated.technician.as_deref(), Some("Lin"));
    }

    #[tokio::test]
    async fn delete_removes_owned_comments() {
        let service = test_service("delete-cascade").await;
        let created = service.create(minimal_request("Linus")).await.unwrap();
        service
            .add_comment(
                created.id,
                CreateCommentDto {
                    content: "waiting on parts".to_string(),
                    author: None,
                },
            )
            .await
            .unwrap();

        service.delete(created.id).await.unwrap();

        let err = service.get(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_on_missing_request_is_not_found() {
        let service = test_service("comment-missing").await;

        let err = service
            .add_comment(
                424242,
                CreateCommentDto {
                    content: "orphan".to_string(),
                    author: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_groups_comments_by_request() {
        let service = test_service("list-grouping").await;
        let first = service.create(minimal_request("First")).await.unwrap();
        let second = service.create(minimal_request("Second")).await.unwrap();
        service
            .add_comment(
                first.id,
                CreateCommentDto {
                    content: "note".to_string(),
                    author: Some("Lin".to_string()),
                },
            )
            .await
            .unwrap();

        let listed = service.list(0, 100).await.unwrap();

        assert_eq!(listed.len(), 2);
        let first_listed = listed.iter().find(|r| r.id == first.id).unwrap();
        let second_listed = listed.iter().find(|r| r.id == second.id).unwrap();
        assert_eq!(first_listed.comments.len(), 1);
        assert_eq!(first_listed.comments[0].author.as_deref(), Some("Lin"));
        assert!(second_listed.comments.is_empty());
    }
}

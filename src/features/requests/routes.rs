use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::requests::handlers;
use crate::features::requests::services::RequestService;

/// Create routes for the requests feature
///
/// Note: the whole API is public; this is a small internal tool with no
/// authentication layer.
pub fn routes(service: Arc<RequestService>) -> Router {
    Router::new()
        .route(
            "/requests/",
            post(handlers::create_request).get(handlers::list_requests),
        )
        .route(
            "/requests/{id}",
            get(handlers::get_request)
                .put(handlers::update_request)
                .delete(handlers::delete_request),
        )
        .route("/requests/{id}/comments/", post(handlers::create_comment))
        .with_state(service)
}

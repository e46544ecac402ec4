use utoipa::{Modify, OpenApi};

use crate::core::error::ErrorBody;
use crate::features::requests::{
    dtos as requests_dtos, handlers as requests_handlers, models as requests_models,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        requests_handlers::create_request,
        requests_handlers::list_requests,
        requests_handlers::get_request,
        requests_handlers::update_request,
        requests_handlers::delete_request,
        requests_handlers::create_comment,
    ),
    components(
        schemas(
            ErrorBody,
            requests_models::RequestStatus,
            requests_dtos::CreateRequestForm,
            requests_dtos::UpdateRequestDto,
            requests_dtos::RequestResponseDto,
            requests_dtos::CreateCommentDto,
            requests_dtos::CommentResponseDto,
        )
    ),
    tags(
        (name = "requests", description = "Repair/gift request tracking"),
    ),
    info(
        title = "GiftDesk API",
        version = "0.1.0",
        description = "Record-tracking backend for device repair and gift requests",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

mod comment_dto;
mod request_dto;

pub use comment_dto::{CommentResponseDto, CreateCommentDto};
pub use request_dto::{
    CreateRequestDto, CreateRequestForm, RequestResponseDto, UpdateRequestDto, UploadedFile,
};

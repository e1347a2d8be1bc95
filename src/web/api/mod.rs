pub mod browse;
pub mod preview;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json as AxumJson;

use crate::blobstore::BlobError;
use crate::web::utils::errors;

/// 存储层错误到 HTTP 响应的统一映射
pub(crate) fn blob_error_response(err: &BlobError) -> Response {
    match err {
        BlobError::NotFound(what) => (
            StatusCode::NOT_FOUND,
            AxumJson(errors::not_found_json(what)),
        )
            .into_response(),
        BlobError::AccessDenied => (
            StatusCode::UNAUTHORIZED,
            AxumJson(errors::unauthorized_json("Access denied")),
        )
            .into_response(),
        BlobError::Other(source) => (
            StatusCode::BAD_REQUEST,
            AxumJson(errors::bad_request_json(&source.to_string())),
        )
            .into_response(),
    }
}

use crate::blobstore::Credentials;
use crate::web::state::AppState;
use crate::web::utils::errors;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    Json as AxumJson,
};
use serde::Deserialize;
use std::sync::Arc;

use super::blob_error_response;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRequest {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

impl BucketRequest {
    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
        }
    }
}

/// 凭证校验接口
///
/// 对指定桶做一次有界读探测，失败统一按 401 返回。
pub async fn verify_access_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BucketRequest>,
) -> impl IntoResponse {
    match state
        .blob
        .verify_access(&payload.credentials(), &payload.bucket_name)
        .await
    {
        Ok(()) => AxumJson(serde_json::json!({
            "status": "success",
            "message": "Credentials verified successfully"
        }))
        .into_response(),
        Err(e) => {
            tracing::warn!("[Browse] Verify access failed: {}", e);
            (
                StatusCode::UNAUTHORIZED,
                AxumJson(errors::unauthorized_json(&e.to_string())),
            )
                .into_response()
        }
    }
}

/// 列出桶内对象
pub async fn list_contents_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BucketRequest>,
) -> impl IntoResponse {
    match state
        .blob
        .list_objects(&payload.credentials(), &payload.bucket_name)
        .await
    {
        Ok(objects) => {
            let contents: Vec<_> = objects
                .into_iter()
                .map(|object| {
                    serde_json::json!({
                        "name": object.key,
                        "size": object.size,
                        "lastModified": object.last_modified,
                    })
                })
                .collect();
            AxumJson(serde_json::json!({ "contents": contents })).into_response()
        }
        Err(e) => {
            tracing::error!("[Browse] List bucket contents failed: {}", e);
            blob_error_response(&e)
        }
    }
}

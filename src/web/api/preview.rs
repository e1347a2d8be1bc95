use crate::blobstore::Credentials;
use crate::preview::FETCH_CAP_BYTES;
use crate::web::state::AppState;
use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::blob_error_response;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub file_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub file_name: String,
    pub file_type: String,
    pub delimiter: Option<char>,
    pub preview_text: String,
    pub total_bytes: u64,
}

/// 快速预览接口
///
/// 拉取对象的有界前缀，分类、有界解压并生成文本节选。核心流程对
/// 畸形输入不报错，只有字节范围本身取不到时才失败。
pub async fn quick_preview_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FileRequest>,
) -> Response {
    let creds = Credentials {
        access_key_id: payload.access_key_id.clone(),
        secret_access_key: payload.secret_access_key.clone(),
    };

    let fetched = match state
        .blob
        .fetch_range(
            &creds,
            &payload.bucket_name,
            &payload.file_name,
            0,
            FETCH_CAP_BYTES - 1,
        )
        .await
    {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!("[Preview] Fetch range failed: {}", e);
            return blob_error_response(&e);
        }
    };

    let format = state.engine.classify(&fetched.bytes);
    let preview = state.engine.preview(&fetched.bytes, &format);

    AxumJson(PreviewResponse {
        file_name: payload.file_name,
        file_type: preview.format,
        delimiter: preview.delimiter,
        preview_text: preview.text,
        total_bytes: fetched.total_size,
    })
    .into_response()
}

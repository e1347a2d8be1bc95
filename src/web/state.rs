use std::sync::Arc;

use crate::blobstore::BlobStore;
use crate::preview::PreviewEngine;

/// Web 应用全局状态
///
/// 职责：包含所有跨请求共享的资源对象，通过 Arc 注入到 Axum 的 Handler 中。
pub struct AppState {
    pub blob: Arc<dyn BlobStore>,
    pub engine: PreviewEngine,
}

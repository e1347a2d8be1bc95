mod blobstore;
mod config;
mod preview;
mod web;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

use crate::blobstore::S3BlobStore;
use crate::config::Settings;
use crate::preview::PreviewEngine;
use crate::web::{
    api::{browse, preview as preview_api},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blobview_core=info".parse().unwrap())
                .add_directive("tower_http=debug".parse().unwrap()),
        )
        .init();

    info!("[Startup] blobview Core initializing...");

    let settings = Settings::new().expect("Failed to load config");
    info!(
        "[Config] Binding at {}:{}",
        settings.server.host, settings.server.port
    );

    // 构造全局状态
    let state = Arc::new(AppState {
        blob: Arc::new(S3BlobStore::new(settings.s3.clone())),
        engine: PreviewEngine::default(),
    });

    // 路由定义
    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/verify-access", post(browse::verify_access_handler))
        .route(
            "/list-bucket-contents",
            post(browse::list_contents_handler),
        )
        .route("/quick-preview", post(preview_api::quick_preview_handler))
        .with_state(state)
        .layer(web::cors_layer(&settings.server.cors_origin)?)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[Startup] Service ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

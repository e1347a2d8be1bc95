use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use blobview_core::blobstore::{BlobError, BlobObject, BlobStore, Credentials, FetchedRange};
use blobview_core::preview::PreviewEngine;
use blobview_core::web::{
    api::{browse, preview},
    state::AppState,
};

const GOOD_KEY: &str = "AKIATEST";
const FETCH_CAP: u64 = 100_000;

struct FakeBlobStore {
    objects: HashMap<(String, String), Vec<u8>>,
}

impl FakeBlobStore {
    fn new(objects: Vec<(&str, &str, Vec<u8>)>) -> Self {
        Self {
            objects: objects
                .into_iter()
                .map(|(bucket, key, data)| ((bucket.to_string(), key.to_string()), data))
                .collect(),
        }
    }

    fn check(&self, creds: &Credentials) -> Result<(), BlobError> {
        if creds.access_key_id == GOOD_KEY {
            Ok(())
        } else {
            Err(BlobError::AccessDenied)
        }
    }
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn verify_access(&self, creds: &Credentials, _bucket: &str) -> Result<(), BlobError> {
        self.check(creds)
    }

    async fn list_objects(
        &self,
        creds: &Credentials,
        bucket: &str,
    ) -> Result<Vec<BlobObject>, BlobError> {
        self.check(creds)?;
        let mut objects: Vec<BlobObject> = self
            .objects
            .iter()
            .filter(|((b, _), _)| b == bucket)
            .map(|((_, key), data)| BlobObject {
                key: key.clone(),
                size: data.len() as u64,
                last_modified: None,
            })
            .collect();
        objects.sort_by(|left, right| left.key.cmp(&right.key));
        Ok(objects)
    }

    async fn fetch_range(
        &self,
        creds: &Credentials,
        bucket: &str,
        key: &str,
        start: u64,
        end_inclusive: u64,
    ) -> Result<FetchedRange, BlobError> {
        self.check(creds)?;
        let data = self
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .ok_or_else(|| BlobError::NotFound(key.to_string()))?;
        let total_size = data.len() as u64;
        let end = end_inclusive.saturating_add(1).min(total_size);
        let bytes = if start >= end {
            Bytes::new()
        } else {
            Bytes::copy_from_slice(&data[start as usize..end as usize])
        };
        Ok(FetchedRange { bytes, total_size })
    }
}

fn make_app(store: FakeBlobStore) -> Router {
    let state = Arc::new(AppState {
        blob: Arc::new(store),
        engine: PreviewEngine::default(),
    });
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/verify-access", post(browse::verify_access_handler))
        .route("/list-bucket-contents", post(browse::list_contents_handler))
        .route("/quick-preview", post(preview::quick_preview_handler))
        .with_state(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn bucket_body(access_key: &str) -> Value {
    json!({
        "accessKeyId": access_key,
        "secretAccessKey": "secret",
        "bucketName": "demo",
    })
}

fn file_body(access_key: &str, file_name: &str) -> Value {
    let mut body = bucket_body(access_key);
    body["fileName"] = json!(file_name);
    body
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("json");
    (status, value)
}

fn gzip_bytes(payload: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn health_route_returns_ok() {
    let app = Router::new().route("/health", get(|| async { "OK" }));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert_eq!(body.as_ref(), b"OK");
}

#[tokio::test]
async fn verify_access_accepts_known_credentials() {
    let app = make_app(FakeBlobStore::new(vec![]));
    let response = app
        .oneshot(post_json("/verify-access", bucket_body(GOOD_KEY)))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Credentials verified successfully");
}

#[tokio::test]
async fn verify_access_rejects_bad_credentials() {
    let app = make_app(FakeBlobStore::new(vec![]));
    let response = app
        .oneshot(post_json("/verify-access", bucket_body("AKIAWRONG")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn list_bucket_contents_reports_objects() {
    let app = make_app(FakeBlobStore::new(vec![
        ("demo", "a.csv", b"a,b\n".to_vec()),
        ("demo", "big.bin", vec![0u8; 256]),
        ("other", "hidden.txt", b"x".to_vec()),
    ]));
    let response = app
        .oneshot(post_json("/list-bucket-contents", bucket_body(GOOD_KEY)))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    let contents = body["contents"].as_array().expect("contents");
    assert_eq!(contents.len(), 2);
    assert_eq!(contents[0]["name"], "a.csv");
    assert_eq!(contents[0]["size"], 4);
    assert_eq!(contents[1]["name"], "big.bin");
}

#[tokio::test]
async fn quick_preview_roundtrips_gzipped_csv() {
    let compressed = gzip_bytes(b"a,b,c\n1,2,3\n");
    let total = compressed.len() as u64;
    let app = make_app(FakeBlobStore::new(vec![(
        "demo",
        "data.csv.gz",
        compressed,
    )]));

    let response = app
        .oneshot(post_json("/quick-preview", file_body(GOOD_KEY, "data.csv.gz")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fileName"], "data.csv.gz");
    assert_eq!(body["fileType"], "csv (delimiter: ',')");
    assert_eq!(body["delimiter"], ",");
    assert_eq!(body["previewText"], "a,b,c\n1,2,3\n");
    assert_eq!(body["totalBytes"], total);
}

#[tokio::test]
async fn quick_preview_reports_tsv_for_plain_text() {
    let app = make_app(FakeBlobStore::new(vec![(
        "demo",
        "table.txt",
        b"id\tname\n1\talice\n".to_vec(),
    )]));

    let response = app
        .oneshot(post_json("/quick-preview", file_body(GOOD_KEY, "table.txt")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fileType"], "tsv");
    assert_eq!(body["delimiter"], "\t");
}

#[tokio::test]
async fn quick_preview_caps_text_and_reports_full_size() {
    // 对象比拉取上限还大：预览文本被截断，totalBytes 仍是完整大小
    let app = make_app(FakeBlobStore::new(vec![(
        "demo",
        "large.log",
        vec![b'x'; 150_000],
    )]));

    let response = app
        .oneshot(post_json("/quick-preview", file_body(GOOD_KEY, "large.log")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    let text = body["previewText"].as_str().expect("previewText");
    assert_eq!(text.len(), 10_000);
    assert_eq!(body["totalBytes"], 150_000);
    assert!(body["totalBytes"].as_u64().unwrap() > FETCH_CAP);
}

#[tokio::test]
async fn quick_preview_parquet_prefix_has_no_delimiter() {
    let mut data = b"PAR1".to_vec();
    data.extend((0..50u8).map(|i| i.wrapping_mul(73) ^ 0xc5));
    let app = make_app(FakeBlobStore::new(vec![("demo", "part-0.parquet", data)]));

    let response = app
        .oneshot(post_json(
            "/quick-preview",
            file_body(GOOD_KEY, "part-0.parquet"),
        ))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fileType"], "parquet");
    assert_eq!(body["delimiter"], Value::Null);
}

#[tokio::test]
async fn quick_preview_missing_object_is_404() {
    let app = make_app(FakeBlobStore::new(vec![]));
    let response = app
        .oneshot(post_json("/quick-preview", file_body(GOOD_KEY, "ghost.csv")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "BVW-CORE-404");
}

#[tokio::test]
async fn quick_preview_truncated_gzip_degrades_to_raw_text() {
    let compressed = gzip_bytes(b"a,b,c\n1,2,3\n");
    let app = make_app(FakeBlobStore::new(vec![(
        "demo",
        "cut.gz",
        compressed[..20].to_vec(),
    )]));

    let response = app
        .oneshot(post_json("/quick-preview", file_body(GOOD_KEY, "cut.gz")))
        .await
        .expect("response");

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fileType"], "gzip");
    assert_eq!(body["delimiter"], Value::Null);
    assert_eq!(
        body["previewText"].as_str().expect("previewText").chars().count(),
        20
    );
}

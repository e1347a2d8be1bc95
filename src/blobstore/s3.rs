use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use crate::config::S3Settings;

use super::{BlobError, BlobObject, BlobStore, Credentials, FetchedRange};

/// 基于 `object_store` 的 S3 实现。
///
/// 凭证随请求传入，store 实例按 桶 + AccessKeyId 缓存，首次使用时构建。
pub struct S3BlobStore {
    settings: S3Settings,
    stores: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl S3BlobStore {
    pub fn new(settings: S3Settings) -> Self {
        Self {
            settings,
            stores: RwLock::new(HashMap::new()),
        }
    }

    fn store_for(
        &self,
        creds: &Credentials,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, BlobError> {
        let cache_key = format!("s3://{}@{}", creds.access_key_id, bucket);
        if let Some(store) = self.stores.read().unwrap().get(&cache_key) {
            return Ok(store.clone());
        }

        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&self.settings.region)
            .with_access_key_id(&creds.access_key_id)
            .with_secret_access_key(&creds.secret_access_key);
        // 自建端点（minio/localstack）支持
        if let Some(endpoint) = &self.settings.endpoint {
            builder = builder.with_endpoint(endpoint);
            if endpoint.starts_with("http://") {
                builder = builder.with_allow_http(true);
            }
        }
        let store: Arc<dyn ObjectStore> =
            Arc::new(builder.build().context("Failed to create S3 store")?);
        self.stores
            .write()
            .unwrap()
            .insert(cache_key, store.clone());
        Ok(store)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn verify_access(&self, creds: &Credentials, bucket: &str) -> Result<(), BlobError> {
        let store = self.store_for(creds, bucket)?;
        probe(store.as_ref())
            .await
            .map_err(|err| map_store_error(err, bucket))
    }

    async fn list_objects(
        &self,
        creds: &Credentials,
        bucket: &str,
    ) -> Result<Vec<BlobObject>, BlobError> {
        let store = self.store_for(creds, bucket)?;
        collect_objects(store.as_ref())
            .await
            .map_err(|err| map_store_error(err, bucket))
    }

    async fn fetch_range(
        &self,
        creds: &Credentials,
        bucket: &str,
        key: &str,
        start: u64,
        end_inclusive: u64,
    ) -> Result<FetchedRange, BlobError> {
        let store = self.store_for(creds, bucket)?;
        let location = ObjectPath::from(key);
        read_clamped(store.as_ref(), &location, start, end_inclusive)
            .await
            .map_err(|err| map_store_error(err, key))
    }
}

/// 取列表第一页即可确认凭证有效；空桶也算成功
async fn probe(store: &dyn ObjectStore) -> Result<(), object_store::Error> {
    let mut listing = store.list(None);
    match listing.next().await {
        Some(Err(err)) => Err(err),
        _ => Ok(()),
    }
}

async fn collect_objects(
    store: &dyn ObjectStore,
) -> Result<Vec<BlobObject>, object_store::Error> {
    let mut listing = store.list(None);
    let mut objects = Vec::new();
    while let Some(item) = listing.next().await {
        let meta = item?;
        objects.push(BlobObject {
            key: meta.location.to_string(),
            size: meta.size,
            last_modified: Some(meta.last_modified.timestamp()),
        });
    }
    Ok(objects)
}

/// 先 head 拿对象大小，再把请求范围钳制进去；空对象直接返回空字节
async fn read_clamped(
    store: &dyn ObjectStore,
    location: &ObjectPath,
    start: u64,
    end_inclusive: u64,
) -> Result<FetchedRange, object_store::Error> {
    let meta = store.head(location).await?;
    let total_size = meta.size;
    let end = end_inclusive.saturating_add(1).min(total_size);
    if start >= end {
        return Ok(FetchedRange {
            bytes: Bytes::new(),
            total_size,
        });
    }
    let bytes = store.get_range(location, start..end).await?;
    Ok(FetchedRange { bytes, total_size })
}

fn map_store_error(err: object_store::Error, what: &str) -> BlobError {
    match err {
        object_store::Error::NotFound { .. } => BlobError::NotFound(what.to_string()),
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => BlobError::AccessDenied,
        other => BlobError::Other(other.into()),
    }
}

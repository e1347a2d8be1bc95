mod s3;

pub use s3::S3BlobStore;

use async_trait::async_trait;
use bytes::Bytes;

/// 请求方提供的对象存储凭证，随请求传入，不落盘、不写日志
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// 列表项
#[derive(Clone, Debug)]
pub struct BlobObject {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<i64>,
}

/// 范围读取结果：取回的字节与对象总大小
#[derive(Clone, Debug)]
pub struct FetchedRange {
    pub bytes: Bytes,
    pub total_size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("access denied")]
    AccessDenied,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 对象存储能力接口。预览核心只依赖 `fetch_range`，且只会请求固定的
/// 有界范围；列表与凭证校验服务于外围接口。
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// 有界探测：验证凭证对指定桶的读权限
    async fn verify_access(&self, creds: &Credentials, bucket: &str) -> Result<(), BlobError>;

    async fn list_objects(
        &self,
        creds: &Credentials,
        bucket: &str,
    ) -> Result<Vec<BlobObject>, BlobError>;

    /// 读取 `[start, end_inclusive]` 字节范围，范围会被钳制到对象大小
    async fn fetch_range(
        &self,
        creds: &Credentials,
        bucket: &str,
        key: &str,
        start: u64,
        end_inclusive: u64,
    ) -> Result<FetchedRange, BlobError>;
}

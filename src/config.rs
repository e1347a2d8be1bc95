use config::{Config, Environment, File};
use serde::Deserialize;

/// 应用配置总结构
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub s3: S3Settings,
}

/// 服务相关配置（监听地址、端口、允许的前端来源）
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// CORS 允许的前端来源（带凭证请求，不能用通配符）
    pub cors_origin: String,
}

/// S3 客户端配置
#[derive(Debug, Deserialize, Clone)]
pub struct S3Settings {
    pub region: String,
    /// 兼容 minio/localstack 的自定义端点
    /// http 端点会自动放行明文传输，仅用于本地联调
    pub endpoint: Option<String>,
}

impl Settings {
    /// 加载配置：支持默认值、可选配置文件、环境变量覆盖
    pub fn new() -> anyhow::Result<Self> {
        let builder = Config::builder()
            // 默认值（代码内硬编码）
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.cors_origin", "http://localhost:3000")?
            .set_default("s3.region", "us-east-1")?
            .set_default::<&str, Option<String>>("s3.endpoint", None)?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("BVW").separator("__"));

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

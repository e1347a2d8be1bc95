pub mod decompress;
pub mod detect;
pub mod engine;
pub mod format;
pub mod sniff;

pub use engine::{Preview, PreviewEngine};
pub use format::FileFormat;

/// 远端前缀拉取上限（字节）
pub const FETCH_CAP_BYTES: u64 = 100_000;

/// 预览载荷上限：解压前按字节截断，解码后按字符再截断
pub const EXCERPT_CAP: usize = 10_000;

/// 分隔符嗅探采样的最大字符数
pub const SNIFF_SAMPLE_CHARS: usize = 1_000;

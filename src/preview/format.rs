use std::fmt;

use super::sniff::{MIME_EMPTY, MIME_OCTET_STREAM};

/// 文件格式标签：签名命中的封闭集合，或内容嗅探得到的 MIME 字符串
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Gzip,
    Bzip2,
    Xz,
    Zip,
    Parquet,
    Sniffed(String),
}

impl FileFormat {
    pub fn label(&self) -> &str {
        match self {
            FileFormat::Gzip => "gzip",
            FileFormat::Bzip2 => "bz2",
            FileFormat::Xz => "xz",
            FileFormat::Zip => "zip",
            FileFormat::Parquet => "parquet",
            FileFormat::Sniffed(mime) => mime,
        }
    }

    /// 分隔符嗅探的门限：标签名含 "text"，或为通用二进制/空占位类型。
    /// 内容嗅探不够精确，CSV/TSV 常被归为 octet-stream。
    pub fn is_textual(&self) -> bool {
        match self {
            FileFormat::Sniffed(mime) => {
                mime.contains("text") || mime == MIME_OCTET_STREAM || mime == MIME_EMPTY
            }
            _ => false,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

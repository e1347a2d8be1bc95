//! 格式分类：固定签名表优先，内容嗅探兜底，最后做 parquet 纠正。
//! 短于签名长度的缓冲区一律视为未命中，不会越界读取。

use super::format::FileFormat;
use super::sniff::{ContentSniffer, MIME_OCTET_STREAM};

/// gzip magic (RFC 1952)
pub const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
/// bzip2 stream header
pub const BZIP2_MAGIC: &[u8] = b"BZh";
/// xz stream header
pub const XZ_MAGIC: &[u8] = &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];
/// zip local file header
pub const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// parquet 文件头（也出现在文件尾）
pub const PARQUET_MAGIC: &[u8] = b"PAR1";

/// 按严格优先级对缓冲区分类。全函数：任何字节序列（含空）都有且只有
/// 一个结果，从不报错。
pub fn classify(buffer: &[u8], sniffer: &dyn ContentSniffer) -> FileFormat {
    if buffer.starts_with(GZIP_MAGIC) {
        return FileFormat::Gzip;
    }
    if buffer.starts_with(BZIP2_MAGIC) {
        return FileFormat::Bzip2;
    }
    if buffer.starts_with(XZ_MAGIC) {
        return FileFormat::Xz;
    }
    if buffer.starts_with(ZIP_MAGIC) {
        return FileFormat::Zip;
    }

    let mime = sniffer.sniff(buffer);
    // libmagic 类嗅探会把 parquet 归为通用二进制，用文件头纠正
    if mime == MIME_OCTET_STREAM && buffer.starts_with(PARQUET_MAGIC) {
        return FileFormat::Parquet;
    }
    FileFormat::Sniffed(mime)
}

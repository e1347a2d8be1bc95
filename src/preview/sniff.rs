//! 内容嗅探与分隔符嗅探：以 trait 注入，便于测试时替换为确定性假实现。

pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_EMPTY: &str = "application/x-empty";
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// 基于内容的 MIME 分类，兜底分类器。不会失败：空输入返回空占位类型，
/// 无法识别的内容返回通用二进制类型。
pub trait ContentSniffer: Send + Sync {
    fn sniff(&self, buffer: &[u8]) -> String;
}

#[derive(Debug, thiserror::Error)]
#[error("no consistent delimiter found in sample")]
pub struct NoConsistentDelimiter;

/// 表格文本分隔符嗅探
pub trait DelimiterSniffer: Send + Sync {
    fn sniff(&self, sample: &str) -> Result<char, NoConsistentDelimiter>;
}

/// 常见文件头签名表（压缩容器类签名在分类器里优先处理，不在此表）
const MAGIC_MIMES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a], "image/png"),
    (&[0xff, 0xd8, 0xff], "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (&[0x28, 0xb5, 0x2f, 0xfd], "application/zstd"),
    (b"SQLite format 3\0", "application/vnd.sqlite3"),
];

#[derive(Debug, Default)]
pub struct DefaultContentSniffer;

impl ContentSniffer for DefaultContentSniffer {
    fn sniff(&self, buffer: &[u8]) -> String {
        if buffer.is_empty() {
            return MIME_EMPTY.to_string();
        }
        for (magic, mime) in MAGIC_MIMES {
            if buffer.starts_with(magic) {
                return (*mime).to_string();
            }
        }
        if looks_textual(buffer) {
            return MIME_TEXT_PLAIN.to_string();
        }
        MIME_OCTET_STREAM.to_string()
    }
}

fn looks_textual(buffer: &[u8]) -> bool {
    if buffer.contains(&0) {
        return false;
    }
    if let Ok(text) = std::str::from_utf8(buffer) {
        // 合法 UTF-8 但混有控制字符的仍按二进制处理
        return !text
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'));
    }
    // 非 UTF-8 时按可打印 ASCII 占比判定
    let printable = buffer
        .iter()
        .filter(|&&b| matches!(b, b'\t' | b'\n' | b'\r' | 0x20..=0x7e))
        .count();
    printable * 100 >= buffer.len() * 90
}

/// 候选分隔符，按优先级排列
const DELIMITER_CANDIDATES: [char; 5] = [',', '\t', ';', '|', ':'];

#[derive(Debug, Default)]
pub struct DefaultDelimiterSniffer;

impl DelimiterSniffer for DefaultDelimiterSniffer {
    /// 对采样文本的完整行做频次一致性检测：某候选分隔符在每一非空行中
    /// 出现次数相同且非零，即视为命中。至少需要一个完整行。
    fn sniff(&self, sample: &str) -> Result<char, NoConsistentDelimiter> {
        // 末尾可能是被截断的半行，只取最后一个换行符之前的内容
        let complete = match sample.rfind('\n') {
            Some(idx) => &sample[..idx],
            None => return Err(NoConsistentDelimiter),
        };
        let lines: Vec<&str> = complete
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();
        if lines.is_empty() {
            return Err(NoConsistentDelimiter);
        }

        for candidate in DELIMITER_CANDIDATES {
            let mut counts = lines
                .iter()
                .map(|line| line.chars().filter(|&c| c == candidate).count());
            let first = counts.next().unwrap_or(0);
            if first > 0 && counts.all(|count| count == first) {
                return Ok(candidate);
            }
        }
        Err(NoConsistentDelimiter)
    }
}

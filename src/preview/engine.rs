//! 预览引擎：有界解压 → 安全解码 → 分隔符嗅探 → 截断。
//!
//! 本模块对畸形/截断输入从不向调用方报错：解压失败退回原始字节，
//! 解码两级兜底永不失败，嗅探失败只是"无分隔符"。

use std::sync::Arc;

use super::decompress;
use super::detect;
use super::format::FileFormat;
use super::sniff::{
    ContentSniffer, DefaultContentSniffer, DefaultDelimiterSniffer, DelimiterSniffer,
};
use super::{EXCERPT_CAP, SNIFF_SAMPLE_CHARS};

/// 单次请求的预览产物
#[derive(Clone, Debug)]
pub struct Preview {
    /// 解码后的文本节选，不超过 [`EXCERPT_CAP`] 个字符
    pub text: String,
    /// 最终格式标签：分隔符命中时改写为 tsv / csv 变体
    pub format: String,
    pub delimiter: Option<char>,
}

pub struct PreviewEngine {
    content: Arc<dyn ContentSniffer>,
    delimiter: Arc<dyn DelimiterSniffer>,
}

impl Default for PreviewEngine {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultContentSniffer),
            Arc::new(DefaultDelimiterSniffer),
        )
    }
}

impl PreviewEngine {
    pub fn new(content: Arc<dyn ContentSniffer>, delimiter: Arc<dyn DelimiterSniffer>) -> Self {
        Self { content, delimiter }
    }

    /// 对拉取到的前缀分类，见 [`detect::classify`]
    pub fn classify(&self, buffer: &[u8]) -> FileFormat {
        detect::classify(buffer, self.content.as_ref())
    }

    /// 生成预览。解压只处理截断到 [`EXCERPT_CAP`] 的节选，而非完整前缀，
    /// 因此必须容忍不完整的压缩流。
    pub fn preview(&self, buffer: &[u8], format: &FileFormat) -> Preview {
        let excerpt = &buffer[..buffer.len().min(EXCERPT_CAP)];

        let inflated = match format {
            FileFormat::Gzip => Some(decompress::inflate_gzip(excerpt, EXCERPT_CAP)),
            FileFormat::Bzip2 => Some(decompress::inflate_bzip2(excerpt, EXCERPT_CAP)),
            FileFormat::Xz => Some(decompress::inflate_xz(excerpt, EXCERPT_CAP)),
            // zip/parquet 是结构化容器，短前缀解不出有意义的内容；
            // 其余嗅探类型本身就是原始载荷
            FileFormat::Zip | FileFormat::Parquet | FileFormat::Sniffed(_) => None,
        };
        let (payload, inflate_ok) = match inflated {
            Some(Ok(bytes)) => (bytes, true),
            Some(Err(_)) => (excerpt.to_vec(), false),
            None => (excerpt.to_vec(), false),
        };

        let mut text = decode_text(&payload);
        truncate_chars(&mut text, EXCERPT_CAP);

        // 门限：文本类标签，或解压成功的载荷（压缩的 CSV 解出来才可嗅探）
        let mut label = format.label().to_string();
        let mut delimiter = None;
        if inflate_ok || format.is_textual() {
            if let Ok(found) = self.delimiter.sniff(sample_prefix(&text, SNIFF_SAMPLE_CHARS)) {
                delimiter = Some(found);
                label = if found == '\t' {
                    "tsv".to_string()
                } else {
                    format!("csv (delimiter: '{}')", found)
                };
            }
        }

        Preview {
            text,
            format: label,
            delimiter,
        }
    }
}

/// 两级安全解码，构造上不可能失败：严格 UTF-8 优先；仅末尾断在多字节
/// 字符中间时丢弃残缺尾部；其余非法序列整体退回 Latin-1 单字节解码。
fn decode_text(payload: &[u8]) -> String {
    match std::str::from_utf8(payload) {
        Ok(text) => text.to_string(),
        Err(err) if err.error_len().is_none() => {
            String::from_utf8_lossy(&payload[..err.valid_up_to()]).into_owned()
        }
        Err(_) => payload.iter().map(|&b| b as char).collect(),
    }
}

fn truncate_chars(text: &mut String, cap: usize) {
    if let Some((idx, _)) = text.char_indices().nth(cap) {
        text.truncate(idx);
    }
}

fn sample_prefix(text: &str, cap: usize) -> &str {
    match text.char_indices().nth(cap) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

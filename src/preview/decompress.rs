//! 对截断的压缩节选做有界流式解压。
//!
//! 输入可能在任意字节处被截断，解压到一半报错是常态而非异常；调用方
//! 收到 Err 后应退回展示原始字节。输出上限独立于输入大小，防止在
//! 节选范围内被解压炸弹放大。

use std::io::{self, Read};

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use xz2::read::XzDecoder;

pub fn inflate_gzip(excerpt: &[u8], cap: usize) -> io::Result<Vec<u8>> {
    read_capped(MultiGzDecoder::new(excerpt), cap)
}

pub fn inflate_bzip2(excerpt: &[u8], cap: usize) -> io::Result<Vec<u8>> {
    read_capped(BzDecoder::new(excerpt), cap)
}

pub fn inflate_xz(excerpt: &[u8], cap: usize) -> io::Result<Vec<u8>> {
    read_capped(XzDecoder::new(excerpt), cap)
}

/// 读取解压输出直到 cap 字节或流结束；解码器报错（含截断流的
/// UnexpectedEof）原样上抛，由调用方决定兜底。
fn read_capped<R: Read>(mut reader: R, cap: usize) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 1024];
    while out.len() < cap {
        let want = chunk.len().min(cap - out.len());
        let n = reader.read(&mut chunk[..want])?;
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    Ok(out)
}

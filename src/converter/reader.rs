//! # 内存读取器
//!
//! 以 `std::io::Read` 形式把宿主传入的整块 PNG 字节喂给解码器，不做任何文件访问。
//!
//! 读取请求越过缓冲末尾时截断为剩余字节，而不是直接报错；真正的截断错误由解码器
//! 在读到 0 字节时自行判定。游标越界时按剩余 0 字节处理，不会产生下溢。

use std::io::{self, Read};

/// 面向单块内存缓冲的流式读取器。
#[derive(Debug)]
pub struct MemoryReader<'a> {
    buf: &'a [u8],
    cur: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cur: 0 }
    }

    /// 已消费的字节数（不超过缓冲长度）。
    #[cfg(test)]
    pub(crate) fn consumed(&self) -> usize {
        self.cur.min(self.buf.len())
    }

    /// 剩余可读字节数。
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.cur)
    }
}

impl Read for MemoryReader<'_> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let length = out.len().min(self.remaining());
        if length == 0 {
            return Ok(0);
        }

        out[..length].copy_from_slice(&self.buf[self.cur..self.cur + length]);
        self.cur += length;
        Ok(length)
    }
}

//! 续传日志的二进制编解码（纯函数，不碰文件）。

use crate::internal::range::structs::ByteRange;

/// 头部：分片数（u32 LE）
pub const HEADER_LEN: usize = 4;

/// 每条记录：from（u64 LE）+ to（u64 LE）
pub const RECORD_LEN: usize = 16;

/// 第 `slot` 条记录在文件中的偏移。
pub fn record_offset(slot: usize) -> u64 {
    (HEADER_LEN + slot * RECORD_LEN) as u64
}

/// `concurrency` 个分片时日志文件应有的总长度。
pub fn expected_len(concurrency: u32) -> u64 {
    HEADER_LEN as u64 + concurrency as u64 * RECORD_LEN as u64
}

pub fn encode_record(range: &ByteRange) -> [u8; RECORD_LEN] {
    let mut buf = [0u8; RECORD_LEN];
    buf[..8].copy_from_slice(&range.from().to_le_bytes());
    buf[8..].copy_from_slice(&range.to().to_le_bytes());
    buf
}

/// 完整日志：头部 + 全部记录。
pub fn encode_log(ranges: &[ByteRange]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + ranges.len() * RECORD_LEN);
    buf.extend_from_slice(&(ranges.len() as u32).to_le_bytes());
    for r in ranges {
        buf.extend_from_slice(&encode_record(r));
    }
    buf
}

/// 日志内容不合法的原因。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// 连头部都不完整
    MissingHeader,
    /// 长度与头部声明的分片数不符
    LengthMismatch { expected: u64, actual: u64 },
    /// 某条记录 from > to
    InvalidRecord { slot: usize },
}

/// 解析完整日志，返回 (分片数, 各分片剩余区间)。
pub fn decode_log(buf: &[u8]) -> Result<(u32, Vec<ByteRange>), LayoutError> {
    if buf.len() < HEADER_LEN {
        return Err(LayoutError::MissingHeader);
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&buf[..HEADER_LEN]);
    let concurrency = u32::from_le_bytes(header);

    let expected = expected_len(concurrency);
    if buf.len() as u64 != expected {
        return Err(LayoutError::LengthMismatch {
            expected,
            actual: buf.len() as u64,
        });
    }

    let ranges = buf[HEADER_LEN..]
        .chunks_exact(RECORD_LEN)
        .enumerate()
        .map(|(slot, record)| {
            let mut from = [0u8; 8];
            let mut to = [0u8; 8];
            from.copy_from_slice(&record[..8]);
            to.copy_from_slice(&record[8..]);
            ByteRange::new(u64::from_le_bytes(from), u64::from_le_bytes(to))
                .map_err(|_| LayoutError::InvalidRecord { slot })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((concurrency, ranges))
}

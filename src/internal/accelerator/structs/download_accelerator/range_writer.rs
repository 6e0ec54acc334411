//! 带边界检查的分片写入器：只在 `[from, to)` 内定位写，写后推进续传日志。

use std::fs::File;
use std::sync::Arc;

use crate::internal::accelerator::structs::DownloadError;
use crate::internal::range::structs::ByteRange;
use crate::internal::resume::structs::ResumeLog;
use crate::internal::storage::positioned_io;

/// 单次写入的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 整块写入
    Written(usize),
    /// 区间已写满：本块只写入了 `written` 字节，其余 `dropped` 字节被拒绝
    RangeEnd { written: usize, dropped: usize },
}

/// 分片写入器。
///
/// 多个写入器共享同一个 `Arc<File>`，各自只写自己的区间，用定位写而非共享游标，互不干扰。
/// 绑定续传日志后，每次写入成功都会把该分片的记录改为 `[pos, to)`，
/// 因此进程中途崩溃时日志恰好指向下一个未写入的字节。
#[derive(Debug)]
pub struct RangeWriter {
    file: Arc<File>,
    log: Option<(Arc<ResumeLog>, usize)>,
    range: ByteRange,
    pos: u64,
}

impl RangeWriter {
    /// 在 `range` 内写 `file`，不记录日志。
    pub fn new(file: Arc<File>, range: ByteRange) -> Self {
        Self {
            file,
            log: None,
            range,
            pos: range.from(),
        }
    }

    /// 绑定续传日志的第 `slot` 条记录。
    pub fn with_log(mut self, log: Arc<ResumeLog>, slot: usize) -> Self {
        self.log = Some((log, slot));
        self
    }

    /// 下一个要写的绝对偏移。
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// 本写入器已写入的字节数。
    pub fn written(&self) -> u64 {
        self.pos - self.range.from()
    }

    /// 尚未写入的区间 `[pos, to)`。
    pub fn remaining(&self) -> ByteRange {
        self.range.advance_to(self.pos)
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.range.to()
    }

    /// 把 `chunk` 写到当前位置；超出区间的部分不写，返回 `RangeEnd`。
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<WriteOutcome, DownloadError> {
        if chunk.is_empty() {
            return Ok(WriteOutcome::Written(0));
        }

        let left = self.range.to() - self.pos;
        if left == 0 {
            return Ok(WriteOutcome::RangeEnd {
                written: 0,
                dropped: chunk.len(),
            });
        }

        let take = left.min(chunk.len() as u64) as usize;
        positioned_io::write_all_at(&self.file, &chunk[..take], self.pos)
            .map_err(DownloadError::WriteFile)?;
        self.pos += take as u64;

        if let Some((log, slot)) = &self.log {
            log.update(*slot, self.remaining())?;
        }

        if take < chunk.len() {
            Ok(WriteOutcome::RangeEnd {
                written: take,
                dropped: chunk.len() - take,
            })
        } else {
            Ok(WriteOutcome::Written(take))
        }
    }
}

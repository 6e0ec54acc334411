//! 续传日志句柄：打开的日志文件 + 打开时读到的各分片剩余区间。

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::internal::accelerator::structs::DownloadError;
use crate::internal::range::structs::ByteRange;
use crate::internal::resume::functions::log_layout::{
    self, LayoutError, RECORD_LEN,
};
use crate::internal::storage::positioned_io;

/// 单个分片在日志中的记录：该分片尚未下载的剩余区间。
pub type ResumeLogEntry = ByteRange;

/// 续传日志。
///
/// 由协调器在一次下载期间独占；工作任务通过 `Arc<ResumeLog>` 共享，
/// 每个任务只调用 [`ResumeLog::update`] 改写自己分片的那 16 字节，互不重叠，因此无需加锁。
///
/// `entries` 是创建 / 恢复时的快照，之后的进度只写盘，不回写内存。
#[derive(Debug)]
pub struct ResumeLog {
    path: PathBuf,
    concurrency: u32,
    entries: Vec<ResumeLogEntry>,
    file: File,
}

impl ResumeLog {
    /// 新建日志（已存在则覆盖），一次写入完整布局，返回读写句柄。
    ///
    /// 分片数即 `ranges.len()`。
    pub fn create(
        dir: &Path,
        id: &str,
        ranges: Vec<ByteRange>,
    ) -> Result<Self, DownloadError> {
        let concurrency = u32::try_from(ranges.len()).map_err(|_| {
            DownloadError::InvalidConfig(format!("分片数过大: {}", ranges.len()))
        })?;
        let path = dir.join(id);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(DownloadError::CreateFile)?;
        file.write_all(&log_layout::encode_log(&ranges))
            .map_err(DownloadError::WriteLog)?;

        debug!(path = %path.display(), concurrency, "已创建续传日志");

        Ok(Self {
            path,
            concurrency,
            entries: ranges,
            file,
        })
    }

    /// 从磁盘恢复日志，文件保持读写打开以便后续定位写。
    ///
    /// 文件不存在或不可读返回 IO 错误；长度与头部不符返回 `CorruptLog`。
    pub fn recover(dir: &Path, id: &str) -> Result<Self, DownloadError> {
        let path = dir.join(id);
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(DownloadError::OpenFile)?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).map_err(DownloadError::ReadLog)?;

        let (concurrency, entries) = log_layout::decode_log(&buf).map_err(|e| {
            debug!(path = %path.display(), reason = ?e, "续传日志损坏");
            DownloadError::CorruptLog {
                path: path.clone(),
                len: buf.len() as u64,
                reason: describe(&e),
            }
        })?;

        debug!(path = %path.display(), concurrency, "已恢复续传日志");

        Ok(Self {
            path,
            concurrency,
            entries,
            file,
        })
    }

    /// `dir/id` 处是否已有日志文件。
    pub fn exists(dir: &Path, id: &str) -> bool {
        dir.join(id).is_file()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn concurrency(&self) -> u32 {
        self.concurrency
    }

    /// 创建 / 恢复时各分片的剩余区间。
    pub fn entries(&self) -> &[ResumeLogEntry] {
        &self.entries
    }

    /// 改写第 `slot` 条记录：在 `4 + slot * 16` 处定位写 16 字节，其余字节不动。
    ///
    /// 不同分片可并发调用；同一分片同一时刻只能有一个调用方。
    pub fn update(&self, slot: usize, range: ByteRange) -> Result<(), DownloadError> {
        if slot >= self.concurrency as usize {
            return Err(DownloadError::SlotOutOfBounds {
                slot,
                concurrency: self.concurrency,
            });
        }

        let record = log_layout::encode_record(&range);
        let written = positioned_io::write_at(
            &self.file,
            &record,
            log_layout::record_offset(slot),
        )
        .map_err(DownloadError::WriteLog)?;

        if written != RECORD_LEN {
            return Err(DownloadError::ShortWrite {
                expected: RECORD_LEN,
                written,
            });
        }
        Ok(())
    }

    /// 落盘并释放句柄；不删除文件，未完成的下载要靠它续传。
    pub fn close(self) -> Result<(), DownloadError> {
        self.file.sync_all().map_err(DownloadError::WriteLog)
    }

    /// 释放句柄并删除日志文件；仅在所有分片都已下载完后调用。
    pub fn remove(self) -> Result<(), DownloadError> {
        let Self { path, file, .. } = self;
        drop(file);
        fs::remove_file(&path).map_err(DownloadError::RemoveLog)?;
        debug!(path = %path.display(), "已删除续传日志");
        Ok(())
    }
}

/// 所有区间是否都已耗尽。
pub fn is_drained(entries: &[ResumeLogEntry]) -> bool {
    entries.iter().all(ByteRange::is_empty)
}

fn describe(e: &LayoutError) -> String {
    match e {
        LayoutError::MissingHeader => "头部不完整".to_string(),
        LayoutError::LengthMismatch { expected, actual } => {
            format!("长度应为 {} 字节，实际 {} 字节", expected, actual)
        }
        LayoutError::InvalidRecord { slot } => {
            format!("分片 {} 的记录 from > to", slot)
        }
    }
}

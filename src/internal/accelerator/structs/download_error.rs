//! 下载相关错误类型。

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::internal::range::structs::ByteRange;
use crate::internal::transport::structs::TransportError;

#[derive(Debug, Error)]
pub enum DownloadError {
    /// 探测失败：`status` 为非 2xx 状态码，`source` 为传输层错误，二者至少有一个
    #[error("探测失败: {}", describe_probe(.status, .source))]
    ProbeFailed {
        status: Option<u16>,
        #[source]
        source: Option<TransportError>,
    },

    #[error("非法字节区间: from={from}, to={to}")]
    InvalidRange { from: u64, to: u64 },

    #[error("配置错误: {0}")]
    InvalidConfig(String),

    #[error("续传日志损坏 {path:?}（{len} 字节）: {reason}")]
    CorruptLog {
        path: PathBuf,
        len: u64,
        reason: String,
    },

    #[error("分片号 {slot} 越界，共 {concurrency} 个分片")]
    SlotOutOfBounds { slot: usize, concurrency: u32 },

    #[error("创建文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("打开文件失败: {0}")]
    OpenFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("预分配文件空间失败: {0}")]
    PreallocateFile(std::io::Error),

    #[error("读取续传日志失败: {0}")]
    ReadLog(std::io::Error),

    #[error("写入续传日志失败: {0}")]
    WriteLog(std::io::Error),

    #[error("删除续传日志失败: {0}")]
    RemoveLog(std::io::Error),

    #[error("写入不完整：应写 {expected} 字节，实际 {written} 字节")]
    ShortWrite { expected: usize, written: usize },

    #[error("响应体提前结束：应收 {expected} 字节，实际 {received} 字节")]
    ShortBody { expected: u64, received: u64 },

    #[error("传输失败: {0}")]
    Transport(#[from] TransportError),

    #[error("分片 {slot} 收到意外的 HTTP 状态码 {status}")]
    UnexpectedStatus { slot: usize, status: u16 },

    #[error("下载未完成：{completed}/{total} 个分片成功，失败详情: {}", join_failures(.failures))]
    DownloadIncomplete {
        completed: usize,
        total: usize,
        failures: Vec<SlotFailure>,
    },

    #[error("分片任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// 某个分片失败的原因，汇总在 `DownloadIncomplete` 中。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFailure {
    pub slot: usize,
    /// 失败时该分片仍未下载的区间（即续传日志中的记录）
    pub remaining: ByteRange,
    pub message: String,
}

impl fmt::Display for SlotFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "分片 {} 剩余 {}: {}", self.slot, self.remaining, self.message)
    }
}

fn describe_probe(status: &Option<u16>, source: &Option<TransportError>) -> String {
    match (status, source) {
        (_, Some(e)) => e.to_string(),
        (Some(code), None) => format!("HTTP 状态码 {}", code),
        (None, None) => "未知原因".to_string(),
    }
}

fn join_failures(failures: &[SlotFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! 新建还是续传：根据续传日志与目标文件是否存在做决定，并准备好文件与日志句柄。
//!
//! | 日志 | 目标文件 | 操作 |
//! |------|----------|------|
//! | 有   | 有       | 尝试续传；分片数不符、日志损坏或与本次分片不吻合则重新开始 |
//! | 有   | 无       | 重新开始（没有数据的日志没有意义） |
//! | 无   | 有       | 重新开始（无可恢复的进度） |
//! | 无   | 无       | 重新开始 |

use std::fs::File;
use std::path::Path;

use tokio::fs;
use tracing::{debug, info, warn};

use crate::internal::accelerator::structs::{AcceleratorConfig, DownloadError};
use crate::internal::range::functions::partition::partition;
use crate::internal::range::structs::ByteRange;
use crate::internal::resume::structs::ResumeLog;

/// 准备好的一次分片下载。
pub(super) struct RunPlan {
    pub file: File,
    pub log: ResumeLog,
    pub resumed: bool,
}

pub(super) async fn plan_run(
    config: &AcceleratorConfig,
    log_id: &str,
    content_length: u64,
) -> Result<RunPlan, DownloadError> {
    let destination = config.destination();
    let log_exists = ResumeLog::exists(&config.resume_dir, log_id);
    let file_exists = fs::try_exists(&destination)
        .await
        .map_err(DownloadError::OpenFile)?;

    if log_exists && file_exists {
        if let Some(log) = recover_usable(config, log_id, content_length)? {
            let file = open_existing_destination(&destination).await?;
            info!(
                path = %destination.display(),
                concurrency = log.concurrency(),
                "沿用续传日志继续下载"
            );
            return Ok(RunPlan {
                file,
                log,
                resumed: true,
            });
        }
    } else if log_exists {
        debug!(path = %destination.display(), "目标文件不存在，忽略旧的续传日志");
    }

    start_fresh(config, log_id, content_length).await
}

/// 恢复日志；不可用（分片数不符、损坏、与当前分片不吻合）时删除它并返回 `None`。
fn recover_usable(
    config: &AcceleratorConfig,
    log_id: &str,
    content_length: u64,
) -> Result<Option<ResumeLog>, DownloadError> {
    let log = match ResumeLog::recover(&config.resume_dir, log_id) {
        Ok(log) => log,
        Err(DownloadError::CorruptLog { path, reason, .. }) => {
            warn!(path = %path.display(), %reason, "续传日志损坏，重新开始");
            discard_log_file(&path)?;
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if log.concurrency() as usize != config.concurrency {
        warn!(
            recovered = log.concurrency(),
            requested = config.concurrency,
            "续传日志的分片数与本次不同，重新开始"
        );
        log.remove()?;
        return Ok(None);
    }

    if !fits_partition(log.entries(), content_length) {
        warn!(content_length, "续传日志与当前资源长度不吻合，重新开始");
        log.remove()?;
        return Ok(None);
    }

    Ok(Some(log))
}

/// 每条记录都必须是同一分片在本次分片方案中的后缀：`to` 相同，`from` 不早于原起点。
///
/// 满足这一点才能保证续传时各分片依然互不重叠。
fn fits_partition(entries: &[ByteRange], content_length: u64) -> bool {
    let expected = partition(content_length, entries.len());
    entries
        .iter()
        .zip(expected.iter())
        .all(|(entry, assigned)| entry.to() == assigned.to() && entry.from() >= assigned.from())
}

async fn start_fresh(
    config: &AcceleratorConfig,
    log_id: &str,
    content_length: u64,
) -> Result<RunPlan, DownloadError> {
    let destination = config.destination();
    fs::create_dir_all(&config.resume_dir)
        .await
        .map_err(DownloadError::CreateFile)?;

    let ranges = partition(content_length, config.concurrency);
    let file = open_fresh_destination(&destination, Some(content_length)).await?;
    let log = ResumeLog::create(&config.resume_dir, log_id, ranges)?;

    info!(
        path = %destination.display(),
        content_length,
        concurrency = config.concurrency,
        "新建分片下载"
    );

    Ok(RunPlan {
        file,
        log,
        resumed: false,
    })
}

/// 创建或截断目标文件（必要时连同目录）；给定长度时预分配空间。
pub(super) async fn open_fresh_destination(
    path: &Path,
    preallocate: Option<u64>,
) -> Result<File, DownloadError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .await
            .map_err(DownloadError::CreateFile)?;
    }
    let f = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(DownloadError::CreateFile)?;
    if let Some(len) = preallocate {
        f.set_len(len).await.map_err(DownloadError::PreallocateFile)?;
    }
    Ok(f.into_std().await)
}

/// 续传：读写打开，不截断，其它分片已写入的字节必须保留。
async fn open_existing_destination(path: &Path) -> Result<File, DownloadError> {
    let f = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .await
        .map_err(DownloadError::OpenFile)?;
    Ok(f.into_std().await)
}

pub(super) fn discard_log_file(path: &Path) -> Result<(), DownloadError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DownloadError::RemoveLog(e)),
    }
}

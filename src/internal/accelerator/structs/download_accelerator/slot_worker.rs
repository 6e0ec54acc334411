//! 分片工作任务：对一个分片发起一次 Range 请求，流式写入目标文件并推进续传日志。
//!
//! 每个分片只请求一次，不重试；失败由协调器汇总，日志留在磁盘上供下次续传。

use std::fs::File;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::StreamExt;
use tracing::{debug, warn};
use url::Url;

use crate::internal::accelerator::structs::{DownloadError, SlotFailure};
use crate::internal::range::structs::ByteRange;
use crate::internal::resume::structs::ResumeLog;
use crate::internal::transport::structs::BodyStream;
use crate::internal::transport::traits::RangeTransport;

use super::range_writer::{RangeWriter, WriteOutcome};

/// 分片任务的参数（形参超过 3 个，用 struct 承载）。
pub(super) struct SlotWorkerParams {
    pub transport: Arc<dyn RangeTransport>,
    pub url: Url,
    pub slot: usize,
    /// 本分片尚未下载的区间（续传时可能已被消耗了一部分）
    pub range: ByteRange,
    pub file: Arc<File>,
    pub log: Arc<ResumeLog>,
    /// 整个资源的长度，用于判断 200 响应是否可接受
    pub resource_len: u64,
}

/// 执行一个分片；成功返回写入的字节数（恰为 `range.len()`）。
pub(super) async fn run_slot(params: SlotWorkerParams) -> Result<u64, SlotFailure> {
    let slot = params.slot;
    let range = params.range;

    if range.is_empty() {
        debug!(slot, "分片已完成，跳过");
        return Ok(0);
    }

    debug!(slot, %range, "开始下载分片");
    let mut remaining = range;
    match fetch_slot(params, &mut remaining).await {
        Ok(written) => {
            debug!(slot, written, "分片下载完成");
            Ok(written)
        }
        Err(e) => {
            warn!(slot, %remaining, error = %e, "分片下载失败");
            Err(SlotFailure {
                slot,
                remaining,
                message: e.to_string(),
            })
        }
    }
}

async fn fetch_slot(
    params: SlotWorkerParams,
    remaining: &mut ByteRange,
) -> Result<u64, DownloadError> {
    let SlotWorkerParams {
        transport,
        url,
        slot,
        range,
        file,
        log,
        resource_len,
    } = params;

    let mut resp = transport.fetch(&url, Some(range)).await?;
    if !status_acceptable(resp.status, range, resource_len) {
        return Err(DownloadError::UnexpectedStatus {
            slot,
            status: resp.status,
        });
    }

    let writer = RangeWriter::new(file, range).with_log(log, slot);
    let writer = pump_body(&mut resp.body, writer, slot, remaining).await?;

    let written = writer.written();
    if written != range.len() {
        return Err(DownloadError::ShortBody {
            expected: range.len(),
            received: written,
        });
    }
    Ok(written)
}

/// 206 总是可以；200 只有在本分片恰好覆盖整个资源时才可以（服务器忽略了 Range）。
fn status_acceptable(status: u16, range: ByteRange, resource_len: u64) -> bool {
    match status {
        206 => true,
        200 => range.from() == 0 && range.to() == resource_len,
        _ => false,
    }
}

/// 把响应体写进写入器，直到流结束或区间写满；`remaining` 随每次写入更新。
///
/// 文件写与日志写都是阻塞 IO，放到 blocking 线程池执行。
pub(super) async fn pump_body(
    body: &mut BodyStream,
    mut writer: RangeWriter,
    slot: usize,
    remaining: &mut ByteRange,
) -> Result<RangeWriter, DownloadError> {
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        let (w, outcome) = write_blocking(writer, chunk).await?;
        writer = w;
        *remaining = writer.remaining();

        match outcome {
            WriteOutcome::RangeEnd { dropped, .. } => {
                warn!(slot, dropped, "响应体超出分片区间，多余字节已丢弃");
                break;
            }
            WriteOutcome::Written(_) if writer.is_exhausted() => break,
            WriteOutcome::Written(_) => {}
        }
    }
    Ok(writer)
}

async fn write_blocking(
    mut writer: RangeWriter,
    chunk: Bytes,
) -> Result<(RangeWriter, WriteOutcome), DownloadError> {
    tokio::task::spawn_blocking(move || {
        let outcome = writer.write_chunk(&chunk)?;
        Ok((writer, outcome))
    })
    .await?
}

//! 单流整文件下载：服务器不支持字节区间或长度未知时使用，不分片、不写续传日志。

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::internal::accelerator::structs::DownloadError;
use crate::internal::range::structs::ByteRange;
use crate::internal::transport::traits::RangeTransport;

use super::range_writer::RangeWriter;
use super::run_plan::open_fresh_destination;
use super::slot_worker::pump_body;

/// 整文件 GET 并顺序写入目标文件，返回写入的字节数。
///
/// 已知长度时写入器以该长度为上界，写满即停；字节数不等于长度视为失败。
pub(super) async fn run_single_stream(
    transport: &dyn RangeTransport,
    url: &Url,
    destination: &Path,
    content_length: Option<u64>,
) -> Result<u64, DownloadError> {
    info!(path = %destination.display(), ?content_length, "服务器不支持分片，整文件下载");

    let file = open_fresh_destination(destination, None).await?;
    let mut resp = transport.fetch(url, None).await?;
    if !(200..300).contains(&resp.status) {
        return Err(DownloadError::UnexpectedStatus {
            slot: 0,
            status: resp.status,
        });
    }

    let whole = ByteRange::new(0, content_length.unwrap_or(u64::MAX))?;
    let mut remaining = whole;
    let writer = RangeWriter::new(Arc::new(file), whole);
    let writer = pump_body(&mut resp.body, writer, 0, &mut remaining).await?;

    let written = writer.written();
    if let Some(expected) = content_length {
        if written != expected {
            return Err(DownloadError::ShortBody {
                expected,
                received: written,
            });
        }
    }
    Ok(written)
}

//! 下载协调器
//!
//! 负责一次下载的完整流程：
//!
//! - **探测**：取得资源长度与 `Accept-Ranges`（调用方也可预先提供，跳过探测）
//! - **新建 / 续传**：依据续传日志和目标文件是否存在做决定，见 `run_plan` 子模块
//! - **并发拉取**：每个非空分片一个 tokio 任务，各自只写自己的区间并推进日志中自己的那条记录
//! - **收尾**：等待全部任务（某个分片失败不会提前结束等待）；全部成功才删除日志，
//!   否则保留日志和已写入的数据，调用方用同样的参数再次 `download()` 即可续传
//!
//! 服务器不支持字节区间或长度未知时，退化为单流整文件下载，不分片也不写日志。
//!
//! 没有超时与重试：卡住的请求会一直占着它的任务，需要调用方在外层自行加超时。
//! 外层取消 `download()` 时，所有分片任务随之中止。

mod range_writer;
mod run_plan;
mod single_stream;
mod slot_worker;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::internal::range::structs::ByteRange;
use crate::internal::resume::functions::derive_log_id::derive_log_id;
use crate::internal::resume::structs::{is_drained, ResumeLog};
use crate::internal::transport::structs::{HttpTransport, ProbeInfo};
use crate::internal::transport::traits::RangeTransport;

use super::accelerator_config::AcceleratorConfig;
use super::download_error::{DownloadError, SlotFailure};
use super::download_report::{DownloadMode, DownloadReport};
use super::run_state::RunState;
use run_plan::{discard_log_file, plan_run};
use single_stream::run_single_stream;
use slot_worker::{run_slot, SlotWorkerParams};

pub use range_writer::{RangeWriter, WriteOutcome};

/// 下载协调器。
///
/// 传输能力以 `Arc<dyn RangeTransport>` 注入，不依赖全局客户端。
pub struct DownloadAccelerator {
    config: AcceleratorConfig,
    transport: Arc<dyn RangeTransport>,
    log_id: String,
    probe: Option<ProbeInfo>,
    state: RunState,
}

impl DownloadAccelerator {
    pub fn new(config: AcceleratorConfig, transport: Arc<dyn RangeTransport>) -> Self {
        let log_id = derive_log_id(&config.directory, &config.filename);
        Self {
            config,
            transport,
            log_id,
            probe: None,
            state: RunState::Idle,
        }
    }

    /// 使用基于 reqwest 的默认传输实现。
    pub fn with_http(config: AcceleratorConfig) -> Result<Self, DownloadError> {
        let transport = HttpTransport::new(&config.user_agent)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn config(&self) -> &AcceleratorConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 最近一次探测的结果。
    pub fn probe(&self) -> Option<&ProbeInfo> {
        self.probe.as_ref()
    }

    pub fn destination(&self) -> PathBuf {
        self.config.destination()
    }

    /// 本次目标对应的续传日志路径（不论文件是否存在）。
    pub fn resume_log_path(&self) -> PathBuf {
        self.config.resume_dir.join(&self.log_id)
    }

    /// 探测资源长度与分片支持；配置中预先提供了长度时不发请求。
    pub async fn prepare(&mut self) -> Result<ProbeInfo, DownloadError> {
        self.config.validate()?;
        self.state = RunState::Probing;

        let probe = match self.config.known_length {
            Some(known) => ProbeInfo {
                status: 200,
                content_length: Some(known.content_length),
                accept_ranges: known.supports_ranges,
            },
            None => match self.transport.probe(&self.config.url).await {
                Ok(p) => p,
                Err(e) => {
                    self.state = RunState::Failed;
                    return Err(DownloadError::ProbeFailed {
                        status: None,
                        source: Some(e),
                    });
                }
            },
        };

        if !probe.is_success() {
            self.state = RunState::Failed;
            return Err(DownloadError::ProbeFailed {
                status: Some(probe.status),
                source: None,
            });
        }

        debug!(
            url = %self.config.url,
            content_length = ?probe.content_length,
            accept_ranges = probe.accept_ranges,
            "探测完成"
        );
        self.probe = Some(probe);
        Ok(probe)
    }

    /// 执行下载。
    ///
    /// 只有全部分片都完成并删除了续传日志才返回 `Ok`；
    /// 任何失败都会保留已写入的数据与续传日志，再次调用即可续传。
    pub async fn download(&mut self) -> Result<DownloadReport, DownloadError> {
        let probe = match self.probe {
            Some(p) => p,
            None => self.prepare().await?,
        };

        let result = match probe.content_length {
            Some(len) if probe.supports_ranged_download() => self.ranged_download(len).await,
            _ => self.single_stream_download(probe.content_length).await,
        };

        self.state = match result {
            Ok(_) => RunState::Completed,
            Err(_) => RunState::Failed,
        };
        result
    }

    async fn single_stream_download(
        &mut self,
        content_length: Option<u64>,
    ) -> Result<DownloadReport, DownloadError> {
        self.state = RunState::SingleStream;

        // 目标文件会被截断，旧的续传日志随之失效
        discard_log_file(&self.resume_log_path())?;

        let destination = self.destination();
        let bytes_written = run_single_stream(
            self.transport.as_ref(),
            &self.config.url,
            &destination,
            content_length,
        )
        .await?;

        info!(path = %destination.display(), bytes_written, "下载完成");
        Ok(DownloadReport {
            destination,
            mode: DownloadMode::SingleStream,
            bytes_written,
        })
    }

    async fn ranged_download(&mut self, content_length: u64) -> Result<DownloadReport, DownloadError> {
        let plan = plan_run(&self.config, &self.log_id, content_length).await?;
        let resumed = plan.resumed;
        self.state = if resumed {
            RunState::Resuming
        } else {
            RunState::Fresh
        };

        let concurrency = plan.log.concurrency();
        let entries: Vec<ByteRange> = plan.log.entries().to_vec();
        let file = Arc::new(plan.file);
        let log = Arc::new(plan.log);

        self.state = RunState::Fetching;

        // 协调器的 future 被丢弃时（如外层超时）JoinSet 随之中止全部分片任务；
        // 已交给 blocking 线程池的那一次写仍会做完。
        let mut tasks = JoinSet::new();
        let mut pending: BTreeMap<usize, ByteRange> = BTreeMap::new();
        for (slot, range) in entries.iter().copied().enumerate() {
            // 空分片不必起任务
            if range.is_empty() {
                continue;
            }
            let params = SlotWorkerParams {
                transport: Arc::clone(&self.transport),
                url: self.config.url.clone(),
                slot,
                range,
                file: Arc::clone(&file),
                log: Arc::clone(&log),
                resource_len: content_length,
            };
            pending.insert(slot, range);
            tasks.spawn(async move { (slot, run_slot(params).await) });
        }
        let total = entries.len();

        // 每个分片结束时的剩余区间，全部为空才算下载完成
        let mut outstanding = entries.clone();
        let mut bytes_written = 0u64;
        let mut failures: Vec<SlotFailure> = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((slot, Ok(n))) => {
                    pending.remove(&slot);
                    outstanding[slot] = ByteRange::empty_at(outstanding[slot].to());
                    bytes_written += n;
                }
                Ok((slot, Err(failure))) => {
                    pending.remove(&slot);
                    outstanding[slot] = failure.remaining;
                    failures.push(failure);
                }
                Err(join_err) => warn!(error = %join_err, "分片任务异常退出"),
            }
        }
        // 仍在 pending 里的分片没有返回结果（任务 panic）
        for (slot, range) in pending {
            failures.push(SlotFailure {
                slot,
                remaining: range,
                message: "分片任务异常退出".to_string(),
            });
        }
        failures.sort_by_key(|f| f.slot);

        let drained = failures.is_empty() && is_drained(&outstanding);
        let completed = total - failures.len();

        if drained {
            // 先让数据落盘，再删除日志
            let file = Arc::clone(&file);
            tokio::task::spawn_blocking(move || file.sync_all())
                .await?
                .map_err(DownloadError::WriteFile)?;
        }
        drop(file);

        if !drained {
            warn!(completed, total, "下载未完成，保留续传日志");
            release_log(log, false)?;
            return Err(DownloadError::DownloadIncomplete {
                completed,
                total,
                failures,
            });
        }

        release_log(log, true)?;

        let destination = self.destination();
        info!(path = %destination.display(), bytes_written, resumed, "下载完成");
        Ok(DownloadReport {
            destination,
            mode: DownloadMode::Ranged {
                concurrency,
                resumed,
            },
            bytes_written,
        })
    }
}

/// 所有任务都结束后释放日志：`remove` 为真时删除，否则只关闭。
///
/// 正常情况下此时只剩这一份 `Arc`；若仍被占用，只能按路径删除。
fn release_log(log: Arc<ResumeLog>, remove: bool) -> Result<(), DownloadError> {
    match Arc::try_unwrap(log) {
        Ok(log) if remove => log.remove(),
        Ok(log) => log.close(),
        Err(shared) => {
            let path = shared.path().to_path_buf();
            drop(shared);
            if remove {
                discard_log_file(&path)?;
            }
            Ok(())
        }
    }
}

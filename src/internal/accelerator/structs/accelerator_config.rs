use std::path::{Path, PathBuf};

use url::Url;

use crate::internal::transport::structs::DEFAULT_USER_AGENT;

use super::download_error::DownloadError;

/// 默认并发分片数
pub const DEFAULT_CONCURRENCY: usize = 4;

/// 调用方预先知道的资源信息；设置后 `prepare()` 不再发探测请求。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownLength {
    pub content_length: u64,
    pub supports_ranges: bool,
}

/// 下载配置。
#[derive(Debug, Clone)]
pub struct AcceleratorConfig {
    pub url: Url,
    /// 目标文件所在目录
    pub directory: PathBuf,
    /// 目标文件名
    pub filename: String,
    /// 并发分片数（工作任务数）
    pub concurrency: usize,
    /// 续传日志所在目录，默认为系统临时目录
    pub resume_dir: PathBuf,
    pub user_agent: String,
    pub known_length: Option<KnownLength>,
}

impl AcceleratorConfig {
    pub fn new(url: Url, directory: impl AsRef<Path>, filename: impl Into<String>) -> Self {
        Self {
            url,
            directory: directory.as_ref().to_path_buf(),
            filename: filename.into(),
            concurrency: DEFAULT_CONCURRENCY,
            resume_dir: std::env::temp_dir(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            known_length: None,
        }
    }

    /// 设置并发分片数。
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// 设置续传日志目录。
    pub fn resume_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.resume_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// 预先提供长度与分片支持情况，跳过探测。
    pub fn known_length(mut self, content_length: u64, supports_ranges: bool) -> Self {
        self.known_length = Some(KnownLength {
            content_length,
            supports_ranges,
        });
        self
    }

    /// 目标文件完整路径。
    pub fn destination(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }

    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.concurrency == 0 {
            return Err(DownloadError::InvalidConfig("并发分片数至少为 1".into()));
        }
        if u32::try_from(self.concurrency).is_err() {
            return Err(DownloadError::InvalidConfig(format!(
                "并发分片数过大: {}",
                self.concurrency
            )));
        }
        if self.filename.is_empty() {
            return Err(DownloadError::InvalidConfig("目标文件名为空".into()));
        }
        Ok(())
    }
}

//! 下载加速器领域模块：探测远程资源、决定新建或续传、按分片并发拉取并维护续传日志。
//!
//! 使用方式：
//!
//! ```rust,no_run
//! # use ranged_dl::{AcceleratorConfig, DownloadAccelerator};
//! # async fn example() -> Result<(), ranged_dl::DownloadError> {
//! let url = url::Url::parse("https://example.com/big.iso").unwrap();
//! let config = AcceleratorConfig::new(url, "./downloads", "big.iso").concurrency(8);
//! let mut accelerator = DownloadAccelerator::with_http(config)?;
//! // 失败后用同样的参数再次调用即可续传
//! let report = accelerator.download().await?;
//! # Ok(())
//! # }
//! ```

pub mod structs;

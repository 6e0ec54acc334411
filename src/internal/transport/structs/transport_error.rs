//! 传输层错误类型。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("构建 HTTP 客户端失败: {0}")]
    Build(String),

    /// 非 reqwest 的实现（例如测试替身）使用
    #[error("传输中断: {0}")]
    Aborted(String),
}

use async_trait::async_trait;
use url::Url;

use crate::internal::range::structs::ByteRange;
use crate::internal::transport::structs::{ProbeInfo, RangeResponse, TransportError};

/// 协调器依赖的 HTTP 能力。
///
/// 实现方只负责收发，不解释状态码：是否成功、是否支持分片由协调器判断。
#[async_trait]
pub trait RangeTransport: Send + Sync {
    /// 探测目标资源：状态码、`Content-Length`、`Accept-Ranges`。
    async fn probe(&self, url: &Url) -> Result<ProbeInfo, TransportError>;

    /// 发起 GET；`range` 为 `Some` 时带 `Range: bytes=from-(to-1)` 头。
    ///
    /// 传入空区间属于调用方错误，实现可以直接当作不带 `Range` 处理。
    async fn fetch(
        &self,
        url: &Url,
        range: Option<ByteRange>,
    ) -> Result<RangeResponse, TransportError>;
}

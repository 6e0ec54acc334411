use core::fmt;

use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    Client,
};

use super::transport_error::TransportError;

/// 默认 User-Agent：部分服务器对非浏览器 UA 拒绝 Range 请求
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// 基于 reqwest 的传输实现。
///
/// 内部 `Client` 是 Arc，克隆开销很小，所有分片任务共用同一个连接池。
#[derive(Clone)]
pub struct HttpTransport {
    pub(crate) client: Client,
}

impl HttpTransport {
    /// 使用给定 User-Agent 构建客户端。
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let ua = HeaderValue::from_str(user_agent)
            .map_err(|e| TransportError::Build(e.to_string()))?;
        headers.insert(USER_AGENT, ua);

        // 不启用压缩：响应体字节必须与文件偏移一一对应
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

/// 探测结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeInfo {
    /// HTTP 状态码
    pub status: u16,
    /// `Content-Length`，缺失或无法解析时为 `None`
    pub content_length: Option<u64>,
    /// `Accept-Ranges: bytes`
    pub accept_ranges: bool,
}

impl ProbeInfo {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 能否分片下载：服务器声明支持字节区间，且长度已知。
    pub fn supports_ranged_download(&self) -> bool {
        self.accept_ranges && self.content_length.is_some()
    }
}

use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use super::transport_error::TransportError;

/// 响应体字节流。
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// 一次 GET 的结果：状态码 + 尚未读取的响应体。
pub struct RangeResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl fmt::Debug for RangeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeResponse")
            .field("status", &self.status)
            .field("body", &"<stream>")
            .finish()
    }
}

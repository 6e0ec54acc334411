//! `HttpTransport` 对 `RangeTransport` 的实现。

use async_trait::async_trait;
use futures_util::TryStreamExt;
use reqwest::header::{HeaderMap, ACCEPT_RANGES, CONTENT_LENGTH, RANGE};
use url::Url;

use crate::internal::range::structs::ByteRange;
use crate::internal::transport::structs::{
    HttpTransport, ProbeInfo, RangeResponse, TransportError,
};
use crate::internal::transport::traits::RangeTransport;

#[async_trait]
impl RangeTransport for HttpTransport {
    async fn probe(&self, url: &Url) -> Result<ProbeInfo, TransportError> {
        let resp = self.client.get(url.clone()).send().await?;
        let headers = resp.headers();

        // 只读响应头，响应体随 resp 一起丢弃
        Ok(ProbeInfo {
            status: resp.status().as_u16(),
            content_length: content_length(headers),
            accept_ranges: accepts_byte_ranges(headers),
        })
    }

    async fn fetch(
        &self,
        url: &Url,
        range: Option<ByteRange>,
    ) -> Result<RangeResponse, TransportError> {
        let mut req = self.client.get(url.clone());
        if let Some(value) = range.and_then(|r| r.header_value()) {
            req = req.header(RANGE, value);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes_stream().map_err(TransportError::from);

        Ok(RangeResponse {
            status,
            body: Box::pin(body),
        })
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

fn accepts_byte_ranges(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT_RANGES)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
}

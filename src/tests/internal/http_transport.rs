//! `HttpTransport` 对接本地 mock 服务器的测试。

use futures_util::StreamExt;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::accelerator::{AcceleratorConfig, DownloadAccelerator, DownloadMode};
use crate::range::ByteRange;
use crate::transport::{HttpTransport, RangeTransport, DEFAULT_USER_AGENT};
use crate::tests::{random_payload, read_file, Scratch};

/// 按 `Range: bytes=a-b` 返回 206 切片，没有 Range 时返回 200 整个负载。
struct RangeResponder {
    payload: Vec<u8>,
    accept_ranges: bool,
}

impl Respond for RangeResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let range = request
            .headers
            .get("range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_range);

        match range {
            Some((first, last)) if self.accept_ranges => {
                let end = (last + 1).min(self.payload.len());
                ResponseTemplate::new(206)
                    .insert_header(
                        "content-range",
                        format!("bytes {}-{}/{}", first, end - 1, self.payload.len()),
                    )
                    .set_body_bytes(self.payload[first..end].to_vec())
            }
            _ => {
                let resp = ResponseTemplate::new(200).set_body_bytes(self.payload.clone());
                if self.accept_ranges {
                    resp.insert_header("accept-ranges", "bytes")
                } else {
                    resp
                }
            }
        }
    }
}

fn parse_range(value: &str) -> Option<(usize, usize)> {
    let (first, last) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((first.parse().ok()?, last.parse().ok()?))
}

fn url_of(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn probe_reads_length_and_accept_ranges() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.bin"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("accept-ranges", "bytes")
                .set_body_bytes(vec![1u8; 1234]),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(DEFAULT_USER_AGENT).unwrap();
    let probe = transport.probe(&url_of(&server, "/data.bin")).await.unwrap();

    assert_eq!(probe.status, 200);
    assert_eq!(probe.content_length, Some(1234));
    assert!(probe.accept_ranges);
    assert!(probe.supports_ranged_download());
}

#[tokio::test]
async fn probe_without_accept_ranges() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 10]))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(DEFAULT_USER_AGENT).unwrap();
    let probe = transport.probe(&url_of(&server, "/plain")).await.unwrap();
    assert!(!probe.accept_ranges);
    assert!(!probe.supports_ranged_download());
}

#[tokio::test]
async fn probe_reports_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(DEFAULT_USER_AGENT).unwrap();
    let probe = transport.probe(&url_of(&server, "/gone")).await.unwrap();
    assert_eq!(probe.status, 404);
    assert!(!probe.is_success());
}

#[tokio::test]
async fn fetch_sends_inclusive_range_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slice"))
        .and(header("range", "bytes=2-5"))
        .and(|req: &Request| {
            req.headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                == Some(DEFAULT_USER_AGENT)
        })
        .respond_with(ResponseTemplate::new(206).set_body_bytes(b"cdef".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(DEFAULT_USER_AGENT).unwrap();
    let range = ByteRange::new(2, 6).unwrap();
    let mut resp = transport
        .fetch(&url_of(&server, "/slice"), Some(range))
        .await
        .unwrap();

    assert_eq!(resp.status, 206);
    let mut body = Vec::new();
    while let Some(chunk) = resp.body.next().await {
        body.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(body, b"cdef");
}

#[tokio::test]
async fn fetch_without_range_omits_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/whole"))
        .and(|req: &Request| !req.headers.contains_key("range"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"all".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(DEFAULT_USER_AGENT).unwrap();
    let resp = transport.fetch(&url_of(&server, "/whole"), None).await.unwrap();
    assert_eq!(resp.status, 200);
}

#[test]
fn invalid_user_agent_is_a_build_error() {
    assert!(HttpTransport::new("bad\nagent").is_err());
}

#[tokio::test]
async fn ranged_download_over_http() {
    let server = MockServer::start().await;
    let payload = random_payload(10_000);
    Mock::given(method("GET"))
        .and(path("/big.bin"))
        .respond_with(RangeResponder {
            payload: payload.clone(),
            accept_ranges: true,
        })
        .mount(&server)
        .await;

    let scratch = Scratch::new();
    let config = AcceleratorConfig::new(url_of(&server, "/big.bin"), scratch.download_dir(), "big.bin")
        .concurrency(6)
        .resume_dir(scratch.resume_dir());
    let mut acc = DownloadAccelerator::with_http(config).unwrap();

    let report = acc.download().await.unwrap();
    assert_eq!(report.mode, DownloadMode::Ranged { concurrency: 6, resumed: false });
    assert_eq!(read_file(&report.destination), payload);
    assert!(!acc.resume_log_path().exists());

    // 一次探测 + 六个分片
    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 7);
}

#[tokio::test]
async fn single_stream_download_over_http() {
    let server = MockServer::start().await;
    let payload = random_payload(4096);
    Mock::given(method("GET"))
        .and(path("/plain.bin"))
        .respond_with(RangeResponder {
            payload: payload.clone(),
            accept_ranges: false,
        })
        .mount(&server)
        .await;

    let scratch = Scratch::new();
    let config = AcceleratorConfig::new(url_of(&server, "/plain.bin"), scratch.download_dir(), "plain.bin")
        .concurrency(4)
        .resume_dir(scratch.resume_dir());
    let mut acc = DownloadAccelerator::with_http(config).unwrap();

    let report = acc.download().await.unwrap();
    assert_eq!(report.mode, DownloadMode::SingleStream);
    assert_eq!(read_file(&report.destination), payload);
}

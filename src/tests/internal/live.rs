//! 联网测试：在 `src/tests/env/live.env` 中填写 `RANGED_DL_URL` 后启用。

use crate::accelerator::{AcceleratorConfig, DownloadAccelerator};
use crate::tests::{init_tracing, load_live_url_optional, Scratch};

#[tokio::test]
async fn live_download_when_configured() {
    let Some(url) = load_live_url_optional() else {
        eprintln!("未配置 RANGED_DL_URL，跳过联网测试");
        return;
    };
    init_tracing();

    let scratch = Scratch::new();
    let config = AcceleratorConfig::new(url, scratch.download_dir(), "live.bin")
        .concurrency(4)
        .resume_dir(scratch.resume_dir());
    let mut acc = DownloadAccelerator::with_http(config).unwrap();

    let report = acc.download().await.expect("联网下载失败");
    let len = std::fs::metadata(&report.destination).unwrap().len();
    assert_eq!(len, report.bytes_written);
    if let Some(expected) = acc.probe().and_then(|p| p.content_length) {
        assert_eq!(len, expected);
    }
    assert!(!acc.resume_log_path().exists());
}

use std::path::PathBuf;

/// 实际采用的下载方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// 分片并发；`resumed` 表示本次沿用了磁盘上的续传日志
    Ranged { concurrency: u32, resumed: bool },
    /// 服务器不支持字节区间（或长度未知），整文件单流下载
    SingleStream,
}

/// 下载成功后的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// 目标文件路径
    pub destination: PathBuf,
    pub mode: DownloadMode,
    /// 本次运行实际写入的字节数（续传时不含之前已完成的部分）
    pub bytes_written: u64,
}

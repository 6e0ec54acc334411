use std::path::Path;

use sha2::{Digest, Sha256};

/// 由目标路径推导续传日志的文件名：`SHA-256(directory/filename)` 的前 8 字节，小写十六进制。
///
/// 同一目标路径多次调用得到同一个 id，因此重复执行能找到上一次留下的日志。
pub fn derive_log_id(directory: &Path, filename: &str) -> String {
    let target = directory.join(filename);
    let mut hasher = Sha256::new();
    hasher.update(target.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

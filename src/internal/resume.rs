//! 断点续传日志领域模块。
//!
//! 文件布局（小端）：
//!
//! ```text
//! [u32 concurrency][u64 from][u64 to][u64 from][u64 to]...
//! ```
//!
//! 第 `slot` 条记录位于 `4 + slot * 16`，更新单个分片只需一次定长的定位写。

pub mod functions;
pub mod structs;

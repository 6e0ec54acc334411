//! 传输能力领域模块：带可选 `Range` 头的 GET，返回状态码与字节流。
//!
//! 协调器持有 `Arc<dyn RangeTransport>`，不使用进程级全局客户端；
//! 生产环境用 [`HttpTransport`](structs::HttpTransport)，测试可注入假实现。

pub mod impl_traits;
pub mod structs;
pub mod traits;

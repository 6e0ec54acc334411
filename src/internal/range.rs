//! 字节区间领域模块：`[from, to)` 半开区间及整体分片。

pub mod functions;
pub mod structs;

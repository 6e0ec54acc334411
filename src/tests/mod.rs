//! 测试模块入口：公共逻辑（假传输、临时目录、日志初始化）在 `lib` 子模块，用例在 `internal`。

#[cfg(test)]
pub use lib::*;

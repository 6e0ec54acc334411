//! 字节区间：目标文件上的半开区间 `[from, to)`。

use std::fmt;

use crate::internal::accelerator::structs::DownloadError;

/// 半开字节区间 `[from, to)`，保证 `from <= to`。
///
/// 两种用法：
/// - 分片时确定的固定任务（创建后不再变化）；
/// - 进度游标：某分片**尚未下载**的剩余部分，`from` 随写入单调前进，`to` 不变。
///
/// `from == to` 表示区间已耗尽（合法，不是错误）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteRange {
    from: u64,
    to: u64,
}

impl ByteRange {
    /// 创建区间；`from > to` 时返回 `InvalidRange`，相等允许。
    pub fn new(from: u64, to: u64) -> Result<Self, DownloadError> {
        if from > to {
            return Err(DownloadError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// 调用方已保证 `from <= to` 时使用。
    pub(crate) fn ordered(from: u64, to: u64) -> Self {
        debug_assert!(from <= to, "区间起点 {} 大于终点 {}", from, to);
        Self { from, to }
    }

    /// 位于 `at` 处的空区间。
    pub fn empty_at(at: u64) -> Self {
        Self { from: at, to: at }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    /// 区间字节数。
    pub fn len(&self) -> u64 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// 游标前进到 `pos` 后的剩余区间 `[pos, to)`。
    ///
    /// `pos` 会被夹到 `[from, to]` 内，游标不会后退，也不会越过 `to`。
    pub fn advance_to(&self, pos: u64) -> Self {
        Self::ordered(pos.clamp(self.from, self.to), self.to)
    }

    /// `Range` 请求头的取值：`bytes=from-(to-1)`（HTTP 的闭区间写法）。
    ///
    /// 空区间没有合法写法，返回 `None`；调用方应直接跳过该次请求。
    pub fn header_value(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!("bytes={}-{}", self.from, self.to - 1))
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

//! 把 `[0, content_length)` 切成 `concurrency` 个首尾相接的分片。

use crate::internal::range::structs::ByteRange;

/// 按并发数均分整个文件，返回长度恰为 `concurrency` 的区间列表（下标即分片号）。
///
/// - 分片大小 = `ceil(content_length / concurrency)`；
/// - 最后一个有内容的分片截断到 `content_length`；
/// - 计算出的起点 `>= content_length` 的分片为空区间 `[content_length, content_length)`。
///
/// 所有非空分片不重叠、无空洞地覆盖 `[0, content_length)`。`concurrency` 为 0 时返回空列表。
pub fn partition(content_length: u64, concurrency: usize) -> Vec<ByteRange> {
    if concurrency == 0 {
        return Vec::new();
    }

    let slots = concurrency as u64;
    let chunk_size = content_length.div_ceil(slots);

    (0..slots)
        .map(|i| {
            let from = i.saturating_mul(chunk_size);
            if from >= content_length {
                return ByteRange::empty_at(content_length);
            }
            let to = from.saturating_add(chunk_size).min(content_length);
            ByteRange::ordered(from, to)
        })
        .collect()
}

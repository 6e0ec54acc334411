/// 内部实现模块
mod internal;

#[cfg(test)]
mod tests;

/// 字节区间与分片计算
pub mod range {
    use crate::internal;
    pub use internal::range::functions::partition::*;
    pub use internal::range::structs::*;
}

/// 断点续传日志：固定布局的二进制文件，每个分片一条 16 字节记录
pub mod resume {
    use crate::internal;
    pub use internal::resume::functions::derive_log_id::*;
    pub use internal::resume::structs::*;
}

/// HTTP 传输能力：协调器只依赖 trait，测试可替换为假实现
pub mod transport {
    use crate::internal;
    pub use internal::transport::structs::*;
    pub use internal::transport::traits::*;
}

/// 下载加速器：探测、分片、并发拉取、续传
pub mod accelerator {
    use crate::internal;
    pub use internal::accelerator::structs::*;
}

pub use accelerator::{AcceleratorConfig, DownloadAccelerator, DownloadError, DownloadReport};
pub use range::ByteRange;

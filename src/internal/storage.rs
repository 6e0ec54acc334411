//! 本地文件能力：按绝对偏移读写，不依赖共享的文件游标。

pub mod positioned_io;

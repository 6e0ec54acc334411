//! 定位写：同一个文件句柄可被多个任务同时使用，各自写不重叠的区域。
//!
//! Unix 下是 `pwrite`，不移动游标；Windows 下 `seek_write` 会移动游标，
//! 但每次调用自带偏移，因此同样不依赖共享游标。

use std::fs::File;
use std::io;

/// 在 `offset` 处写一次，返回实际写入的字节数（可能小于 `buf.len()`）。
#[cfg(unix)]
pub fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    std::os::unix::fs::FileExt::write_at(file, buf, offset)
}

#[cfg(windows)]
pub fn write_at(file: &File, buf: &[u8], offset: u64) -> io::Result<usize> {
    std::os::windows::fs::FileExt::seek_write(file, buf, offset)
}

/// 从 `offset` 起把 `buf` 全部写完；中途写入 0 字节视为 `WriteZero` 错误。
pub fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> io::Result<()> {
    while !buf.is_empty() {
        match write_at(file, buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "定位写入返回 0 字节",
                ));
            }
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

use std::fs::OpenOptions;
use std::sync::Arc;

use crate::accelerator::{RangeWriter, WriteOutcome};
use crate::range::ByteRange;
use crate::resume::ResumeLog;

fn prefilled(dir: &std::path::Path, len: usize) -> Arc<std::fs::File> {
    let path = dir.join("target.bin");
    std::fs::write(&path, vec![0xAAu8; len]).unwrap();
    let f = OpenOptions::new().read(true).write(true).open(&path).unwrap();
    Arc::new(f)
}

#[test]
fn writes_stay_inside_the_range() {
    let dir = tempfile::tempdir().unwrap();
    let file = prefilled(dir.path(), 30);
    let range = ByteRange::new(10, 20).unwrap();
    let mut w = RangeWriter::new(file, range);

    assert_eq!(w.write_chunk(&[1, 2, 3, 4]).unwrap(), WriteOutcome::Written(4));
    assert_eq!(w.position(), 14);
    assert_eq!(w.remaining(), ByteRange::new(14, 20).unwrap());

    // 10 字节只剩 6 字节的空间
    assert_eq!(
        w.write_chunk(&[5; 10]).unwrap(),
        WriteOutcome::RangeEnd { written: 6, dropped: 4 }
    );
    assert!(w.is_exhausted());
    assert_eq!(w.written(), 10);

    // 写满之后一律拒绝
    assert_eq!(
        w.write_chunk(&[9; 3]).unwrap(),
        WriteOutcome::RangeEnd { written: 0, dropped: 3 }
    );

    let bytes = std::fs::read(dir.path().join("target.bin")).unwrap();
    assert_eq!(bytes.len(), 30);
    assert!(bytes[..10].iter().all(|b| *b == 0xAA), "区间之前的字节被改动");
    assert_eq!(&bytes[10..14], &[1, 2, 3, 4]);
    assert!(bytes[14..20].iter().all(|b| *b == 5));
    assert!(bytes[20..].iter().all(|b| *b == 0xAA), "区间之后的字节被改动");
}

#[test]
fn empty_chunk_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let file = prefilled(dir.path(), 8);
    let mut w = RangeWriter::new(file, ByteRange::new(2, 4).unwrap());
    assert_eq!(w.write_chunk(&[]).unwrap(), WriteOutcome::Written(0));
    assert_eq!(w.position(), 2);
}

#[test]
fn each_write_advances_the_log_record() {
    let dir = tempfile::tempdir().unwrap();
    let file = prefilled(dir.path(), 30);
    let ranges = vec![ByteRange::new(0, 10).unwrap(), ByteRange::new(10, 20).unwrap()];
    let log = Arc::new(ResumeLog::create(dir.path(), "log", ranges).unwrap());

    let mut w = RangeWriter::new(file, ByteRange::new(10, 20).unwrap()).with_log(Arc::clone(&log), 1);
    w.write_chunk(&[7; 3]).unwrap();

    let snapshot = ResumeLog::recover(dir.path(), "log").unwrap();
    assert_eq!(snapshot.entries()[0], ByteRange::new(0, 10).unwrap(), "别的分片不应被改动");
    assert_eq!(snapshot.entries()[1], ByteRange::new(13, 20).unwrap());
    snapshot.close().unwrap();

    w.write_chunk(&[7; 20]).unwrap();
    let snapshot = ResumeLog::recover(dir.path(), "log").unwrap();
    assert_eq!(snapshot.entries()[1], ByteRange::new(20, 20).unwrap());
}

mod common;

use std::fs;

use common::{jpeg_padded, set_mtime, ts, write_jpeg, write_plain};
use imgorg::date::{self, FsTime, Resolver};
use tempfile::tempdir;

fn resolver(pattern: &str, fs_time: FsTime) -> Resolver {
    Resolver::new(date::pattern(pattern).unwrap(), fs_time, false)
}

#[test]
fn metadata_wins_over_file_name_and_mtime() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMG_19990101.jpg");
    write_jpeg(&path, "2021:03:05 14:15:16");
    set_mtime(&path, ts(2010, 10, 10, 10, 10, 10));

    let found = resolver(r"\d{8}", FsTime::Modified).resolve(&path);
    assert_eq!(Some(ts(2021, 3, 5, 14, 15, 16)), found);
}

#[test]
fn metadata_with_nul_padding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("padded.jpg");
    fs::write(&path, jpeg_padded("2018:07:01 09:00:00", 3)).unwrap();
    assert_eq!(
        Some(ts(2018, 7, 1, 9, 0, 0)),
        resolver("", FsTime::Skip).resolve(&path)
    );
}

#[test]
fn malformed_metadata_falls_through_to_file_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMG_20200229_1200.jpg");
    write_jpeg(&path, "not a date at all..");
    assert_eq!(
        Some(ts(2020, 2, 29, 0, 0, 0)),
        resolver(r"\d{8}", FsTime::Skip).resolve(&path)
    );
}

#[test]
fn file_name_wins_over_mtime() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scan-20011224.jpeg");
    write_plain(&path);
    set_mtime(&path, ts(2010, 10, 10, 10, 10, 10));
    assert_eq!(
        Some(ts(2001, 12, 24, 0, 0, 0)),
        resolver(r"\d{8}", FsTime::Modified).resolve(&path)
    );
}

#[test]
fn mtime_when_nothing_else() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holiday.jpg");
    write_plain(&path);
    set_mtime(&path, ts(2016, 8, 30, 18, 45, 0));
    assert_eq!(
        Some(ts(2016, 8, 30, 18, 45, 0)),
        resolver(r"\d{8}", FsTime::Modified).resolve(&path)
    );
}

#[test]
fn empty_pattern_skips_file_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("IMG_20200101.jpg");
    write_plain(&path);
    set_mtime(&path, ts(2016, 8, 30, 18, 45, 0));
    assert_eq!(
        Some(ts(2016, 8, 30, 18, 45, 0)),
        resolver("", FsTime::Modified).resolve(&path)
    );
}

#[test]
fn absent_when_every_source_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("holiday.jpg");
    write_plain(&path);
    assert_eq!(None, resolver(r"\d{8}", FsTime::Skip).resolve(&path));
}

#![allow(dead_code)]

use std::{fs, path::Path};

use chrono::TimeZone;

/// Smallest JPEG that carries an EXIF DateTimeOriginal: SOI, one APP1
/// segment holding a big-endian TIFF with IFD0 -> Exif IFD, then EOI.
/// `padding` extra NUL bytes are appended to the ASCII value.
pub fn jpeg_padded(date_time_original: &str, padding: usize) -> Vec<u8> {
    let mut value = date_time_original.as_bytes().to_vec();
    value.resize(value.len() + 1 + padding, 0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\x00\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // IFD0 at 8: ExifIFDPointer (LONG) -> 26.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x8769u16.to_be_bytes());
    tiff.extend_from_slice(&4u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&26u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    // Exif IFD at 26: DateTimeOriginal (ASCII) -> 44.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x9003u16.to_be_bytes());
    tiff.extend_from_slice(&2u16.to_be_bytes());
    tiff.extend_from_slice(&(value.len() as u32).to_be_bytes());
    tiff.extend_from_slice(&44u32.to_be_bytes());
    tiff.extend_from_slice(&0u32.to_be_bytes());
    assert_eq!(44, tiff.len());
    tiff.extend_from_slice(&value);

    let mut jpeg = vec![0xff, 0xd8, 0xff, 0xe1];
    jpeg.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    jpeg.extend_from_slice(b"Exif\0\0");
    jpeg.extend_from_slice(&tiff);
    jpeg.extend_from_slice(&[0xff, 0xd9]);
    jpeg
}

pub fn jpeg(date_time_original: &str) -> Vec<u8> {
    jpeg_padded(date_time_original, 0)
}

pub fn write_jpeg(path: &Path, date_time_original: &str) {
    fs::write(path, jpeg(date_time_original)).unwrap();
}

/// A `.jpg` without any metadata.
pub fn write_plain(path: &Path) {
    fs::write(path, b"definitely not a jpeg").unwrap();
}

pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

/// Set mtime to the given local wall-clock time.
pub fn set_mtime(path: &Path, local: chrono::NaiveDateTime) {
    let secs = chrono::Local
        .from_local_datetime(&local)
        .earliest()
        .unwrap()
        .timestamp();
    filetime::set_file_mtime(path, filetime::FileTime::from_unix_time(secs, 0)).unwrap();
}

pub fn exts() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

pub fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

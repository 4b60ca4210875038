use std::{fs, io::BufReader, path::Path, time::SystemTime};

use regex::Regex;

use crate::{exiftool, Error};

pub type Timestamp = chrono::NaiveDateTime;

const EXIF_FMT: &str = "%Y:%m:%d %H:%M:%S";
const FILE_NAME_FMT: &str = "%Y%m%d";

/// Which filesystem timestamp to fall back on when neither the metadata nor
/// the file name yield a date.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FsTime {
    #[default]
    Modified,
    Created,
    /// Never fall back on the filesystem.
    #[value(name = "none")]
    #[serde(rename = "none")]
    Skip,
}

/// Compile a user supplied file name pattern. An empty pattern means the
/// file name is not consulted at all.
pub fn pattern(pattern: &str) -> Result<Option<Regex>, Error> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Date taken, resolved through an ordered chain of sources:
/// EXIF DateTimeOriginal, optionally exiftool, the file name pattern and
/// finally a filesystem timestamp. First hit wins.
#[derive(Debug)]
pub struct Resolver {
    pattern: Option<Regex>,
    fs_time: FsTime,
    use_exiftool: bool,
}

impl Resolver {
    pub fn new(pattern: Option<Regex>, fs_time: FsTime, use_exiftool: bool) -> Self {
        Self {
            pattern,
            fs_time,
            use_exiftool,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn resolve(&self, path: &Path) -> Option<Timestamp> {
        let timestamp = from_exif(path)
            .or_else(|| {
                self.use_exiftool
                    .then(|| exiftool::read_timestamp(path))
                    .flatten()
            })
            .or_else(|| {
                self.pattern
                    .as_ref()
                    .and_then(|pattern| from_file_name(path, pattern))
            })
            .or_else(|| from_fs(path, self.fs_time));
        tracing::debug!(?timestamp, "Resolved");
        timestamp
    }
}

pub fn from_exif(path: &Path) -> Option<Timestamp> {
    let file = fs::File::open(path)
        .map_err(|error| {
            tracing::warn!(?path, ?error, "Failed to open file");
        })
        .ok()?;
    let mut bufreader = BufReader::new(&file);
    let exif = exif::Reader::new()
        .read_from_container(&mut bufreader)
        .map_err(|error| {
            tracing::debug!(?path, ?error, "EXIF data not found");
        })
        .ok()?;
    let field = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)?;
    match &field.value {
        exif::Value::Ascii(data) => data.first().and_then(|bytes| parse_exif(bytes)),
        value => {
            tracing::warn!(?path, ?value, "DateTimeOriginal value is not ASCII");
            None
        }
    }
}

/// Parse a `yyyy:MM:dd HH:mm:ss` value, tolerating NUL padding.
pub fn parse_exif(data: &[u8]) -> Option<Timestamp> {
    let text = std::str::from_utf8(data).ok()?;
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    Timestamp::parse_from_str(text, EXIF_FMT)
        .map_err(|error| {
            tracing::debug!(?text, ?error, "Invalid DateTimeOriginal");
        })
        .ok()
}

/// Match `pattern` against the file stem and read the match as `yyyyMMdd`.
/// A capture group named `date` takes precedence over the whole match.
pub fn from_file_name(path: &Path, pattern: &Regex) -> Option<Timestamp> {
    let stem = path.file_stem()?.to_str()?;
    let captures = pattern.captures(stem)?;
    let matched = captures.name("date").or_else(|| captures.get(0))?;
    chrono::NaiveDate::parse_from_str(matched.as_str(), FILE_NAME_FMT)
        .map_err(|error| {
            tracing::debug!(?stem, matched = matched.as_str(), ?error, "Not a date");
        })
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn from_fs(path: &Path, fs_time: FsTime) -> Option<Timestamp> {
    let meta = fs::metadata(path)
        .map_err(|error| {
            tracing::warn!(?path, ?error, "Failed to read metadata");
        })
        .ok()?;
    let time = match fs_time {
        FsTime::Modified => meta.modified(),
        FsTime::Created => meta.created(),
        FsTime::Skip => return None,
    };
    time.map(local)
        .map_err(|error| {
            tracing::warn!(?path, ?fs_time, ?error, "Filesystem timestamp unavailable");
        })
        .ok()
}

fn local(time: SystemTime) -> Timestamp {
    chrono::DateTime::<chrono::Local>::from(time).naive_local()
}

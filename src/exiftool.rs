use std::path::Path;

use crate::date::{self, Timestamp};

#[derive(serde::Deserialize, Debug)]
struct Fields {
    #[serde(rename = "DateTimeOriginal", default)]
    date_time_original: Option<String>,

    #[serde(rename = "CreateDate", default)]
    create_date: Option<String>,
}

/// exiftool appends subseconds and timezones to some values; only the
/// leading `yyyy:MM:dd HH:mm:ss` part is kept.
fn parse(value: &str) -> Option<Timestamp> {
    let prefix = value.get(..19).unwrap_or(value);
    date::parse_exif(prefix.as_bytes())
}

/// Ask the external exiftool program for the capture date. Any failure,
/// including exiftool not being installed, means "not found".
#[tracing::instrument(skip_all)]
pub fn read_timestamp(path: &Path) -> Option<Timestamp> {
    let out = std::process::Command::new("exiftool")
        .args(["-json", "-DateTimeOriginal", "-CreateDate"])
        .arg(path)
        .output()
        .map_err(|error| {
            tracing::debug!(?error, "Failed to execute exiftool");
        })
        .ok()?;
    if !out.status.success() {
        tracing::warn!(
            ?path,
            status = ?out.status,
            stderr = ?String::from_utf8_lossy(&out.stderr[..]),
            "exiftool failed"
        );
        return None;
    }
    let mut fields = serde_json::from_slice::<Vec<Fields>>(&out.stdout[..])
        .map_err(|error| {
            tracing::warn!(?path, ?error, "Unexpected exiftool output");
        })
        .ok()?;
    let Fields {
        date_time_original,
        create_date,
    } = fields.pop()?;
    date_time_original
        .as_deref()
        .and_then(parse)
        .or_else(|| create_date.as_deref().and_then(parse))
}

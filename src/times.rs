use std::path::Path;

use anyhow::Context;
use filetime::FileTime;

use crate::{
    date::{Resolver, Timestamp},
    files, progress,
};

/// Local wall-clock time to a filesystem time. `None` for local times that
/// do not exist (DST gaps).
pub fn file_time(timestamp: &Timestamp) -> Option<FileTime> {
    let local = timestamp.and_local_timezone(chrono::Local).earliest()?;
    Some(FileTime::from_unix_time(
        local.timestamp(),
        local.timestamp_subsec_nanos(),
    ))
}

/// Stamp each image's resolved date onto its access and modification
/// times. Returns the number of files updated.
#[tracing::instrument(skip(resolver, extensions))]
pub fn set_times(
    dir: &Path,
    resolver: &Resolver,
    extensions: &[String],
    show_progress: bool,
) -> anyhow::Result<usize> {
    tracing::info!("Setting file times");
    let paths = files::images(dir, extensions)?;
    let bar = progress::bar(paths.len(), "Stamping", show_progress);
    let mut updated = 0;
    for path in paths {
        match resolver.resolve(&path).map(|ts| set_one(&path, &ts)) {
            None => {
                tracing::warn!(?path, "Date taken not found. Leaving times as they are.");
            }
            Some(Ok(())) => updated += 1,
            Some(Err(error)) => {
                tracing::error!(?path, ?error, "Failed to set file times");
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    tracing::info!(updated, "File times set");
    Ok(updated)
}

fn set_one(path: &Path, timestamp: &Timestamp) -> anyhow::Result<()> {
    let time = file_time(timestamp)
        .context(format!("Nonexistent local time: {}", timestamp))?;
    filetime::set_file_times(path, time, time)
        .context(format!("Failed to set times on: {:?}", path))?;
    tracing::debug!(?path, %timestamp, "Times set");
    Ok(())
}

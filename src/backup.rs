use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{files, progress};

pub const DEFAULT_DIR: &str = "backup";

/// Copy every image directly inside `dir` into `dir/<name>`. A file already
/// present in the backup is left alone. Returns the number of new copies.
#[tracing::instrument(skip(extensions))]
pub fn backup(
    dir: &Path,
    name: &str,
    extensions: &[String],
    show_progress: bool,
) -> anyhow::Result<usize> {
    tracing::info!("Backing up");
    let paths = files::images(dir, extensions)?;
    if paths.is_empty() {
        tracing::info!("Nothing to back up");
        return Ok(0);
    }
    let backup_dir = dir.join(name);
    fs::create_dir_all(&backup_dir)
        .context(format!("Failed to create backup dir: {:?}", backup_dir))?;
    let bar = progress::bar(paths.len(), "Backing up", show_progress);
    let mut copied = 0;
    for src in paths {
        if copy_new(&src, &backup_dir)?.is_some() {
            copied += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    tracing::info!(copied, "Backed up");
    Ok(copied)
}

/// Copy without ever replacing an existing destination.
fn copy_new(src: &Path, dst_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let name = src
        .file_name()
        .context(format!("No file name in: {:?}", src))?;
    let dst = dst_dir.join(name);
    let mut writer = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&dst)
    {
        Ok(file) => file,
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
            tracing::warn!(?dst, "Skipping. Backup copy already exists.");
            return Ok(None);
        }
        Err(error) => {
            return Err(error).context(format!("Failed to create: {:?}", dst));
        }
    };
    let copied = fs::File::open(src)
        .context(format!("Failed to open: {:?}", src))
        .and_then(|mut reader| {
            io::copy(&mut reader, &mut writer).context(format!(
                "Failed to copy file. src={:?}. dst={:?}",
                src, dst
            ))
        });
    drop(writer);
    if let Err(error) = copied {
        // A partial copy would be skipped as "already backed up" forever.
        if let Err(remove_error) = fs::remove_file(&dst) {
            tracing::error!(?dst, ?remove_error, "Failed to remove partial backup copy");
        }
        return Err(error);
    }
    tracing::debug!(?src, ?dst, "Copied");
    Ok(Some(dst))
}

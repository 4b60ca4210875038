use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{files, progress};

pub fn run_dir_name(now: chrono::NaiveDateTime) -> String {
    format!("run_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Copy every image found recursively under `inputs` into a fresh
/// `run_<yyyyMMdd_HHmmss>` folder inside `working_dir`, flattening the
/// tree. Returns the run folder.
#[tracing::instrument(skip(extensions))]
pub fn collect(
    inputs: &[PathBuf],
    working_dir: &Path,
    extensions: &[String],
    show_progress: bool,
) -> anyhow::Result<PathBuf> {
    let run_dir = working_dir.join(run_dir_name(chrono::Local::now().naive_local()));
    fs::create_dir_all(&run_dir)
        .context(format!("Failed to create run dir: {:?}", run_dir))?;
    tracing::info!(?run_dir, "Collecting");

    let mut found = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            tracing::warn!(?input, "Skipping. Input dir does not exist.");
            continue;
        }
        found.extend(
            files::FilePaths::find(input)
                .filter(|path| files::is_image(path, extensions))
                .filter(|path| !path.starts_with(&run_dir)),
        );
    }

    let bar = progress::bar(found.len(), "Collecting", show_progress);
    for src in &found {
        let name = src
            .file_name()
            .context(format!("No file name in: {:?}", src))?;
        let dst = files::free_path(&run_dir.join(name))
            .context(format!("Failed to pick destination in: {:?}", run_dir))?;
        fs::copy(src, &dst).context(format!(
            "Failed to copy file. src={:?}. dst={:?}",
            src, dst
        ))?;
        tracing::debug!(?src, ?dst, "Copied");
        bar.inc(1);
    }
    bar.finish_and_clear();
    tracing::info!(files = found.len(), ?run_dir, "Collected");
    Ok(run_dir)
}

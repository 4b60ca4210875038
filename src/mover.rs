use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    date::{Resolver, Timestamp},
    files, progress,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved(PathBuf),
    /// No date found; the file stayed where it was.
    LeftInPlace,
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moved(dst) => write!(f, "{}", dst.to_string_lossy()),
            Self::LeftInPlace => write!(f, "Left In Place"),
            Self::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}

#[derive(Debug)]
pub struct Moved {
    pub src: PathBuf,
    pub outcome: Outcome,
}

impl Moved {
    pub fn show(&self, sep: &str) {
        println!("{}{}{}", self.src.to_string_lossy(), sep, self.outcome);
    }
}

/// `YYYY/MM/DD` below `root`.
pub fn date_dir(root: &Path, timestamp: &Timestamp) -> PathBuf {
    use chrono::Datelike;

    let year = format!("{:04}", timestamp.year());
    let month = format!("{:02}", timestamp.month());
    let day = format!("{:02}", timestamp.day());
    root.join(year).join(month).join(day)
}

/// Move every image directly inside `dir` into `dir/YYYY/MM/DD`. Files
/// without a date stay put. Existing destination files are never
/// overwritten; a numeric suffix is appended instead.
#[tracing::instrument(skip(resolver, extensions))]
pub fn move_into_dates(
    dir: &Path,
    resolver: &Resolver,
    extensions: &[String],
    show_progress: bool,
) -> anyhow::Result<Vec<Moved>> {
    tracing::info!("Moving");
    let paths = files::images(dir, extensions)?;
    let bar = progress::bar(paths.len(), "Moving", show_progress);
    let mut moved = Vec::with_capacity(paths.len());
    for src in paths {
        let outcome = match resolver.resolve(&src) {
            None => {
                tracing::warn!(?src, "Date taken not found. Leaving in place.");
                Outcome::LeftInPlace
            }
            Some(timestamp) => match move_one(&src, &date_dir(dir, &timestamp)) {
                Ok(dst) => Outcome::Moved(dst),
                Err(error) => {
                    tracing::error!(?src, ?error, "Failed to move");
                    Outcome::Failed(format!("{:#}", error))
                }
            },
        };
        moved.push(Moved { src, outcome });
        bar.inc(1);
    }
    bar.finish_and_clear();
    tracing::info!(files = moved.len(), "Moved");
    Ok(moved)
}

fn move_one(src: &Path, dst_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dst_dir)
        .context(format!("Failed to create parent dir: {:?}", dst_dir))?;
    let name = src
        .file_name()
        .context(format!("No file name in: {:?}", src))?;
    let dst = files::free_path(&dst_dir.join(name))
        .context(format!("Failed to pick destination in: {:?}", dst_dir))?;
    fs::rename(src, &dst).context(format!(
        "Failed to rename file. src={:?}. dst={:?}",
        src, dst
    ))?;
    tracing::info!(?src, ?dst, "Moved");
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_date_dir() {
        let ts = chrono::NaiveDate::from_ymd_opt(2021, 3, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(
            PathBuf::from("/photos/2021/03/05"),
            date_dir(Path::new("/photos"), &ts)
        );
    }

    #[test]
    fn t_outcome_display() {
        assert_eq!(
            "/photos/2021/03/05/a.jpg",
            Outcome::Moved(PathBuf::from("/photos/2021/03/05/a.jpg")).to_string()
        );
        assert_eq!("Left In Place", Outcome::LeftInPlace.to_string());
        assert_eq!("Failed: boom", Outcome::Failed("boom".to_string()).to_string());
    }
}

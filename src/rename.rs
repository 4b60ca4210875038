use std::{
    collections::HashMap,
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Context;
use regex::Regex;

use crate::{date::Resolver, files, progress};

/// Date part of the naming convention.
pub const DATE_FMT: &str = "%d_%m_%Y";

static CONVENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>\d{2}_\d{2}_\d{4})_(?P<counter>\d{4,})_image\.[^.]+$").unwrap()
});

/// `<dd_MM_yyyy>_<counter>_image.<ext>`, counter zero-padded to 4 digits.
pub fn file_name(date: &str, counter: u32, ext: &str) -> String {
    format!("{}_{:04}_image.{}", date, counter, ext)
}

/// Date and counter of a name that follows the convention.
pub fn parse_file_name(name: &str) -> Option<(&str, u32)> {
    let captures = CONVENTION.captures(name)?;
    let date = captures.name("date")?.as_str();
    let counter = captures.name("counter")?.as_str().parse().ok()?;
    Some((date, counter))
}

/// Highest sequence number used so far, per formatted date.
#[derive(Debug, Default)]
pub struct Counters(HashMap<String, u32>);

impl Counters {
    /// Seed from names already on disk, keeping the maximum per date.
    pub fn seed<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counters = Self::default();
        for (date, counter) in names.into_iter().filter_map(parse_file_name) {
            let max = counters.0.entry(date.to_string()).or_insert(0);
            *max = (*max).max(counter);
        }
        counters
    }

    /// `None` once the counter for `date` cannot grow any further. The
    /// stored value is left untouched then, so no number is ever handed out
    /// twice.
    pub fn next(&mut self, date: &str) -> Option<u32> {
        let counter = self.0.entry(date.to_string()).or_insert(0);
        *counter = counter.checked_add(1)?;
        Some(*counter)
    }

    pub fn get(&self, date: &str) -> Option<u32> {
        self.0.get(date).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Renamed(String),
    KeptOriginal,
    AlreadyNamed,
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed(name) => write!(f, "{}", name),
            Self::KeptOriginal => write!(f, "Kept Original"),
            Self::AlreadyNamed => write!(f, "Already Named"),
            Self::Failed(msg) => write!(f, "Failed: {}", msg),
        }
    }
}

#[derive(Debug)]
pub struct Renamed {
    pub src: PathBuf,
    pub outcome: Outcome,
}

impl Renamed {
    pub fn show(&self, sep: &str) {
        let old = self
            .src
            .file_name()
            .map_or("--".to_string(), |name| name.to_string_lossy().to_string());
        println!("{}{}{}", old, sep, self.outcome);
    }
}

/// Rename every image directly inside `dir` to the per-day numbered form.
/// A failure on one file is recorded and the pass moves on.
#[tracing::instrument(skip(resolver, extensions))]
pub fn rename(
    dir: &Path,
    resolver: &Resolver,
    extensions: &[String],
    show_progress: bool,
) -> anyhow::Result<Vec<Renamed>> {
    tracing::info!("Renaming");
    let paths = files::images(dir, extensions)?;
    let mut counters = Counters::seed(
        paths
            .iter()
            .filter_map(|path| path.file_name().and_then(|name| name.to_str())),
    );
    tracing::debug!(?counters, "Seeded");
    let bar = progress::bar(paths.len(), "Renaming", show_progress);
    let mut renamed = Vec::with_capacity(paths.len());
    for src in paths {
        let outcome = rename_one(&src, resolver, &mut counters).unwrap_or_else(|error| {
            tracing::error!(?src, ?error, "Failed to rename");
            Outcome::Failed(format!("{:#}", error))
        });
        renamed.push(Renamed { src, outcome });
        bar.inc(1);
    }
    bar.finish_and_clear();
    tracing::info!(files = renamed.len(), "Renamed");
    Ok(renamed)
}

fn rename_one(
    src: &Path,
    resolver: &Resolver,
    counters: &mut Counters,
) -> anyhow::Result<Outcome> {
    if src
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(parse_file_name)
        .is_some()
    {
        tracing::debug!(?src, "Already named. Skipping.");
        return Ok(Outcome::AlreadyNamed);
    }
    let Some(timestamp) = resolver.resolve(src) else {
        tracing::warn!(?src, "Date taken not found. Keeping original name.");
        return Ok(Outcome::KeptOriginal);
    };
    let date = timestamp.format(DATE_FMT).to_string();
    let ext = src
        .extension()
        .map_or("jpg".to_string(), |ext| ext.to_string_lossy().to_ascii_lowercase());
    let dst = loop {
        let counter = counters
            .next(&date)
            .context(format!("Counter exhausted for date: {}", date))?;
        let candidate = src.with_file_name(file_name(&date, counter, &ext));
        if !candidate
            .try_exists()
            .context(format!("Failed to check existence of: {:?}", candidate))?
        {
            break candidate;
        }
        tracing::warn!(?candidate, "Name taken. Advancing counter.");
    };
    fs::rename(src, &dst).context(format!(
        "Failed to rename file. src={:?}. dst={:?}",
        src, dst
    ))?;
    tracing::info!(?src, ?dst, "Renamed");
    let name = dst
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Outcome::Renamed(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_file_name() {
        assert_eq!("01_02_2020_0001_image.jpg", file_name("01_02_2020", 1, "jpg"));
        assert_eq!("01_02_2020_0123_image.jpeg", file_name("01_02_2020", 123, "jpeg"));
        assert_eq!("01_02_2020_12345_image.jpg", file_name("01_02_2020", 12345, "jpg"));
    }

    #[test]
    fn t_parse_file_name() {
        assert_eq!(
            Some(("01_01_2020", 3)),
            parse_file_name("01_01_2020_0003_image.jpg")
        );
        assert_eq!(
            Some(("31_12_1999", 10000)),
            parse_file_name("31_12_1999_10000_image.JPEG")
        );
        assert_eq!(None, parse_file_name("01_01_2020_003_image.jpg"));
        assert_eq!(None, parse_file_name("IMG_0001.jpg"));
        assert_eq!(None, parse_file_name("01_01_2020_0003_image"));
        assert_eq!(None, parse_file_name("x01_01_2020_0003_image.jpg"));
    }

    #[test]
    fn t_counters_seed_takes_max() {
        let counters = Counters::seed([
            "01_01_2020_0003_image.jpg",
            "01_01_2020_0001_image.jpg",
            "02_01_2020_0007_image.jpeg",
            "holiday.jpg",
        ]);
        assert_eq!(Some(3), counters.get("01_01_2020"));
        assert_eq!(Some(7), counters.get("02_01_2020"));
        assert_eq!(None, counters.get("03_01_2020"));
    }

    #[test]
    fn t_counters_next() {
        let mut counters = Counters::seed(["01_01_2020_0003_image.jpg"]);
        assert_eq!(Some(4), counters.next("01_01_2020"));
        assert_eq!(Some(5), counters.next("01_01_2020"));
        assert_eq!(Some(1), counters.next("05_03_2021"));
        assert_eq!(Some(2), counters.next("05_03_2021"));
    }

    #[test]
    fn t_counters_next_exhausted() {
        let mut counters = Counters::seed(["01_01_2020_4294967294_image.jpg"]);
        assert_eq!(Some(u32::MAX), counters.next("01_01_2020"));
        assert_eq!(None, counters.next("01_01_2020"));
        assert_eq!(None, counters.next("01_01_2020"));
        assert_eq!(Some(u32::MAX), counters.get("01_01_2020"));

        // Beyond u32 is not a convention match at all.
        assert_eq!(None, parse_file_name("01_01_2020_4294967296_image.jpg"));
    }

    #[test]
    fn t_outcome_display() {
        assert_eq!("a.jpg", Outcome::Renamed("a.jpg".to_string()).to_string());
        assert_eq!("Kept Original", Outcome::KeptOriginal.to_string());
        assert_eq!("Failed: boom", Outcome::Failed("boom".to_string()).to_string());
    }
}

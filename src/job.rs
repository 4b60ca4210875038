use std::path::PathBuf;

use crate::{
    backup, collect,
    date::{self, FsTime, Resolver},
    files, mover, rename, times, Error,
};

const SEP: &str = " | ";

#[derive(Debug, Default, Clone, Copy)]
pub struct Stages {
    pub backup: bool,
    pub set_times: bool,
    pub rename: bool,
    pub relocate: bool,
}

impl Stages {
    fn any(&self) -> bool {
        self.backup || self.set_times || self.rename || self.relocate
    }
}

/// One invocation: where, with which pattern, and which stages. Stages run
/// in a fixed order: collect, backup, set-times, rename, move.
#[derive(Debug)]
pub struct Job {
    pub dir: PathBuf,
    pub pattern: String,
    pub stages: Stages,
    /// If non-empty, images are first collected from these into a run
    /// folder under `dir`, and the other stages work on that folder.
    pub collect_from: Vec<PathBuf>,
    pub fs_time: FsTime,
    pub exiftool: bool,
    pub extensions: Vec<String>,
    pub backup_dir: String,
    pub show_progress: bool,
}

impl Job {
    pub fn new(dir: PathBuf, pattern: String, stages: Stages) -> Self {
        Self {
            dir,
            pattern,
            stages,
            collect_from: Vec::new(),
            fs_time: FsTime::default(),
            exiftool: false,
            extensions: files::DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            backup_dir: backup::DEFAULT_DIR.to_string(),
            show_progress: false,
        }
    }

    /// Pre-flight. Nothing on disk is touched.
    pub fn check(&self) -> Result<Resolver, Error> {
        if !self.dir.is_dir() {
            return Err(Error::DirNotFound(self.dir.clone()));
        }
        if self.pattern.is_empty() {
            return Err(Error::MissingPattern);
        }
        if !self.stages.any() && self.collect_from.is_empty() {
            return Err(Error::NoStages);
        }
        let pattern = date::pattern(&self.pattern)?;
        Ok(Resolver::new(pattern, self.fs_time, self.exiftool))
    }

    /// Stops at the first stage that fails. Whatever was already renamed
    /// or moved stays that way.
    #[tracing::instrument(skip_all)]
    pub fn run(&self) -> anyhow::Result<()> {
        let resolver = self.check()?;
        tracing::info!(dir = ?self.dir, pattern = ?self.pattern, stages = ?self.stages, "Starting");
        let dir = if self.collect_from.is_empty() {
            self.dir.clone()
        } else {
            collect::collect(
                &self.collect_from,
                &self.dir,
                &self.extensions,
                self.show_progress,
            )?
        };
        if self.stages.backup {
            backup::backup(&dir, &self.backup_dir, &self.extensions, self.show_progress)?;
        }
        if self.stages.set_times {
            times::set_times(&dir, &resolver, &self.extensions, self.show_progress)?;
        }
        if self.stages.rename {
            for renamed in rename::rename(&dir, &resolver, &self.extensions, self.show_progress)? {
                renamed.show(SEP);
            }
        }
        if self.stages.relocate {
            for moved in
                mover::move_into_dates(&dir, &resolver, &self.extensions, self.show_progress)?
            {
                moved.show(SEP);
            }
        }
        tracing::info!("Finished");
        Ok(())
    }
}

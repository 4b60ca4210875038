use std::path::PathBuf;

/// Failures detected before any file is touched.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("The directory {0:?} does not exist.")]
    DirNotFound(PathBuf),

    #[error("The regex is not given.")]
    MissingPattern,

    #[error("Invalid regex {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("No operation requested. Use --rename, --move, --backup or --set-times.")]
    NoStages,

    #[error("Failed to load config {path:?}: {msg}")]
    Config { path: PathBuf, msg: String },
}

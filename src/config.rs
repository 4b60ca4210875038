use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{date::FsTime, Error};

/// Optional TOML settings. Anything given on the command line wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub pattern: Option<String>,
    pub timestamp: Option<FsTime>,
    pub exiftool: Option<bool>,
    pub extensions: Option<Vec<String>>,
    pub backup_dir: Option<String>,
    pub log_file: Option<PathBuf>,
    pub input_dirs: Vec<PathBuf>,
}

impl Config {
    /// An explicitly given file must exist and parse. The default location
    /// is optional; if it cannot be parsed a warning is printed and the
    /// defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::read(path);
        }
        match default_path() {
            Some(path) if path.exists() => Self::read(&path).or_else(|error| {
                eprintln!("Warning: {}. Using defaults.", error);
                Ok(Self::default())
            }),
            _ => Ok(Self::default()),
        }
    }

    pub fn read(path: &Path) -> Result<Self, Error> {
        let to_error = |msg: String| Error::Config {
            path: path.to_path_buf(),
            msg,
        };
        let content = fs::read_to_string(path).map_err(|e| to_error(e.to_string()))?;
        toml::from_str(&content).map_err(|e| to_error(e.to_string()))
    }
}

/// `<config dir>/imgorg/config.toml`, e.g. `~/.config/imgorg/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("imgorg").join("config.toml"))
}

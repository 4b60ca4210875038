use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;

pub const DEFAULT_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Case-insensitive extension check. Entries may be given as `jpg`, `.jpg`
/// or `*.jpg`.
pub fn is_image(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions.iter().any(|wanted| {
                wanted
                    .trim_start_matches('*')
                    .trim_start_matches('.')
                    .eq_ignore_ascii_case(ext)
            })
        })
}

/// Image files directly inside `dir`, sorted by name. Not recursive.
pub fn images(dir: &Path, extensions: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).context(format!("Failed to read directory: {:?}", dir))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .context(format!("Failed to read an entry from: {:?}", dir))?
            .path();
        if path.is_file() && is_image(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// `path` itself if nothing is there yet, otherwise the first free
/// `<stem>_<n>.<ext>` next to it.
pub fn free_path(path: &Path) -> io::Result<PathBuf> {
    if !path.try_exists()? {
        return Ok(path.to_path_buf());
    }
    let stem = path.file_stem().unwrap_or_default();
    let ext = path.extension();
    for n in 1.. {
        let mut name = OsString::from(stem);
        name.push(format!("_{}", n));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        let candidate = path.with_file_name(name);
        if !candidate.try_exists()? {
            tracing::warn!(taken = ?path, free = ?candidate, "Name taken. Using suffix.");
            return Ok(candidate);
        }
    }
    unreachable!("exhausted suffixes for {:?}", path)
}

/// Depth-first walk yielding every regular file under a root, in name
/// order. Unreadable entries are logged and skipped. Symlinks to files are
/// yielded; symlinks to directories below the root are not descended into,
/// so link cycles cannot repeat the walk.
pub struct FilePaths {
    root: PathBuf,
    pending: Vec<PathBuf>,
}

impl FilePaths {
    pub fn find(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            pending: vec![root.to_path_buf()],
        }
    }

    fn expand(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::error!(?dir, ?error, "Failed to read directory");
                return;
            }
        };
        let mut children: Vec<PathBuf> = entries
            .filter_map(|entry| {
                entry
                    .map_err(|error| {
                        tracing::error!(from = ?dir, ?error, "Failed to read an entry");
                    })
                    .ok()
                    .map(|entry| entry.path())
            })
            .collect();
        // Reversed, so that popping yields them in name order.
        children.sort_by(|a, b| b.cmp(a));
        self.pending.extend(children);
    }
}

impl Iterator for FilePaths {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(path) = self.pending.pop() {
            let meta = if path == self.root {
                fs::metadata(&path)
            } else {
                fs::symlink_metadata(&path)
            };
            match meta {
                Ok(meta) if meta.is_file() => return Some(path),
                Ok(meta) if meta.is_dir() => self.expand(&path),
                Ok(meta) if meta.is_symlink() => match fs::metadata(&path) {
                    Ok(target) if target.is_file() => return Some(path),
                    Ok(target) if target.is_dir() => {
                        tracing::warn!(?path, "Skipping. Symlinked directory.");
                    }
                    Ok(_) => {
                        tracing::debug!(?path, "Symlink to neither file nor directory");
                    }
                    Err(error) => {
                        tracing::warn!(?path, ?error, "Skipping. Broken symlink.");
                    }
                },
                Ok(_) => {
                    tracing::debug!(?path, "Neither file nor directory");
                }
                Err(error) => {
                    tracing::error!(?path, ?error, "Failed to read metadata");
                }
            }
        }
        None
    }
}

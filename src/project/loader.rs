//! Reading `.msg` sources from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::base::constants::MSG_EXTENSION;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A source file's path and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub path: PathBuf,
    pub text: String,
}

impl SourceText {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Every `.msg` file under `dir`, sorted by path.
///
/// Unreadable entries below the top level are skipped with a warning.
pub fn collect_msg_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    collect_entries(entries, recursive, &mut files);
    files.sort();
    debug!(dir = %dir.display(), count = files.len(), "collected msg files");
    Ok(files)
}

fn collect_entries(entries: fs::ReadDir, recursive: bool, files: &mut Vec<PathBuf>) {
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if path.is_dir() {
            if !recursive {
                continue;
            }
            match fs::read_dir(&path) {
                Ok(nested) => collect_entries(nested, recursive, files),
                Err(e) => warn!(dir = %path.display(), error = %e, "skipping unreadable directory"),
            }
        } else if path.extension().is_some_and(|ext| ext == MSG_EXTENSION) {
            files.push(path);
        }
    }
}

/// Read one source file.
pub fn load_source(path: &Path) -> Result<SourceText, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceText::new(path, text))
}

/// Read each path, keeping failures per file so callers can report them
/// individually.
pub fn load_sources(paths: &[PathBuf]) -> Vec<Result<SourceText, LoadError>> {
    paths.iter().map(|path| load_source(path)).collect()
}

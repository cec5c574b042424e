//! Writing generated files into the output tree.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Output errors.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {path} into place: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Tracks generated files so a later cleanup step leaves them alone.
pub trait OutputRegistry {
    fn register(&mut self, path: PathBuf);
}

impl OutputRegistry for Vec<PathBuf> {
    fn register(&mut self, path: PathBuf) {
        self.push(path);
    }
}

/// Files to keep when stale output is cleaned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepList(Vec<PathBuf>);

impl KeepList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }
}

impl OutputRegistry for KeepList {
    fn register(&mut self, path: PathBuf) {
        if !self.contains(&path) {
            self.0.push(path);
        }
    }
}

/// Target path of `filename` inside `output_dir`. A leading `/` on the
/// file name is ignored.
pub fn output_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(filename.trim_start_matches('/'))
}

/// Write `bytes` to `filename` under `output_dir`, creating parent
/// directories. Readers see either the old file or the complete new one.
pub fn write_atomic(output_dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = output_path(output_dir, filename);
    let parent = path.parent().unwrap_or(output_dir);

    fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let write_err = |source| OutputError::Write {
        path: path.clone(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;

    tmp.persist(&path).map_err(|e| OutputError::Persist {
        path: path.clone(),
        source: e.error,
    })?;

    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(path)
}

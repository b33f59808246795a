//! The persisted "current step" record shared between separate invocations

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Well-known location of the progress record
pub const DEFAULT_PROGRESS_FILE: &str = "/tmp/current_step.txt";

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("Failed to read progress file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write progress file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Progress file {path} does not hold a step number: {content:?}")]
    Malformed { path: PathBuf, content: String },
}

/// A single base-10 integer at a fixed path. Not locked, not atomic.
#[derive(Debug, Clone)]
pub struct ProgressFile {
    path: PathBuf,
}

impl ProgressFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when no record has been written yet
    pub fn read(&self) -> Result<Option<u32>, ProgressError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ProgressError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        content
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ProgressError::Malformed {
                path: self.path.clone(),
                content,
            })
    }

    /// The recorded step, or 1 when the record is absent or unusable
    pub fn read_or_default(&self) -> u32 {
        match self.read() {
            Ok(Some(step)) => step,
            Ok(None) => 1,
            Err(e) => {
                debug!(error = %e, "Ignoring unusable progress record");
                1
            }
        }
    }

    /// Overwrites the record with `step`
    pub fn write(&self, step: u32) -> Result<(), ProgressError> {
        fs::write(&self.path, step.to_string()).map_err(|source| ProgressError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl Default for ProgressFile {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_record_defaults_to_one() {
        let temp = TempDir::new().unwrap();
        let progress = ProgressFile::new(temp.path().join("current_step.txt"));

        assert!(progress.read().unwrap().is_none());
        assert_eq!(progress.read_or_default(), 1);
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let progress = ProgressFile::new(temp.path().join("current_step.txt"));

        progress.write(4).unwrap();
        assert_eq!(progress.read().unwrap(), Some(4));
        assert_eq!(
            fs::read_to_string(progress.path()).unwrap(),
            "4",
            "record holds the bare integer"
        );
    }

    #[test]
    fn test_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let progress = ProgressFile::new(temp.path().join("current_step.txt"));

        progress.write(6).unwrap();
        progress.write(2).unwrap();
        assert_eq!(progress.read_or_default(), 2);
    }

    #[test]
    fn test_malformed_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("current_step.txt");
        fs::write(&path, "three").unwrap();
        let progress = ProgressFile::new(&path);

        assert!(matches!(
            progress.read(),
            Err(ProgressError::Malformed { .. })
        ));
        assert_eq!(progress.read_or_default(), 1);
    }

    #[test]
    fn test_trailing_newline_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("current_step.txt");
        fs::write(&path, "3\n").unwrap();

        assert_eq!(ProgressFile::new(&path).read().unwrap(), Some(3));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let progress = ProgressFile::new(temp.path().join("nope").join("current_step.txt"));

        assert!(matches!(progress.write(1), Err(ProgressError::Write { .. })));
    }
}

//! Direction-specific flavor-text corpora
//!
//! The backing files are re-read on every sample so edits take effect
//! without a restart. Caching here would change observable behavior.

use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::errors::{Result, WatcherError};
use crate::common::types::Direction;

/// Loader for the two newline-delimited flavor-text files
#[derive(Debug, Clone)]
pub struct FlavorCorpus {
    long_path: PathBuf,
    short_path: PathBuf,
}

impl FlavorCorpus {
    /// Create a corpus over the two backing files
    pub fn new(long_path: impl AsRef<Path>, short_path: impl AsRef<Path>) -> Self {
        Self {
            long_path: long_path.as_ref().to_path_buf(),
            short_path: short_path.as_ref().to_path_buf(),
        }
    }

    /// Pick one line uniformly at random from the corpus for `direction`
    ///
    /// Reads the backing file fresh on every call. CRLF line endings are
    /// normalized and blank lines skipped. An unreadable or empty corpus is
    /// an error.
    pub fn sample(&self, direction: Direction) -> Result<String> {
        let path = match direction {
            Direction::Long => &self.long_path,
            Direction::Short => &self.short_path,
        };

        let raw = fs::read_to_string(path)
            .map_err(|e| WatcherError::Corpus(format!("{}: {e}", path.display())))?;
        let normalized = raw.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.is_empty() {
            return Err(WatcherError::Corpus(format!(
                "{} has no flavor lines",
                path.display()
            )));
        }

        let index = rand::thread_rng().gen_range(0..lines.len());
        Ok(lines[index].to_string())
    }
}

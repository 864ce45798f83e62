//! JSON Lines record writer
//!
//! The file handle sits behind an async mutex: each record is serialized
//! outside the lock, then written and flushed as one complete line while the
//! lock is held. Concurrent workers therefore never interleave partial lines.

use crate::config::OutputConfig;
use crate::output::BilingualRecord;
use crate::Result;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only writer for `BilingualRecord` lines
#[derive(Debug)]
pub struct JsonlWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlWriter {
    /// Opens the configured output file, creating its directory if needed
    ///
    /// The file is truncated unless `append` is set.
    pub async fn create(config: &OutputConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.directory).await?;
        Self::open(config.path(), config.append).await
    }

    /// Opens `path` for writing, truncating it unless `append` is set
    pub async fn open(path: impl Into<PathBuf>, append: bool) -> Result<Self> {
        let path = path.into();

        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }

        let file = options.open(&path).await?;
        tracing::info!("Writing records to {}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Appends one record as a JSON line and flushes it
    pub async fn append(&self, record: &BilingualRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads every record from a JSON Lines file
///
/// Blank lines are skipped; any other line that does not parse is an error.
pub async fn read_records(path: &Path) -> Result<Vec<BilingualRecord>> {
    let content = tokio::fs::read_to_string(path).await?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}

//! Destinations for serialized payloads, one JSON document per line.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Receives each serialized payload.
pub trait PayloadSink: Send + Sync {
    fn emit(&self, payload: &str) -> Result<()>;
}

/// Writes payloads to standard output.
pub struct StdoutSink;

impl PayloadSink for StdoutSink {
    fn emit(&self, payload: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", payload).context("Failed to write payload to stdout")?;
        Ok(())
    }
}

/// Appends payloads to a file.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open output file {}", path.display()))?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PayloadSink for FileSink {
    fn emit(&self, payload: &str) -> Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("Output file lock poisoned"))?;
        writeln!(file, "{}", payload)
            .with_context(|| format!("Failed to write payload to {}", self.path.display()))?;
        Ok(())
    }
}

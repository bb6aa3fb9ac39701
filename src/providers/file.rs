//! File provider implementation

use crate::core::{LogLevel, LoggerError, Provider, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Options accepted by the `file` provider factory.
///
/// ```json
/// {"dir": "/var/log/app", "filename": "app.log"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    pub dir: PathBuf,
    pub filename: String,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            filename: "app.log".to_string(),
        }
    }
}

impl FileOptions {
    /// Split a full path into directory and file name, using `.` when the
    /// path has no directory part.
    ///
    /// A path ending in a separator names a directory, so its file name is
    /// empty and the provider rejects it.
    pub fn from_path(fullpath: impl AsRef<Path>) -> Self {
        let fullpath = fullpath.as_ref();
        let ends_in_separator = fullpath
            .to_string_lossy()
            .chars()
            .next_back()
            .is_some_and(std::path::is_separator);
        if ends_in_separator {
            return Self {
                dir: fullpath.to_path_buf(),
                filename: String::new(),
            };
        }

        let dir = match fullpath.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let filename = fullpath
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { dir, filename }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }
}

/// Appends records, one per line, to a buffered file.
pub struct FileProvider {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileProvider {
    /// Open `path` for appending, creating missing parent directories.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(FileOptions::from_path(path))
    }

    pub fn with_options(options: FileOptions) -> Result<Self> {
        if options.filename.is_empty() {
            return Err(LoggerError::config("FileProvider", "filename must not be empty"));
        }

        fs::create_dir_all(&options.dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                options.dir.display().to_string(),
                e,
            )
        })?;

        let path = options.path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log file", path.display().to_string(), e))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Build from a JSON options payload; an empty payload means defaults.
    pub fn from_options(opts: &str) -> Result<Self> {
        let options = if opts.trim().is_empty() {
            FileOptions::default()
        } else {
            serde_json::from_str(opts).map_err(|e| LoggerError::options("file", e))?
        };
        Self::with_options(options)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Provider for FileProvider {
    fn write(&mut self, _level: LogLevel, record: &str) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::ProviderClosed("file".to_string()))?;

        writer.write_all(record.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileProvider {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

//! Console provider implementation

use crate::core::{LogLevel, LoggerError, Provider, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Options accepted by the `console` provider factory.
///
/// ```json
/// {"tostderrlevel": "ERROR", "colored": true}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOptions {
    /// Records at or above this level are mirrored to stderr as well as stdout.
    ///
    /// Accepts a level name or the numeric severity rank (`0` = FATAL through
    /// `5` = TRACE).
    #[serde(rename = "tostderrlevel")]
    pub to_stderr_level: LogLevel,

    /// Color each record by its level
    pub colored: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            to_stderr_level: LogLevel::Error,
            colored: true,
        }
    }
}

pub struct ConsoleProvider {
    options: ConsoleOptions,
    closed: bool,
}

impl ConsoleProvider {
    pub fn new() -> Self {
        Self::with_options(ConsoleOptions::default())
    }

    pub fn with_options(options: ConsoleOptions) -> Self {
        Self {
            options,
            closed: false,
        }
    }

    /// Build from a JSON options payload; an empty payload means defaults.
    pub fn from_options(opts: &str) -> Result<Self> {
        if opts.trim().is_empty() {
            return Ok(Self::new());
        }
        let options = serde_json::from_str(opts).map_err(|e| LoggerError::options("console", e))?;
        Ok(Self::with_options(options))
    }

    pub fn options(&self) -> &ConsoleOptions {
        &self.options
    }

    /// Whether records at `level` are also written to stderr.
    pub fn mirrors_to_stderr(&self, level: LogLevel) -> bool {
        level >= self.options.to_stderr_level
    }
}

impl ConsoleProvider {
    fn write_to(
        &self,
        out: &mut impl Write,
        err: &mut impl Write,
        level: LogLevel,
        record: &str,
    ) -> Result<()> {
        let colored_record;
        let output = if self.options.colored {
            colored_record = record.color(level.color_code()).to_string();
            colored_record.as_str()
        } else {
            record
        };

        writeln!(out, "{}", output)?;
        if self.mirrors_to_stderr(level) {
            writeln!(err, "{}", output)?;
        }
        Ok(())
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ConsoleProvider {
    fn write(&mut self, level: LogLevel, record: &str) -> Result<()> {
        if self.closed {
            return Err(LoggerError::ProviderClosed("console".to_string()));
        }

        self.write_to(
            &mut std::io::stdout().lock(),
            &mut std::io::stderr().lock(),
            level,
            record,
        )
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.flush()
    }

    fn name(&self) -> &str {
        "console"
    }
}

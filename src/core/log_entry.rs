//! Log record structure and its one-line rendering

use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub file: &'static str,
    pub line: u32,
}

impl LogEntry {
    /// Escape line breaks and tabs so one record always stays on one line.
    fn sanitize_message(message: String) -> String {
        if !message.contains(['\n', '\r', '\t']) {
            return message;
        }
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: String, location: &'static Location<'static>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message),
            timestamp: Utc::now(),
            file: location.file(),
            line: location.line(),
        }
    }

    /// Build a record from format arguments.
    ///
    /// A `Display` impl that errors part-way would make `fmt::format` panic, so
    /// rendering goes through `fmt::Write` and keeps whatever was produced.
    pub fn from_args(
        level: LogLevel,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) -> Self {
        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => {
                let mut buf = String::new();
                if fmt::write(&mut buf, args).is_err() {
                    buf.push_str("<format error>");
                }
                buf
            }
        };
        Self::new(level, message, location)
    }

    /// File name of the call site without its directories.
    pub fn short_file(&self) -> &'static str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }

    /// `[<timestamp>] [<LEVEL>] [<file>:<line>] <message>`
    pub fn render(&self, timestamp_format: &TimestampFormat) -> String {
        format!(
            "[{}] [{:5}] [{}:{}] {}",
            timestamp_format.format(&self.timestamp),
            self.level,
            self.short_file(),
            self.line,
            self.message
        )
    }
}

//! Log level definitions

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// Variants are ordered from least to most severe, so `Fatal` compares
/// greatest. A record passes a logger's threshold when `level >= threshold`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// All levels, least severe first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Level for a numeric severity rank, most severe first: `0` is FATAL,
    /// `5` is TRACE.
    pub fn from_severity_rank(rank: u64) -> Option<LogLevel> {
        let rank = usize::try_from(rank).ok()?;
        LogLevel::ALL.iter().rev().nth(rank).copied()
    }

    /// Whether a record at `self` passes a logger whose threshold is `threshold`.
    #[inline]
    pub fn passes(self, threshold: LogLevel) -> bool {
        self >= threshold
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = crate::core::LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .iter()
            .copied()
            .find(|level| level.to_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::core::LoggerError::InvalidLevel(s.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Name(String),
    Rank(u64),
}

/// Reads a level name in any case, or a severity rank as produced by
/// configuration tools that store levels as integers.
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LevelRepr::deserialize(deserializer)? {
            LevelRepr::Name(text) => text.parse().map_err(serde::de::Error::custom),
            LevelRepr::Rank(rank) => LogLevel::from_severity_rank(rank).ok_or_else(|| {
                serde::de::Error::custom(format!("Invalid log level rank: {}", rank))
            }),
        }
    }
}

/// Case-insensitive lookup of a level name; `None` when nothing matches.
pub fn parse_level(text: &str) -> Option<LogLevel> {
    text.parse().ok()
}

/// Like [`parse_level`], but panics on unknown names.
///
/// Meant for startup configuration, where a bad level name is a deployment
/// error that should not silently fall back to a default.
///
/// # Panics
///
/// Panics when `text` is not one of the level names.
#[track_caller]
pub fn must_parse_level(text: &str) -> LogLevel {
    match text.parse() {
        Ok(level) => level,
        Err(e) => panic!("{}", e),
    }
}

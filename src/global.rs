//! Process-wide logger handle
//!
//! [`LoggerHandle`] is a hot-swappable reference to the active [`Logger`].
//! Applications that want explicit plumbing can own one; the free functions
//! in this module operate on a single process-wide handle which starts out
//! pointing at [`Logger::standard`], so logging before initialization goes
//! to the console instead of nowhere.
//!
//! ```no_run
//! use provider_log::{global, LogLevel};
//!
//! fn main() -> provider_log::Result<()> {
//!     global::init_file_and_console("logs/app.log", LogLevel::Error)?;
//!     provider_log::info!("listening on port {}", 8080);
//!     global::uninit();
//!     Ok(())
//! }
//! ```

use crate::core::{
    build_provider, LogLevel, Logger, Provider, ProviderRegistry, Result, CONSOLE_PROVIDER,
    FILE_PROVIDER,
};
use crate::providers::{ConsoleProvider, FileOptions, FileProvider, MixProvider};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub struct LoggerHandle {
    current: RwLock<Arc<Logger>>,
}

impl LoggerHandle {
    /// Start `logger` and point a new handle at it.
    pub fn new(logger: Logger) -> Self {
        logger.run();
        Self {
            current: RwLock::new(Arc::new(logger)),
        }
    }

    /// A handle pointing at [`Logger::standard`].
    pub fn standard() -> Self {
        Self::new(Logger::standard())
    }

    /// The logger currently installed
    pub fn current(&self) -> Arc<Logger> {
        Arc::clone(&self.current.read())
    }

    /// Build a provider of `provider_type` through the process-wide registry
    /// and install it.
    pub fn init(&self, provider_type: &str, options: &str) -> Result<()> {
        let provider = build_provider(provider_type, options)?;
        self.init_with_provider(provider)
    }

    /// Like [`init`](Self::init) but resolving through `registry`.
    pub fn init_from(
        &self,
        registry: &ProviderRegistry,
        provider_type: &str,
        options: &str,
    ) -> Result<()> {
        let provider = registry.build(provider_type, options)?;
        self.init_with_provider(provider)
    }

    /// Wrap `provider` in a synchronous logger at INFO and install it.
    pub fn init_with_provider(&self, provider: Box<dyn Provider>) -> Result<()> {
        let logger = Logger::new(provider);
        logger.set_level(LogLevel::Info);
        self.init_with_logger(logger)
    }

    /// Start `logger` and install it.
    ///
    /// The previously installed logger is quit once the swap is done, so
    /// records it had accepted are delivered before its provider is closed.
    pub fn init_with_logger(&self, logger: Logger) -> Result<()> {
        logger.run();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(logger));
        previous.quit();
        Ok(())
    }

    /// Quit the installed logger. Later records are dropped until the next
    /// `init*` call.
    pub fn uninit(&self) {
        self.current().quit();
    }

    pub fn level(&self) -> LogLevel {
        self.current.read().level()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.current.read().set_level(level);
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.current().log(level, args);
    }
}

impl Default for LoggerHandle {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("current", &*self.current.read())
            .finish()
    }
}

static GLOBAL_LOGGER: Lazy<LoggerHandle> = Lazy::new(LoggerHandle::standard);

/// The process-wide handle
pub fn handle() -> &'static LoggerHandle {
    &GLOBAL_LOGGER
}

/// The logger currently installed in the process-wide handle
pub fn logger() -> Arc<Logger> {
    GLOBAL_LOGGER.current()
}

/// Initialize the global logger with a registered provider type.
///
/// `options` is handed to the provider factory unchanged (JSON for the
/// built-in `console` and `file` providers; empty means defaults).
pub fn init(provider_type: &str, options: &str) -> Result<()> {
    GLOBAL_LOGGER.init(provider_type, options)
}

pub fn init_with_provider(provider: Box<dyn Provider>) -> Result<()> {
    GLOBAL_LOGGER.init_with_provider(provider)
}

pub fn init_with_logger(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER.init_with_logger(logger)
}

/// Log to the file at `fullpath`.
pub fn init_file(fullpath: impl AsRef<Path>) -> Result<()> {
    init(FILE_PROVIDER, &file_options(fullpath))
}

/// Log to the console, mirroring records at or above `to_stderr_level` to stderr.
pub fn init_console(to_stderr_level: LogLevel) -> Result<()> {
    init(CONSOLE_PROVIDER, &console_options(to_stderr_level))
}

/// Log to both the file at `fullpath` and the console.
pub fn init_file_and_console(
    fullpath: impl AsRef<Path>,
    to_stderr_level: LogLevel,
) -> Result<()> {
    let provider = MixProvider::new()
        .with(FileProvider::from_options(&file_options(fullpath))?)
        .with(ConsoleProvider::from_options(&console_options(to_stderr_level))?);
    init_with_provider(Box::new(provider))
}

pub fn uninit() {
    GLOBAL_LOGGER.uninit();
}

/// `file` provider options for a full path, e.g. `{"dir":"logs","filename":"app.log"}`
pub fn file_options(fullpath: impl AsRef<Path>) -> String {
    let options = FileOptions::from_path(fullpath);
    serde_json::json!({
        "dir": options.dir.to_string_lossy(),
        "filename": options.filename,
    })
    .to_string()
}

/// `console` provider options, e.g. `{"tostderrlevel":"ERROR"}`.
///
/// The level is written by name; the console provider also reads a numeric
/// severity rank in its place.
pub fn console_options(to_stderr_level: LogLevel) -> String {
    serde_json::json!({ "tostderrlevel": to_stderr_level }).to_string()
}

pub fn level() -> LogLevel {
    GLOBAL_LOGGER.level()
}

pub fn set_level(level: LogLevel) {
    GLOBAL_LOGGER.set_level(level);
}

#[track_caller]
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(level, args);
}

#[track_caller]
pub fn trace(args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(LogLevel::Trace, args);
}

#[track_caller]
pub fn debug(args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(LogLevel::Debug, args);
}

#[track_caller]
pub fn info(args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(LogLevel::Info, args);
}

#[track_caller]
pub fn warn(args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(LogLevel::Warn, args);
}

#[track_caller]
pub fn error(args: fmt::Arguments<'_>) {
    GLOBAL_LOGGER.log(LogLevel::Error, args);
}

/// Log at FATAL, shut the global logger down and exit the process.
#[track_caller]
pub fn fatal(args: fmt::Arguments<'_>) -> ! {
    GLOBAL_LOGGER.current().fatal(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerError, LoggerState};
    use crate::providers::MemoryProvider;

    fn memory_registry() -> (ProviderRegistry, MemoryProvider, MemoryProvider) {
        let first = MemoryProvider::new();
        let second = MemoryProvider::new();
        let mut registry = ProviderRegistry::new();
        let a = first.clone();
        registry.register("first", move |_| Ok(Box::new(a.clone()) as Box<dyn Provider>));
        let b = second.clone();
        registry.register("second", move |_| Ok(Box::new(b.clone()) as Box<dyn Provider>));
        (registry, first, second)
    }

    #[test]
    fn test_reinit_routes_to_new_provider() {
        let (registry, first, second) = memory_registry();
        let handle = LoggerHandle::new(Logger::new(Box::new(MemoryProvider::new())));

        handle.init_from(&registry, "first", "").unwrap();
        handle.log(LogLevel::Info, format_args!("one"));
        handle.init_from(&registry, "second", "").unwrap();
        handle.log(LogLevel::Info, format_args!("two"));

        assert_eq!(first.len(), 1);
        assert!(first.lines()[0].ends_with("one"));
        assert!(first.is_closed());
        assert_eq!(second.len(), 1);
        assert!(second.lines()[0].ends_with("two"));
    }

    #[test]
    fn test_init_unknown_type_keeps_current_logger() {
        let (registry, first, _second) = memory_registry();
        let handle = LoggerHandle::new(Logger::new(Box::new(first.clone())));

        let err = handle.init_from(&registry, "nonexistent", "").unwrap_err();
        assert!(matches!(err, LoggerError::UnsupportedProvider(_)));
        assert!(err.to_string().contains("nonexistent"));

        handle.log(LogLevel::Warn, format_args!("still here"));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_init_with_provider_defaults_to_info() {
        let memory = MemoryProvider::new();
        let handle = LoggerHandle::new(Logger::new(Box::new(MemoryProvider::new())));
        handle.init_with_provider(Box::new(memory.clone())).unwrap();

        assert_eq!(handle.level(), LogLevel::Info);
        assert_eq!(handle.current().state(), LoggerState::Running);

        handle.log(LogLevel::Debug, format_args!("hidden"));
        handle.set_level(LogLevel::Debug);
        handle.log(LogLevel::Debug, format_args!("shown"));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_uninit_stops_delivery() {
        let memory = MemoryProvider::new();
        let handle = LoggerHandle::new(Logger::new(Box::new(memory.clone())));

        handle.log(LogLevel::Info, format_args!("kept"));
        handle.uninit();
        handle.uninit();
        handle.log(LogLevel::Info, format_args!("dropped"));

        assert_eq!(memory.len(), 1);
        assert_eq!(memory.close_count(), 1);
        assert_eq!(handle.current().state(), LoggerState::Stopped);
    }

    #[test]
    fn test_option_payloads() {
        assert_eq!(
            file_options("logs/app.log"),
            r#"{"dir":"logs","filename":"app.log"}"#
        );
        assert_eq!(file_options("app.log"), r#"{"dir":".","filename":"app.log"}"#);
        assert_eq!(console_options(LogLevel::Warn), r#"{"tostderrlevel":"WARN"}"#);
    }
}

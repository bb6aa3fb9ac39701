//! # Provider Log
//!
//! A process-wide logging facade. Application code emits leveled records
//! through one point, while the destination is chosen at initialization by
//! provider type name and an options payload.
//!
//! ## Features
//!
//! - **Pluggable Providers**: console and file out of the box, any type can
//!   be registered by name
//! - **Composition**: [`MixProvider`] fans each record out to several providers
//! - **Lifecycle**: loggers run synchronously or through a worker thread and
//!   drain every accepted record on `quit`
//! - **Global Handle**: hot-swappable process-wide logger behind the
//!   [`global`] functions and the logging macros
//!
//! ```
//! use provider_log::{global, LogLevel};
//!
//! global::init_console(LogLevel::Error).unwrap();
//! global::set_level(LogLevel::Debug);
//! provider_log::debug!("cache warmed with {} entries", 128);
//! global::uninit();
//! ```

pub mod core;
pub mod global;
pub mod macros;
pub mod providers;

pub mod prelude {
    pub use crate::core::{
        must_parse_level, parse_level, LogLevel, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, LoggerState, OverflowPolicy, Provider, ProviderRegistry, Result,
        TimestampFormat,
    };
    pub use crate::global::LoggerHandle;
    pub use crate::providers::{ConsoleProvider, FileProvider, MemoryProvider, MixProvider};
}

pub use crate::core::{
    build_provider, global_registry, lookup_provider, must_parse_level, parse_level,
    register_provider, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    LoggerState, OverflowPolicy, Provider, ProviderFactory, ProviderRegistry, Result,
    TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT, FATAL_EXIT_CODE,
};
pub use global::LoggerHandle;
pub use providers::{
    ConsoleOptions, ConsoleProvider, FileOptions, FileProvider, MemoryProvider, MixProvider,
};

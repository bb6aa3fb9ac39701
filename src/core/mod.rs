//! Core logger types and traits

pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod provider;
pub mod registry;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::{must_parse_level, parse_level, LogLevel};
pub use logger::{
    Logger, LoggerBuilder, LoggerState, OverflowPolicy, DEFAULT_SHUTDOWN_TIMEOUT,
    FATAL_EXIT_CODE,
};
pub use metrics::LoggerMetrics;
pub use provider::Provider;
pub use registry::{
    build_provider, global_registry, lookup_provider, register_provider, ProviderFactory,
    ProviderRegistry, CONSOLE_PROVIDER, FILE_PROVIDER,
};
pub use timestamp::TimestampFormat;

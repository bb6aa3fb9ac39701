//! Logging macros for ergonomic log message formatting.
//!
//! Every macro has two forms. With a leading format string literal it logs
//! through the process-wide handle; with a leading logger expression it logs
//! through that logger. Arguments are only formatted when the record passes
//! the logger's level.
//!
//! # Examples
//!
//! ```
//! use provider_log::prelude::*;
//! use provider_log::info;
//!
//! let memory = MemoryProvider::new();
//! let logger = Logger::new(Box::new(memory.clone()));
//!
//! // Explicit logger
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! assert_eq!(memory.len(), 1);
//!
//! // Process-wide logger
//! info!("Server listening on port {}", port);
//! ```

/// Log a message at a runtime-selected level.
///
/// ```
/// # use provider_log::prelude::*;
/// # let logger = Logger::new(Box::new(MemoryProvider::new()));
/// use provider_log::log;
/// log!(LogLevel::Info, "through the global logger");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $fmt:literal $($arg:tt)*) => {
        $crate::global::log($level, format_args!($fmt $($arg)*))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// ```
/// # use provider_log::prelude::*;
/// # let logger = Logger::new(Box::new(MemoryProvider::new()));
/// # logger.set_level(LogLevel::Trace);
/// use provider_log::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::trace(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.trace(format_args!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::debug(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(format_args!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::info(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format_args!($($arg)+))
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::warn(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// ```
/// # use provider_log::prelude::*;
/// # let logger = Logger::new(Box::new(MemoryProvider::new()));
/// use provider_log::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::error(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(format_args!($($arg)+))
    };
}

/// Log a fatal-level message, then terminate the process.
///
/// ```no_run
/// use provider_log::fatal;
/// fatal!("Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($fmt:literal $($arg:tt)*) => {
        $crate::global::fatal(format_args!($fmt $($arg)*))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format_args!($($arg)+))
    };
}

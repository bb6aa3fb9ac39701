//! Main logger implementation
//!
//! A [`Logger`] owns exactly one [`Provider`] (use a
//! [`MixProvider`](crate::providers::MixProvider) to feed several) and a
//! threshold level. It moves strictly forward through
//! `Constructed -> Running -> Stopped`.

use super::{
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    provider::Provider,
    timestamp::TimestampFormat,
};
use crate::providers::ConsoleProvider;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{self, AssertUnwindSafe, Location};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time `quit()` waits for the async worker to drain (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Exit status used after a fatal record has been delivered
pub const FATAL_EXIT_CODE: i32 = 1;

const BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    Constructed,
    Running,
    Stopped,
}

/// What an async logger does when its queue is full.
///
/// ERROR and FATAL records always wait for room regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Wait for the worker to make room
    #[default]
    Block,

    /// Discard the new record, count it and alert on stderr
    DropNewest,
}

type Record = (LogLevel, String);

/// State shared with the delivery worker
struct Shared {
    provider: Mutex<Option<Box<dyn Provider>>>,
    provider_name: String,
    metrics: LoggerMetrics,
}

impl Shared {
    /// Hand one record to the provider, isolating errors and panics.
    fn deliver(&self, provider: &mut Option<Box<dyn Provider>>, level: LogLevel, line: &str) {
        let Some(provider) = provider.as_mut() else {
            self.metrics.record_dropped();
            return;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| provider.write(level, line))) {
            Ok(Ok(())) => {
                self.metrics.record_delivered();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Provider '{}' failed: {}", self.provider_name, e);
                self.metrics.record_provider_error();
                if reached_some_provider(&e) {
                    self.metrics.record_delivered();
                } else {
                    self.metrics.record_dropped();
                }
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Provider '{}' panicked: {}",
                    self.provider_name,
                    panic_message(panic_info.as_ref())
                );
                self.metrics.record_provider_error();
                self.metrics.record_dropped();
            }
        }
    }

    /// Synchronous path: write and flush so nothing sits in a provider buffer.
    fn deliver_one(&self, level: LogLevel, line: &str) {
        let mut provider = self.provider.lock();
        self.deliver(&mut provider, level, line);
        self.flush_provider(&mut provider);
    }

    fn flush_provider(&self, provider: &mut Option<Box<dyn Provider>>) {
        if let Some(provider) = provider.as_mut() {
            match panic::catch_unwind(AssertUnwindSafe(|| provider.flush())) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Provider '{}' flush failed: {}", self.provider_name, e);
                    self.metrics.record_provider_error();
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Provider '{}' panicked during flush: {}",
                        self.provider_name,
                        panic_message(panic_info.as_ref())
                    );
                    self.metrics.record_provider_error();
                }
            }
        }
    }

    /// Drain the queue until every sender is gone.
    fn run_worker(&self, receiver: Receiver<Record>) {
        let mut batch: Vec<Record> = Vec::with_capacity(BATCH_SIZE);

        while let Ok(record) = receiver.recv() {
            batch.push(record);
            while batch.len() < BATCH_SIZE {
                match receiver.try_recv() {
                    Ok(record) => batch.push(record),
                    Err(_) => break,
                }
            }

            let mut provider = self.provider.lock();
            for (level, line) in batch.drain(..) {
                self.deliver(&mut provider, level, &line);
            }
            self.flush_provider(&mut provider);
        }
    }
}

/// A mix that failed on only some children still delivered the record.
fn reached_some_provider(error: &LoggerError) -> bool {
    matches!(error, LoggerError::MixProvider { total, failures } if failures.len() < *total)
}

pub(crate) fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

pub struct Logger {
    level: RwLock<LogLevel>,
    shared: Arc<Shared>,
    state: Mutex<LoggerState>,
    timestamp_format: TimestampFormat,
    async_buffer: Option<usize>,
    overflow_policy: OverflowPolicy,
    shutdown_timeout: Duration,
    sender: RwLock<Option<Sender<Record>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Logger {
    /// Wrap `provider` in a synchronous logger at level INFO.
    ///
    /// The logger is `Constructed`; call [`run`](Self::run) to start it.
    #[must_use]
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self::from_parts(
            provider,
            LogLevel::Info,
            TimestampFormat::default(),
            None,
            OverflowPolicy::default(),
            DEFAULT_SHUTDOWN_TIMEOUT,
        )
    }

    /// A running console logger at level INFO.
    ///
    /// This is what the global handle points at before any initialization.
    #[must_use]
    pub fn standard() -> Self {
        let logger = Self::new(Box::new(ConsoleProvider::new()));
        logger.run();
        logger
    }

    fn from_parts(
        provider: Box<dyn Provider>,
        level: LogLevel,
        timestamp_format: TimestampFormat,
        async_buffer: Option<usize>,
        overflow_policy: OverflowPolicy,
        shutdown_timeout: Duration,
    ) -> Self {
        let provider_name = provider.name().to_string();
        Self {
            level: RwLock::new(level),
            shared: Arc::new(Shared {
                provider: Mutex::new(Some(provider)),
                provider_name,
                metrics: LoggerMetrics::new(),
            }),
            state: Mutex::new(LoggerState::Constructed),
            timestamp_format,
            async_buffer,
            overflow_policy,
            shutdown_timeout,
            sender: RwLock::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use provider_log::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Debug)
    ///     .provider(MemoryProvider::new())
    ///     .async_mode(1000)
    ///     .build();
    /// logger.run();
    /// logger.quit();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: LogLevel) {
        *self.level.write() = level;
    }

    pub fn level(&self) -> LogLevel {
        *self.level.read()
    }

    /// Whether a record at `level` would currently be delivered.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level.passes(self.level())
    }

    pub fn state(&self) -> LoggerState {
        *self.state.lock()
    }

    pub fn provider_name(&self) -> &str {
        &self.shared.provider_name
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Start the logger. For async loggers this spawns the delivery worker.
    ///
    /// Does nothing unless the logger is still `Constructed`.
    pub fn run(&self) {
        let mut state = self.state.lock();
        if *state != LoggerState::Constructed {
            return;
        }

        if let Some(buffer_size) = self.async_buffer {
            let (sender, receiver) = bounded(buffer_size.max(1));
            let shared = Arc::clone(&self.shared);
            let spawned = thread::Builder::new()
                .name("provider-log-worker".to_string())
                .spawn(move || shared.run_worker(receiver));

            match spawned {
                Ok(handle) => {
                    *self.worker.lock() = Some(handle);
                    *self.sender.write() = Some(sender);
                }
                Err(e) => {
                    eprintln!(
                        "[LOGGER WARNING] Failed to spawn async worker, delivering synchronously: {}",
                        e
                    );
                }
            }
        }

        *state = LoggerState::Running;
    }

    /// Emit a record at `level`.
    ///
    /// Below-threshold records are discarded before `args` is formatted. A
    /// FATAL record is delivered, the logger is shut down, and the process
    /// exits with [`FATAL_EXIT_CODE`].
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry::from_args(level, args, Location::caller());
        self.dispatch(level, entry.render(&self.timestamp_format));

        if level == LogLevel::Fatal {
            self.quit();
            std::process::exit(FATAL_EXIT_CODE);
        }
    }

    fn dispatch(&self, level: LogLevel, line: String) {
        let guard = self.sender.read();
        let Some(sender) = &*guard else {
            drop(guard);
            self.shared.deliver_one(level, &line);
            return;
        };

        match sender.try_send((level, line)) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => self.handle_overflow(sender, record),
            Err(TrySendError::Disconnected((level, line))) => {
                // Worker is gone; fall back to writing on this thread.
                drop(guard);
                self.shared.deliver_one(level, &line);
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<Record>, record: Record) {
        self.shared.metrics.record_queue_full();

        if self.overflow_policy == OverflowPolicy::Block || record.0 >= LogLevel::Error {
            if let Err(e) = sender.send(record) {
                let (level, line) = e.into_inner();
                self.shared.deliver_one(level, &line);
            }
            return;
        }

        let dropped = self.shared.metrics.record_dropped();
        if dropped == 0 || (dropped + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue full, {} records dropped. \
                 Consider increasing the buffer size or using OverflowPolicy::Block.",
                dropped + 1
            );
        }
    }

    /// Flush the provider.
    ///
    /// Records still queued for the async worker are not included; they are
    /// flushed by the worker after each batch and by [`quit`](Self::quit).
    pub fn flush(&self) -> Result<()> {
        let mut provider = self.shared.provider.lock();
        match provider.as_mut() {
            Some(provider) => provider.flush(),
            None => Err(LoggerError::LoggerStopped),
        }
    }

    /// Stop the logger, delivering every queued record, then flush and close
    /// the provider. Calling it again is a no-op.
    pub fn quit(&self) {
        self.shutdown(self.shutdown_timeout);
    }

    /// Like [`quit`](Self::quit) with an explicit drain timeout.
    ///
    /// Returns `false` when the worker did not finish in time or the provider
    /// failed to close. The provider is released either way.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        if *state == LoggerState::Stopped {
            return true;
        }
        *state = LoggerState::Stopped;

        // Waits for in-flight sends, then closing the channel lets the worker
        // drain and exit.
        drop(self.sender.write().take());

        let mut clean = true;
        if let Some(handle) = self.worker.lock().take() {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Async worker panicked during shutdown: {}",
                            panic_message(e.as_ref())
                        );
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Async worker did not finish within {:?}. \
                         Some records may be lost.",
                        timeout
                    );
                    clean = false;
                    break;
                }

                thread::sleep(Duration::from_millis(5));
            }
        }

        let provider = self.shared.provider.lock().take();
        if let Some(mut provider) = provider {
            if let Err(e) = provider.close() {
                eprintln!(
                    "[LOGGER ERROR] Failed to close provider '{}': {}",
                    self.shared.provider_name, e
                );
                self.shared.metrics.record_provider_error();
                clean = false;
            }
        }

        let dropped = self.shared.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger stopped with {} dropped records (drop rate: {:.2}%)",
                dropped,
                self.shared.metrics.drop_rate()
            );
        }

        clean
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }

    /// Emit a FATAL record and terminate the process.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, args: fmt::Arguments<'_>) -> ! {
        self.log(LogLevel::Fatal, args);
        // Only reachable if the record was filtered, which FATAL never is.
        std::process::exit(FATAL_EXIT_CODE)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("state", &self.state())
            .field("provider", &self.shared.provider_name)
            .field("async_buffer", &self.async_buffer)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.quit();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use provider_log::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Warn)
///     .provider(ConsoleProvider::new())
///     .async_mode(256)
///     .overflow_policy(OverflowPolicy::DropNewest)
///     .build();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    provider: Option<Box<dyn Provider>>,
    async_buffer: Option<usize>,
    overflow_policy: OverflowPolicy,
    timestamp_format: TimestampFormat,
    shutdown_timeout: Duration,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            provider: None,
            async_buffer: None,
            overflow_policy: OverflowPolicy::default(),
            timestamp_format: TimestampFormat::default(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the provider. Defaults to a [`ConsoleProvider`].
    #[must_use = "builder methods return a new value"]
    pub fn provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_provider(mut self, provider: Box<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Deliver records through a bounded queue of `buffer_size` drained by a
    /// worker thread. Without this the logger writes on the calling thread.
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, buffer_size: usize) -> Self {
        self.async_buffer = Some(buffer_size);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// Build the Logger. It still needs [`Logger::run`].
    pub fn build(self) -> Logger {
        let provider = self
            .provider
            .unwrap_or_else(|| Box::new(ConsoleProvider::new()));
        Logger::from_parts(
            provider,
            self.level,
            self.timestamp_format,
            self.async_buffer,
            self.overflow_policy,
            self.shutdown_timeout,
        )
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

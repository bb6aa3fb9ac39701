//! Provider trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// A sink that receives fully rendered records.
///
/// Implementations are driven through a lock held by the owning logger, so
/// they never see concurrent calls. `write` should return quickly; sinks
/// backed by slow devices are expected to buffer and let `flush` do the
/// expensive part. `close` must be safe to call more than once.
pub trait Provider: Send {
    /// Deliver one record. `record` is a single line without a trailing newline.
    fn write(&mut self, level: LogLevel, record: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()>;

    /// Flush and release underlying resources.
    fn close(&mut self) -> Result<()>;

    fn name(&self) -> &str;
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn write(&mut self, level: LogLevel, record: &str) -> Result<()> {
        (**self).write(level, record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

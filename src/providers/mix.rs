//! Composite provider fanning every record out to several children

use crate::core::logger::panic_message;
use crate::core::{LogLevel, LoggerError, Provider, Result};
use std::panic::{self, AssertUnwindSafe};

/// Applies each operation to every child, in the order they were given.
///
/// A failing (or panicking) child does not stop delivery to the children
/// after it; the failures are collected into [`LoggerError::MixProvider`].
///
/// # Example
///
/// ```
/// use provider_log::prelude::*;
///
/// let first = MemoryProvider::new();
/// let second = MemoryProvider::new();
/// let mut mix = MixProvider::new()
///     .with(first.clone())
///     .with(second.clone());
///
/// mix.write(LogLevel::Info, "hello").unwrap();
/// assert_eq!(first.lines(), vec!["hello"]);
/// assert_eq!(second.lines(), vec!["hello"]);
/// ```
#[derive(Default)]
pub struct MixProvider {
    providers: Vec<Box<dyn Provider>>,
}

impl MixProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_providers(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers }
    }

    #[must_use]
    pub fn with<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: Box<dyn Provider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Child names in delivery order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn for_each_child<F>(&mut self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut dyn Provider) -> Result<()>,
    {
        let total = self.providers.len();
        let mut failures = Vec::new();

        for (idx, provider) in self.providers.iter_mut().enumerate() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| op(provider.as_mut())));
            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(panic_info) => LoggerError::other(format!(
                    "panicked: {}",
                    panic_message(panic_info.as_ref())
                )),
            };
            failures.push(LoggerError::child(idx, provider.name(), error));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoggerError::MixProvider { total, failures })
        }
    }
}

impl Provider for MixProvider {
    fn write(&mut self, level: LogLevel, record: &str) -> Result<()> {
        self.for_each_child(|p| p.write(level, record))
    }

    fn flush(&mut self) -> Result<()> {
        self.for_each_child(|p| p.flush())
    }

    fn close(&mut self) -> Result<()> {
        self.for_each_child(|p| p.close())
    }

    fn name(&self) -> &str {
        "mix"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MemoryProvider;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Failing;

    impl Provider for Failing {
        fn write(&mut self, _level: LogLevel, _record: &str) -> Result<()> {
            Err(LoggerError::other("disk full"))
        }
        fn flush(&mut self) -> Result<()> {
            Err(LoggerError::other("flush failed"))
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Appends its tag to a shared journal on every write.
    struct Journal {
        tag: &'static str,
        journal: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Provider for Journal {
        fn write(&mut self, _level: LogLevel, _record: &str) -> Result<()> {
            self.journal.lock().push(self.tag);
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn close(&mut self) -> Result<()> {
            Ok(())
        }
        fn name(&self) -> &str {
            self.tag
        }
    }

    #[test]
    fn test_one_write_reaches_each_child_once() {
        let first = MemoryProvider::new();
        let second = MemoryProvider::new();
        let mut mix = MixProvider::new().with(first.clone()).with(second.clone());

        mix.write(LogLevel::Warn, "record").unwrap();

        assert_eq!(first.records(), vec![(LogLevel::Warn, "record".to_string())]);
        assert_eq!(second.records(), vec![(LogLevel::Warn, "record".to_string())]);
    }

    #[test]
    fn test_children_called_in_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let mut mix = MixProvider::new()
            .with(Journal { tag: "a", journal: Arc::clone(&journal) })
            .with(Journal { tag: "b", journal: Arc::clone(&journal) })
            .with(Journal { tag: "c", journal: Arc::clone(&journal) });

        mix.write(LogLevel::Info, "x").unwrap();
        assert_eq!(*journal.lock(), vec!["a", "b", "c"]);
        assert_eq!(mix.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failing_child_does_not_block_siblings() {
        let before = MemoryProvider::new();
        let after = MemoryProvider::new();
        let mut mix = MixProvider::new()
            .with(before.clone())
            .with(Failing)
            .with(after.clone());

        let err = mix.write(LogLevel::Error, "still delivered").unwrap_err();
        match err {
            LoggerError::MixProvider { total, failures } => {
                assert_eq!(total, 3);
                assert_eq!(failures.len(), 1);
                assert!(failures[0].to_string().contains("Provider #1 (failing)"));
            }
            other => panic!("unexpected error: {}", other),
        }

        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_panicking_child_is_isolated() {
        struct Panicking;
        impl Provider for Panicking {
            fn write(&mut self, _level: LogLevel, _record: &str) -> Result<()> {
                panic!("sink exploded");
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn close(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "panicking"
            }
        }

        let after = MemoryProvider::new();
        let mut mix = MixProvider::new().with(Panicking).with(after.clone());

        let err = mix.write(LogLevel::Info, "x").unwrap_err();
        assert!(err.to_string().contains("sink exploded"));
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn test_flush_and_close_reach_all_children() {
        let first = MemoryProvider::new();
        let second = MemoryProvider::new();
        let mut mix = MixProvider::from_providers(vec![
            Box::new(first.clone()),
            Box::new(Failing),
            Box::new(second.clone()),
        ]);

        assert!(mix.flush().is_err());
        mix.close().unwrap();
        mix.close().unwrap();

        assert_eq!(first.flush_count(), 1);
        assert_eq!(second.flush_count(), 1);
        assert!(first.is_closed());
        assert!(second.is_closed());
    }

    #[test]
    fn test_empty_mix_is_a_no_op() {
        let mut mix = MixProvider::new();
        assert!(mix.is_empty());
        mix.write(LogLevel::Info, "nowhere").unwrap();
        mix.close().unwrap();
    }
}

//! In-memory provider capturing records for inspection

use crate::core::{LogLevel, LoggerError, Provider, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<(LogLevel, String)>,
    flushes: usize,
    closes: usize,
    closed: bool,
}

/// Keeps every record in a shared buffer.
///
/// Clones share the same buffer, so a clone kept by the caller observes what
/// the logger wrote through the original.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.state.lock().records.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.state
            .lock()
            .records
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    pub fn clear(&self) {
        self.state.lock().records.clear();
    }

    pub fn flush_count(&self) -> usize {
        self.state.lock().flushes
    }

    /// Number of `close` calls received, including repeated ones
    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Provider for MemoryProvider {
    fn write(&mut self, level: LogLevel, record: &str) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(LoggerError::ProviderClosed("memory".to_string()));
        }
        state.records.push((level, record.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.state.lock().flushes += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.closes += 1;
        state.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

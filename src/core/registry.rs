//! Provider registry: maps a provider type name to the factory that builds it
//!
//! Factories receive the provider's options payload untouched; the registry
//! never looks inside it.

use super::{
    error::{LoggerError, Result},
    provider::Provider,
};
use crate::providers::{ConsoleProvider, FileProvider};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a provider from its options payload.
pub type ProviderFactory = Arc<dyn Fn(&str) -> Result<Box<dyn Provider>> + Send + Sync>;

/// Name of the built-in console provider type
pub const CONSOLE_PROVIDER: &str = "console";
/// Name of the built-in file provider type
pub const FILE_PROVIDER: &str = "file";

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: HashMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `console` and `file` factories
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(CONSOLE_PROVIDER, |opts| {
            Ok(Box::new(ConsoleProvider::from_options(opts)?) as Box<dyn Provider>)
        });
        registry.register(FILE_PROVIDER, |opts| {
            Ok(Box::new(FileProvider::from_options(opts)?) as Box<dyn Provider>)
        });
        registry
    }

    /// Install the factory for `name`, replacing any previous one.
    ///
    /// Names are case-sensitive.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&str) -> Result<Box<dyn Provider>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn lookup(&self, name: &str) -> Option<ProviderFactory> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Look up `name` and run its factory on `options`.
    pub fn build(&self, name: &str, options: &str) -> Result<Box<dyn Provider>> {
        let factory = self
            .lookup(name)
            .ok_or_else(|| LoggerError::unsupported_provider(name))?;
        factory(options)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("names", &self.names())
            .finish()
    }
}

static GLOBAL_REGISTRY: Lazy<RwLock<ProviderRegistry>> =
    Lazy::new(|| RwLock::new(ProviderRegistry::with_builtins()));

/// Register a factory in the process-wide registry.
///
/// Intended for program startup, before logging is initialized.
pub fn register_provider<F>(name: impl Into<String>, factory: F)
where
    F: Fn(&str) -> Result<Box<dyn Provider>> + Send + Sync + 'static,
{
    GLOBAL_REGISTRY.write().register(name, factory);
}

/// Look up a factory in the process-wide registry.
pub fn lookup_provider(name: &str) -> Option<ProviderFactory> {
    GLOBAL_REGISTRY.read().lookup(name)
}

/// Build a provider through the process-wide registry.
pub fn build_provider(name: &str, options: &str) -> Result<Box<dyn Provider>> {
    // Clone the factory out so a factory may itself touch the registry.
    let factory = lookup_provider(name).ok_or_else(|| LoggerError::unsupported_provider(name))?;
    factory(options)
}

/// Snapshot of the process-wide registry.
pub fn global_registry() -> ProviderRegistry {
    GLOBAL_REGISTRY.read().clone()
}

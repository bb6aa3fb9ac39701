//! Provider implementations

pub mod console;
pub mod file;
pub mod memory;
pub mod mix;

pub use console::{ConsoleOptions, ConsoleProvider};
pub use file::{FileOptions, FileProvider};
pub use memory::MemoryProvider;
pub use mix::MixProvider;

pub use crate::core::Provider;

//! Integration tests for the logging facade
//!
//! These tests verify:
//! - File and composite providers end to end
//! - Log injection prevention
//! - Async delivery and draining on quit
//! - Fatal records are flushed before the process exits

use provider_log::prelude::*;
use provider_log::{info, warn};
use std::fs;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let logger = Logger::new(Box::new(
        FileProvider::new(&log_file).expect("Failed to create provider"),
    ));
    logger.run();

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    info!(logger, "{}", malicious_message);
    logger.quit();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    assert!(content.contains("\\n"));
    assert!(!content.contains("\nERROR [2024-10-17] Fake error injected\n"));

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
}

#[test]
fn test_threshold_against_file_provider() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("threshold.log");

    let logger = Logger::builder()
        .level(LogLevel::Warn)
        .provider(FileProvider::new(&log_file).unwrap())
        .build();
    logger.run();

    info!(logger, "x-info");
    warn!(logger, "x-warn");
    logger.error(format_args!("x-error"));
    logger.quit();

    let content = fs::read_to_string(&log_file).unwrap();
    assert!(!content.contains("x-info"));
    assert!(content.contains("[WARN ]"));
    assert!(content.contains("x-warn"));
    assert!(content.contains("[ERROR]"));
    assert!(content.contains("x-error"));
}

#[test]
fn test_mix_of_file_and_memory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("mix.log");
    let memory = MemoryProvider::new();

    let mix = MixProvider::new()
        .with(FileProvider::new(&log_file).unwrap())
        .with(memory.clone());
    let logger = Logger::new(Box::new(mix));
    logger.run();

    for i in 0..3 {
        info!(logger, "fan out {}", i);
    }
    logger.quit();

    let file_lines: Vec<String> = fs::read_to_string(&log_file)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(file_lines, memory.lines());
    assert_eq!(file_lines.len(), 3);
    assert!(memory.is_closed());
}

#[test]
fn test_async_logging_drains_on_quit() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("async_test.log");

    let logger = Logger::builder()
        .level(LogLevel::Debug)
        .provider(FileProvider::new(&log_file).unwrap())
        .async_mode(16)
        .build();
    logger.run();

    for i in 0..500 {
        logger.debug(format_args!("Message {}", i));
    }
    logger.quit();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 500, "Should have 500 log entries");
    assert!(lines[499].ends_with("Message 499"));
    assert_eq!(logger.metrics().delivered_count(), 500);
    assert_eq!(logger.metrics().dropped_count(), 0);
}

#[test]
fn test_concurrent_logging_preserves_per_thread_order() {
    let memory = MemoryProvider::new();
    let logger = Arc::new(
        Logger::builder()
            .provider(memory.clone())
            .async_mode(64)
            .build(),
    );
    logger.run();

    let mut handles = vec![];
    for thread_id in 0..8 {
        let logger_clone = Arc::clone(&logger);
        handles.push(std::thread::spawn(move || {
            for i in 0..200 {
                info!(logger_clone, "t{} m{}", thread_id, i);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
    logger.quit();

    let lines = memory.lines();
    assert_eq!(lines.len(), 8 * 200);

    for thread_id in 0..8 {
        let prefix = format!("t{} m", thread_id);
        let sequence: Vec<usize> = lines
            .iter()
            .filter_map(|line| line.rsplit_once(&prefix))
            .map(|(_, n)| n.parse().unwrap())
            .collect();
        assert_eq!(sequence, (0..200).collect::<Vec<_>>());
    }
}

#[test]
fn test_custom_timestamp_format() {
    let memory = MemoryProvider::new();
    let logger = Logger::builder()
        .provider(memory.clone())
        .timestamp_format(TimestampFormat::Custom("%Y".to_string()))
        .build();

    info!(logger, "dated");
    let line = &memory.lines()[0];
    let year = &line[1..5];
    assert!(year.chars().all(|c| c.is_ascii_digit()), "unexpected line: {}", line);
    assert_eq!(&line[5..7], "] ");
}

#[test]
fn test_registered_provider_builds_through_registry() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = provider_log::global::file_options(temp_dir.path().join("registry.log"));

    let provider = provider_log::build_provider("file", &options).unwrap();
    assert_eq!(provider.name(), "file");

    let logger = Logger::new(provider);
    info!(logger, "through registry");
    logger.quit();

    let content = fs::read_to_string(temp_dir.path().join("registry.log")).unwrap();
    assert!(content.contains("through registry"));
}

const FATAL_CHILD_ENV: &str = "PROVIDER_LOG_FATAL_CHILD_FILE";

#[test]
fn test_fatal_flushes_then_exits() {
    if let Ok(path) = std::env::var(FATAL_CHILD_ENV) {
        // Child process: buffer records in an async logger, then die.
        let logger = Logger::builder()
            .provider(FileProvider::new(&path).unwrap())
            .async_mode(1024)
            .build();
        logger.run();
        for i in 0..100 {
            info!(logger, "before fatal {}", i);
        }
        logger.fatal(format_args!("giving up"));
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fatal.log");

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["test_fatal_flushes_then_exits", "--exact", "--test-threads=1"])
        .env(FATAL_CHILD_ENV, &log_file)
        .status()
        .expect("Failed to spawn child test process");

    assert_eq!(status.code(), Some(provider_log::FATAL_EXIT_CODE));

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 101);
    assert!(lines[99].ends_with("before fatal 99"));
    assert!(lines[100].contains("[FATAL]"));
    assert!(lines[100].ends_with("giving up"));
}

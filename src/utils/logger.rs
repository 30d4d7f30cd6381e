//! Logger utility for application-wide logging
//!
//! This module provides a custom logger implementation that works alongside
//! the standard log crate, but adds file output capabilities.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata, LevelFilter};

/// Custom logger implementation
pub struct Logger {
    /// File handle for log output; `None` discards report lines
    file: Mutex<Option<File>>,
    /// Most verbose level passed on by the `log` facade
    level: Level,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new(log_file: &str) -> io::Result<Self> {
        let file = File::create(Path::new(log_file))?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level: Level::Info,
        })
    }

    /// A logger without a file, for runs that only log to the console
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
            level: Level::Info,
        }
    }

    /// Raise or lower the level forwarded from the `log` facade
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Logs a message to the log file
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Logs a block of `key: value` lines under a heading
    ///
    /// # Arguments
    ///
    /// * `title` - Heading line
    /// * `items` - Pairs to log, one per line
    pub fn log_section(&self, title: &str, items: &[(&str, String)]) -> io::Result<()> {
        self.log(&format!("{}:", title))?;
        for (key, value) in items {
            self.log(&format!("  {}: {}", key, value))?;
        }
        Ok(())
    }

    /// Install a file logger as the global `log` backend
    ///
    /// The logger is leaked so it lives for the rest of the process; the
    /// returned reference can be handed to commands for report output.
    pub fn init_global_logger(log_file: &str, level: Level) -> io::Result<&'static Logger> {
        let global_logger: &'static Logger = Box::leak(Box::new(Logger::new(log_file)?.with_level(level)));

        if log::set_logger(global_logger).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(global_logger)
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}: {}", record.level(), record.target(), record.args());
            let _ = self.log(&message);

            // Warnings and errors also reach the console
            if record.level() <= Level::Warn {
                eprintln!("{}", message);
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}

/// Filter level for a verbosity flag
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_report_lines() {
        let path = std::env::temp_dir().join(format!("rasterclump_logger_{}.log", std::process::id()));
        let logger = Logger::new(path.to_str().unwrap()).unwrap();
        logger.log("first").unwrap();
        logger.log_section("Summary", &[("clumps", "4".to_string())]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(content, "first\nSummary:\n  clumps: 4\n");
    }

    #[test]
    fn test_disabled_logger_accepts_messages() {
        let logger = Logger::disabled().with_level(Level::Debug);
        assert!(logger.log("dropped").is_ok());
        assert!(Log::enabled(&logger, &Metadata::builder().level(Level::Debug).build()));
        assert!(!Log::enabled(&logger, &Metadata::builder().level(Level::Trace).build()));
    }
}

//! Logger utility for application-wide logging
//!
//! `Logger` journals operation records to a file and is handed to commands
//! by reference. Diagnostic `log` records go through `env_logger`, set up
//! once at startup by [`Logger::init_global_logger`].

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::LevelFilter;

/// Operation journal
pub struct Logger {
    /// File handle for journal output, `None` when journaling is off
    file: Mutex<Option<File>>,
}

impl Logger {
    /// Creates a new logger instance
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the journal file
    ///
    /// # Returns
    ///
    /// A new Logger instance or an error if the file cannot be created
    pub fn new<P: AsRef<Path>>(log_file: P) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
        })
    }

    /// Creates a logger that drops every record
    pub fn disabled() -> Self {
        Logger {
            file: Mutex::new(None),
        }
    }

    /// Appends a message to the journal
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

    /// Static method to initialize the global `log` backend
    ///
    /// `RUST_LOG` takes precedence over `default_level`.
    pub fn init_global_logger(default_level: LevelFilter) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(default_level);
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }

        // Only fails when a logger is already installed
        if builder.try_init().is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
    }
}

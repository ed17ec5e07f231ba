//! Console logger implementation

use super::traits::Logger;

/// A logger that writes to the terminal
///
/// Info goes to stdout so it interleaves with build output; everything else
/// goes to stderr. Hosts that print results on stdout use `stderr_only`.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
    verbose: bool,
    stderr_only: bool,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    /// Create a new console logger with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "[remote-keystore]".to_string(),
            verbose: false,
            stderr_only: false,
        }
    }

    /// Create a console logger with a custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            verbose: false,
            stderr_only: false,
        }
    }

    /// Also print debug messages
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Send info messages to stderr as well
    pub fn stderr_only(mut self) -> Self {
        self.stderr_only = true;
        self
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        if self.verbose {
            eprintln!("{} DEBUG: {}", self.prefix, message);
        }
    }

    fn info(&self, message: &str) {
        if self.stderr_only {
            eprintln!("{} INFO: {}", self.prefix, message);
        } else {
            println!("{} INFO: {}", self.prefix, message);
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("{} WARN: {}", self.prefix, message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} ERROR: {}", self.prefix, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_logger_creation() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.prefix, "[remote-keystore]");
        assert!(!logger.verbose);

        let custom = ConsoleLogger::with_prefix("[gradle]").verbose(true);
        assert_eq!(custom.prefix, "[gradle]");
        assert!(custom.verbose);
        assert!(ConsoleLogger::new().stderr_only().stderr_only);
    }

    #[test]
    fn test_console_logger_logs() {
        // This test just verifies the logger doesn't panic
        let logger = ConsoleLogger::new().verbose(true);
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}

//! Logger that forwards to the opt-in debug log file

use super::file_logger::{self, LogLevel};
use super::traits::Logger;

/// Routes `Logger` calls to the `REMOTE_KEYSTORE_DEBUG` file log
///
/// The engine uses this when the host supplies no logger, so its progress is
/// still recoverable from `log_file_path()` while staying silent on the
/// terminal. Every line is tagged with `module`.
#[derive(Debug, Clone)]
pub struct DebugFileLogger {
    module: String,
}

impl Default for DebugFileLogger {
    fn default() -> Self {
        Self::new("engine")
    }
}

impl DebugFileLogger {
    pub fn new(module: impl Into<String>) -> Self {
        Self { module: module.into() }
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

impl Logger for DebugFileLogger {
    fn debug(&self, message: &str) {
        file_logger::log(LogLevel::Debug, &self.module, message);
    }

    fn info(&self, message: &str) {
        file_logger::log(LogLevel::Info, &self.module, message);
    }

    fn warn(&self, message: &str) {
        file_logger::log(LogLevel::Warn, &self.module, message);
    }

    fn error(&self, message: &str) {
        file_logger::log(LogLevel::Error, &self.module, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::SharedLogger;
    use std::sync::Arc;

    #[test]
    fn test_default_module() {
        assert_eq!(DebugFileLogger::default().module(), "engine");
        assert_eq!(DebugFileLogger::new("gradle").module(), "gradle");
    }

    #[test]
    fn test_usable_as_shared_logger() {
        // Writes nothing unless REMOTE_KEYSTORE_DEBUG is set
        let logger: SharedLogger = Arc::new(DebugFileLogger::default());
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}

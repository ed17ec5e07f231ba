//! Logging abstractions so the host build tool owns presentation

mod traits;
mod debug_file;
mod console;
mod memory;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use debug_file::DebugFileLogger;
pub use console::ConsoleLogger;
pub use memory::MemoryLogger;

pub use file_logger::{
    log, trace, debug, info, warn, error,
    log_file_path, LogLevel,
};

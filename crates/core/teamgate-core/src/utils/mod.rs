//! Utility functions

pub mod logger;

pub use logger::{init_logging, init_logging_with, scrub_message, subscribe_logs, LogEvent};

//! Shared utilities for txwatch.

pub mod logging;

pub use logging::{init_logging, LogFormat, ParseLogFormatError};

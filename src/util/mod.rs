//! Utility modules for stepgate

pub mod logging;

pub use logging::{init_logging, LoggingConfig};

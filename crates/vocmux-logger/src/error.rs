use std::io;
use std::string::String;

use thiserror_no_std::Error;

/// Host-side failures.
///
/// Only [`AppError::LogFileUnavailable`] stops the logger; everything else is
/// logged and the run continues with defaults or missing data.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("config file {path} unavailable: {kind}")]
    ConfigUnavailable { path: String, kind: io::ErrorKind },
    #[error("cannot open log file {path}: {kind}")]
    LogFileUnavailable { path: String, kind: io::ErrorKind },
    #[error("cannot write to log file {path}: {kind}")]
    LogWrite { path: String, kind: io::ErrorKind },
    #[error("cannot open I2C bus {path}: {reason}")]
    BusUnavailable { path: String, reason: String },
    #[error("formatted timestamp exceeds {capacity} bytes")]
    Timestamp { capacity: usize },
}

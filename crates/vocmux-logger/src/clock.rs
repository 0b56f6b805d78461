//! Wall-clock timestamps for rows and file names

use core::fmt::{Display, Write as _};

use chrono::{DateTime, Local, TimeZone};
use vocmux_core::Timestamp;
use vocmux_core::record::TIMESTAMP_CAPACITY;

use crate::error::AppError;

/// Local time of a finished cycle, e.g. `2025-06-02T10:00:00`.
pub const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Start time embedded in the log file name, e.g. `2025-06-02_10-00-00`.
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub fn format_timestamp<Tz>(time: &DateTime<Tz>, format: &str) -> Result<Timestamp, AppError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut timestamp = Timestamp::new();
    write!(timestamp, "{}", time.format(format)).map_err(|_| AppError::Timestamp {
        capacity: TIMESTAMP_CAPACITY,
    })?;
    Ok(timestamp)
}

pub fn row_timestamp() -> Result<Timestamp, AppError> {
    format_timestamp(&Local::now(), ROW_TIMESTAMP_FORMAT)
}

pub fn file_timestamp() -> Result<Timestamp, AppError> {
    format_timestamp(&Local::now(), FILE_TIMESTAMP_FORMAT)
}

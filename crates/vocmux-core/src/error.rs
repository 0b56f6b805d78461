//! Error types for the acquisition pipeline

use core::fmt;

use embedded_hal::i2c::{Error as _, ErrorKind};
use thiserror_no_std::Error;

/// Failure of one acquisition step on one channel.
///
/// `Bus` and `Sensor` are absorbed by the sweep and counted as a miss for that
/// channel in that pass. `InvalidChannel` is a caller bug and is never retried.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionError {
    #[error("channel {channel} is outside 0..{ports}")]
    InvalidChannel { channel: usize, ports: usize },
    #[error("I2C transport error: {0}")]
    Bus(ErrorKind),
    #[error("{sensor} measurement failed: {error}")]
    Sensor { sensor: SensorKind, error: DriverError },
}

impl AcquisitionError {
    /// Wrap a raw transport error from an `embedded-hal` bus.
    pub fn bus<E: embedded_hal::i2c::Error>(error: E) -> Self {
        Self::Bus(error.kind())
    }
}

/// Error code reported by a sensor driver.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    #[error("bus error ({0})")]
    Bus(ErrorKind),
    #[error("CRC mismatch in sensor response")]
    Checksum,
}

impl DriverError {
    pub fn bus<E: embedded_hal::i2c::Error>(error: E) -> Self {
        Self::Bus(error.kind())
    }
}

/// Which half of the compensated measurement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    /// Temperature/humidity single shot
    Humiture,
    /// VOC raw signal
    Voc,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Humiture => f.write_str("temperature/humidity"),
            Self::Voc => f.write_str("VOC"),
        }
    }
}

//! Linux I2C adapter as seen by the acquisition core
//!
//! When the device node cannot be opened the logger still runs: the bus is
//! replaced by one that fails every transaction, so every channel reads as
//! missing data instead of the process exiting.

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, Operation};
use linux_embedded_hal::I2cdev;
use log::{error, info};

use crate::error::AppError;

type TransportError = <I2cdev as ErrorType>::Error;

pub enum HostBus {
    Open(I2cdev),
    Unavailable,
}

#[derive(Debug)]
pub enum HostBusError {
    Transport(TransportError),
    Unavailable,
}

impl i2c::Error for HostBusError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(e) => e.kind(),
            Self::Unavailable => ErrorKind::Other,
        }
    }
}

impl HostBus {
    pub fn open(path: &str) -> Result<Self, AppError> {
        I2cdev::new(path)
            .map(Self::Open)
            .map_err(|e| AppError::BusUnavailable {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// Open `path`, or log why not and hand back a bus that always fails.
    pub fn open_or_unavailable(path: &str) -> Self {
        match Self::open(path) {
            Ok(bus) => {
                info!("Opened I2C bus {}", path);
                bus
            }
            Err(e) => {
                error!("{}; every channel will report missing data", e);
                Self::Unavailable
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

impl ErrorType for HostBus {
    type Error = HostBusError;
}

impl I2c for HostBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match self {
            Self::Open(dev) => dev
                .transaction(address, operations)
                .map_err(HostBusError::Transport),
            Self::Unavailable => Err(HostBusError::Unavailable),
        }
    }
}

//! TCA9548A-style I2C multiplexer control
//!
//! The multiplexer exposes one upstream address and up to eight downstream
//! channels. Writing a one-hot byte to its control register connects exactly
//! one channel to the upstream bus.

use embedded_hal::i2c::I2c;
use log::debug;

use crate::PORT_COUNT;
use crate::error::AcquisitionError;

/// Default address of a TCA9548A with A0..A2 tied low.
pub const TCA9548A_ADDR_70: u8 = 0x70;
pub const TCA9548A_ADDR_71: u8 = 0x71;
pub const TCA9548A_ADDR_72: u8 = 0x72;
pub const TCA9548A_ADDR_73: u8 = 0x73;
pub const TCA9548A_ADDR_74: u8 = 0x74;
pub const TCA9548A_ADDR_75: u8 = 0x75;
pub const TCA9548A_ADDR_76: u8 = 0x76;
pub const TCA9548A_ADDR_77: u8 = 0x77;

/// Channels addressable with a single control byte.
pub const MAX_CHANNELS: usize = 8;

/// Highest 7-bit I2C address probed during presence detection.
const MAX_7BIT_ADDRESS: u8 = 0x7F;

/// Multiplexer controller bound to one upstream address.
///
/// The address is fixed at construction; there is no process-wide selection
/// state. `PORTS` is the number of channels actually wired and must not exceed
/// [`MAX_CHANNELS`].
pub struct Multiplexer<I2C, const PORTS: usize = PORT_COUNT> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c, const PORTS: usize> Multiplexer<I2C, PORTS> {
    const PORTS_FIT_CONTROL_BYTE: () = assert!(
        PORTS > 0 && PORTS <= MAX_CHANNELS,
        "a multiplexer has between 1 and 8 channels"
    );

    pub fn new(i2c: I2C, address: u8) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::PORTS_FIT_CONTROL_BYTE;
        Self { i2c, address }
    }

    /// Upstream address of the multiplexer itself.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Connect `channel` to the upstream bus.
    ///
    /// Out-of-range channels are rejected before anything is written.
    pub fn select_channel(&mut self, channel: usize) -> Result<(), AcquisitionError> {
        if channel >= PORTS {
            return Err(AcquisitionError::InvalidChannel {
                channel,
                ports: PORTS,
            });
        }

        let mask = 1u8 << channel;
        self.i2c
            .write(self.address, &[mask])
            .map_err(AcquisitionError::bus)
    }

    /// Report whether anything other than the multiplexer answers on the bus.
    ///
    /// Every 7-bit address except our own is probed with a zero-length write;
    /// the first acknowledged probe means a device is present. This only tells
    /// us that *something* is wired to the selected channel, not what it is.
    pub fn detect_device_present(&mut self) -> bool {
        for address in 0..=MAX_7BIT_ADDRESS {
            if address == self.address {
                continue;
            }
            if self.i2c.write(address, &[]).is_ok() {
                debug!("Device acknowledged at 0x{:02X}", address);
                return true;
            }
        }
        false
    }

    /// Give the bus handle back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{HumitureSensor, HumitureTicks, Repeatability, checked_word};
use crate::error::DriverError;

/// ADDR pin low
pub const SHT3X_ADDR_44: u8 = 0x44;
/// ADDR pin high
pub const SHT3X_ADDR_45: u8 = 0x45;

impl Repeatability {
    /// Single-shot command without clock stretching, and its worst-case
    /// conversion time in milliseconds.
    const fn single_shot_command(self) -> ([u8; 2], u32) {
        match self {
            Self::High => ([0x24, 0x00], 16),
            Self::Medium => ([0x24, 0x0B], 7),
            Self::Low => ([0x24, 0x16], 5),
        }
    }
}

/// SHT3x temperature/humidity sensor in single-shot mode.
pub struct Sht3xSensor<I, D> {
    i2c: I,
    address: u8,
    delay: D,
}

impl<I: I2c, D: DelayNs> Sht3xSensor<I, D> {
    pub fn new(i2c: I, address: u8, delay: D) -> Self {
        Self {
            i2c,
            address,
            delay,
        }
    }
}

impl<I: I2c, D: DelayNs> HumitureSensor for Sht3xSensor<I, D> {
    fn measure_single_shot(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<HumitureTicks, DriverError> {
        let (command, wait_ms) = repeatability.single_shot_command();
        self.i2c
            .write(self.address, &command)
            .map_err(DriverError::bus)?;

        self.delay.delay_ms(wait_ms);

        let mut response = [0u8; 6];
        self.i2c
            .read(self.address, &mut response)
            .map_err(DriverError::bus)?;

        Ok(HumitureTicks {
            temperature: checked_word(&response[0..3])?,
            humidity: checked_word(&response[3..6])?,
        })
    }
}

#[cfg(feature = "sensor-sgp40")]
mod sgp40;
#[cfg(feature = "sensor-sht3x")]
mod sht3x;

#[cfg(test)]
pub(crate) mod testing;

use crate::error::DriverError;

/// Full-scale value of a 16-bit Sensirion tick.
pub const TICKS_FULL_SCALE: f32 = 65535.0;

/// SHT3x measurement repeatability.
///
/// Higher repeatability lowers noise at the cost of a longer conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeatability {
    High,
    Medium,
    Low,
}

/// Raw temperature and humidity ticks from one single-shot measurement.
///
/// These are also the compensation inputs of the VOC sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HumitureTicks {
    pub temperature: u16,
    pub humidity: u16,
}

impl HumitureTicks {
    /// Temperature in °C.
    pub fn temperature_celsius(&self) -> f32 {
        ticks_to_celsius(self.temperature)
    }

    /// Relative humidity in %RH.
    pub fn humidity_percent(&self) -> f32 {
        ticks_to_percent_rh(self.humidity)
    }
}

pub fn ticks_to_celsius(ticks: u16) -> f32 {
    -45.0 + 175.0 * f32::from(ticks) / TICKS_FULL_SCALE
}

pub fn ticks_to_percent_rh(ticks: u16) -> f32 {
    100.0 * f32::from(ticks) / TICKS_FULL_SCALE
}

/// Temperature/humidity sensor that measures on demand.
pub trait HumitureSensor {
    /// Trigger one measurement and return the raw ticks.
    fn measure_single_shot(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<HumitureTicks, DriverError>;
}

/// VOC sensor returning its uncalibrated raw signal.
pub trait VocSensor {
    /// Measure the raw VOC signal, compensated with the given humidity and
    /// temperature ticks.
    fn measure_raw_signal(&mut self, compensation: HumitureTicks) -> Result<u16, DriverError>;
}

impl<T: HumitureSensor + ?Sized> HumitureSensor for &mut T {
    fn measure_single_shot(
        &mut self,
        repeatability: Repeatability,
    ) -> Result<HumitureTicks, DriverError> {
        (**self).measure_single_shot(repeatability)
    }
}

impl<T: VocSensor + ?Sized> VocSensor for &mut T {
    fn measure_raw_signal(&mut self, compensation: HumitureTicks) -> Result<u16, DriverError> {
        (**self).measure_raw_signal(compensation)
    }
}

/// Sensirion CRC-8 (polynomial 0x31, init 0xFF) over one data word.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x31;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

/// Decode a `[msb, lsb, crc]` word.
pub(crate) fn checked_word(chunk: &[u8]) -> Result<u16, DriverError> {
    match chunk {
        [msb, lsb, crc] if crc8(&[*msb, *lsb]) == *crc => Ok(u16::from_be_bytes([*msb, *lsb])),
        _ => Err(DriverError::Checksum),
    }
}

#[cfg(feature = "sensor-sgp40")]
pub use sgp40::{SGP40_ADDR, Sgp40Sensor};
#[cfg(feature = "sensor-sht3x")]
pub use sht3x::{SHT3X_ADDR_44, SHT3X_ADDR_45, Sht3xSensor};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use super::{HumitureTicks, VocSensor, checked_word, crc8};
use crate::error::DriverError;

pub const SGP40_ADDR: u8 = 0x59;

const MEASURE_RAW_SIGNAL: [u8; 2] = [0x26, 0x0F];
const MEASURE_RAW_WAIT_MS: u32 = 30;

/// SGP40 VOC sensor returning raw signal ticks.
pub struct Sgp40Sensor<I, D> {
    i2c: I,
    address: u8,
    delay: D,
}

impl<I: I2c, D: DelayNs> Sgp40Sensor<I, D> {
    pub fn new(i2c: I, address: u8, delay: D) -> Self {
        Self {
            i2c,
            address,
            delay,
        }
    }
}

fn measure_raw_frame(compensation: HumitureTicks) -> [u8; 8] {
    let [h_msb, h_lsb] = compensation.humidity.to_be_bytes();
    let [t_msb, t_lsb] = compensation.temperature.to_be_bytes();
    [
        MEASURE_RAW_SIGNAL[0],
        MEASURE_RAW_SIGNAL[1],
        h_msb,
        h_lsb,
        crc8(&[h_msb, h_lsb]),
        t_msb,
        t_lsb,
        crc8(&[t_msb, t_lsb]),
    ]
}

impl<I: I2c, D: DelayNs> VocSensor for Sgp40Sensor<I, D> {
    fn measure_raw_signal(&mut self, compensation: HumitureTicks) -> Result<u16, DriverError> {
        self.i2c
            .write(self.address, &measure_raw_frame(compensation))
            .map_err(DriverError::bus)?;

        self.delay.delay_ms(MEASURE_RAW_WAIT_MS);

        let mut response = [0u8; 3];
        self.i2c
            .read(self.address, &mut response)
            .map_err(DriverError::bus)?;

        checked_word(&response)
    }
}

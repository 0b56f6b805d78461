//! One compensated measurement on the currently selected channel

use crate::config::HumidityOffset;
use crate::error::{AcquisitionError, SensorKind};
use crate::sensors::{HumitureSensor, HumitureTicks, Repeatability, VocSensor};

/// Result of one successful single-channel measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompensatedReading {
    /// °C
    pub temperature: f32,
    /// %RH, offset already applied
    pub humidity: f32,
    /// Raw VOC signal ticks
    pub voc_raw: u16,
}

/// Pairs the temperature/humidity sensor with the VOC sensor it compensates.
pub struct Sampler<H, V> {
    humiture: H,
    voc: V,
}

impl<H: HumitureSensor, V: VocSensor> Sampler<H, V> {
    pub fn new(humiture: H, voc: V) -> Self {
        Self { humiture, voc }
    }

    /// Take one reading from whatever sensors answer on the selected channel.
    ///
    /// The humidity offset is added to the raw humidity ticks before they are
    /// converted and before they are handed to the VOC sensor. A failure of
    /// either sensor is returned immediately and no partial reading escapes.
    pub fn measure_once(
        &mut self,
        humidity_offset: HumidityOffset,
    ) -> Result<CompensatedReading, AcquisitionError> {
        let raw = self
            .humiture
            .measure_single_shot(Repeatability::High)
            .map_err(|error| AcquisitionError::Sensor {
                sensor: SensorKind::Humiture,
                error,
            })?;

        let compensated = HumitureTicks {
            temperature: raw.temperature,
            humidity: humidity_offset.apply(raw.humidity),
        };

        let voc_raw = self
            .voc
            .measure_raw_signal(compensated)
            .map_err(|error| AcquisitionError::Sensor {
                sensor: SensorKind::Voc,
                error,
            })?;

        Ok(CompensatedReading {
            temperature: compensated.temperature_celsius(),
            humidity: compensated.humidity_percent(),
            voc_raw,
        })
    }

    pub fn release(self) -> (H, V) {
        (self.humiture, self.voc)
    }
}

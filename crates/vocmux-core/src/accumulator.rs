//! Per-channel oversampling accumulators
//!
//! Each logging cycle runs `oversample_count` passes over every channel. A
//! successful measurement adds its three values into the channel's running sums;
//! a miss leaves the channel untouched. At the end of the cycle a channel has a
//! defined average only if *every* pass succeeded for it:
//!
//! ```text
//! pass:      1     2     3        sample_count   average
//! ch0:       ✓     ✓     ✓             3          sum / 3
//! ch1:       ✓     ✗     ✓             2          missing
//! ch2:       -     -     -             0          missing
//! ```
//!
//! Partial averages are never produced, so a column never mixes a 2-sample
//! mean with a 3-sample one.

use crate::PORT_COUNT;
use crate::error::AcquisitionError;
use crate::sampler::CompensatedReading;

/// Running sums for one channel during one logging cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelAccumulator {
    pub temp_sum: f64,
    pub hum_sum: f64,
    /// 65535 ticks × 1000 passes still fits comfortably in 32 bits.
    pub voc_sum: u32,
    pub sample_count: u32,
}

/// Arithmetic mean of a fully sampled channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelAverage {
    pub temperature: f32,
    pub humidity: f32,
    pub voc: u16,
}

impl ChannelAccumulator {
    pub fn add(&mut self, reading: &CompensatedReading) {
        self.temp_sum += f64::from(reading.temperature);
        self.hum_sum += f64::from(reading.humidity);
        self.voc_sum += u32::from(reading.voc_raw);
        self.sample_count += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Average over the cycle, or `None` unless every one of the
    /// `oversample_count` passes contributed a sample.
    pub fn average(&self, oversample_count: u32) -> Option<ChannelAverage> {
        if oversample_count == 0 || self.sample_count != oversample_count {
            return None;
        }

        let n = f64::from(oversample_count);
        Some(ChannelAverage {
            temperature: (self.temp_sum / n) as f32,
            humidity: (self.hum_sum / n) as f32,
            // mean of u16 values always fits in u16
            voc: (self.voc_sum / oversample_count) as u16,
        })
    }
}

/// One accumulator per multiplexer channel.
///
/// Owned by the sweep for the length of a run; reset at the start of every
/// cycle and again once the cycle has been finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulators<const PORTS: usize = PORT_COUNT> {
    channels: [ChannelAccumulator; PORTS],
}

impl<const PORTS: usize> Default for Accumulators<PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PORTS: usize> Accumulators<PORTS> {
    pub const fn new() -> Self {
        Self {
            channels: [ChannelAccumulator {
                temp_sum: 0.0,
                hum_sum: 0.0,
                voc_sum: 0,
                sample_count: 0,
            }; PORTS],
        }
    }

    fn channel_mut(&mut self, channel: usize) -> Result<&mut ChannelAccumulator, AcquisitionError> {
        self.channels
            .get_mut(channel)
            .ok_or(AcquisitionError::InvalidChannel {
                channel,
                ports: PORTS,
            })
    }

    /// Add one successful reading to `channel`.
    pub fn accumulate(
        &mut self,
        channel: usize,
        reading: &CompensatedReading,
    ) -> Result<(), AcquisitionError> {
        self.channel_mut(channel)?.add(reading);
        Ok(())
    }

    pub fn reset(&mut self, channel: usize) -> Result<(), AcquisitionError> {
        self.channel_mut(channel)?.reset();
        Ok(())
    }

    pub fn reset_all(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.reset();
        }
    }

    pub fn get(&self, channel: usize) -> Option<&ChannelAccumulator> {
        self.channels.get(channel)
    }

    /// Accumulators in channel-index order.
    pub fn iter(&self) -> impl Iterator<Item = &ChannelAccumulator> {
        self.channels.iter()
    }

    pub const fn port_count(&self) -> usize {
        PORTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f32, humidity: f32, voc_raw: u16) -> CompensatedReading {
        CompensatedReading {
            temperature,
            humidity,
            voc_raw,
        }
    }

    #[test]
    fn reset_all_zeroes_every_channel() {
        let mut accumulators: Accumulators<4> = Accumulators::new();
        for channel in 0..4 {
            accumulators
                .accumulate(channel, &reading(21.0, 40.0, 30_000))
                .unwrap();
        }

        accumulators.reset_all();

        assert!(
            accumulators
                .iter()
                .all(|a| *a == ChannelAccumulator::default())
        );
    }

    #[test]
    fn reset_all_is_idempotent() {
        let mut accumulators: Accumulators<8> = Accumulators::new();
        accumulators.accumulate(3, &reading(1.0, 2.0, 3)).unwrap();

        accumulators.reset_all();
        let once = accumulators.clone();
        accumulators.reset_all();
        accumulators.reset_all();

        assert_eq!(accumulators, once);
        assert_eq!(accumulators, Accumulators::<8>::new());
    }

    #[test]
    fn count_tracks_successful_calls_since_reset() {
        let mut accumulators: Accumulators<2> = Accumulators::new();
        for _ in 0..4 {
            accumulators.accumulate(0, &reading(20.0, 50.0, 100)).unwrap();
        }
        accumulators.accumulate(1, &reading(20.0, 50.0, 100)).unwrap();
        accumulators.reset(0).unwrap();
        accumulators.accumulate(0, &reading(20.0, 50.0, 100)).unwrap();

        assert_eq!(accumulators.get(0).unwrap().sample_count, 1);
        assert_eq!(accumulators.get(1).unwrap().sample_count, 1);
        assert_eq!(accumulators.get(0).unwrap().voc_sum, 100);
    }

    #[test]
    fn out_of_range_channel_is_rejected() {
        let mut accumulators: Accumulators<2> = Accumulators::new();
        assert_eq!(
            accumulators.accumulate(2, &reading(0.0, 0.0, 0)),
            Err(AcquisitionError::InvalidChannel {
                channel: 2,
                ports: 2
            })
        );
        assert!(accumulators.reset(5).is_err());
        assert_eq!(accumulators, Accumulators::<2>::new());
    }

    #[test]
    fn average_requires_every_pass() {
        let mut channel = ChannelAccumulator::default();
        channel.add(&reading(20.0, 50.0, 100));
        channel.add(&reading(20.2, 50.1, 102));

        assert_eq!(channel.average(3), None);

        channel.add(&reading(19.8, 49.9, 98));
        let average = channel.average(3).unwrap();

        assert!((average.temperature - 20.0) * (average.temperature - 20.0) < 1e-8);
        assert!((average.humidity - 50.0) * (average.humidity - 50.0) < 1e-8);
        assert_eq!(average.voc, 100);
    }

    #[test]
    fn voc_sum_holds_max_ticks_for_max_oversampling() {
        let mut channel = ChannelAccumulator::default();
        for _ in 0..crate::config::MAX_OVERSAMPLE_COUNT {
            channel.add(&reading(0.0, 0.0, u16::MAX));
        }
        let average = channel
            .average(crate::config::MAX_OVERSAMPLE_COUNT)
            .unwrap();
        assert_eq!(average.voc, u16::MAX);
    }

    #[test]
    fn zero_oversample_count_has_no_average() {
        assert_eq!(ChannelAccumulator::default().average(0), None);
    }
}

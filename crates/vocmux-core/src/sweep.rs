//! Multi-port sweep over the multiplexer
//!
//! A logging cycle is `oversample_count` passes; each pass visits every channel
//! in index order:
//!
//! ```text
//! select(ch) ──► detect ──► measure ──► accumulate ──► sleep ──► next ch
//!     │             │           │
//!     └─ bus error  └─ absent   └─ sensor error       (all: miss, still sleep)
//! ```
//!
//! Failures on one channel never stop the pass, so every cycle makes exactly
//! `PORTS × oversample_count` attempts and takes a predictable amount of time.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::PORT_COUNT;
use crate::accumulator::Accumulators;
use crate::config::{CycleConfig, HumidityOffset};
use crate::error::AcquisitionError;
use crate::mux::Multiplexer;
use crate::record::{self, CsvRecord, Timestamp};
use crate::sampler::{CompensatedReading, Sampler};
use crate::sensors::{HumitureSensor, VocSensor};

/// Settling/measurement dead time after each channel attempt.
pub const DEFAULT_MEASUREMENT_INTERVAL_MS: u32 = 1000;

/// What happened on one channel during one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelOutcome {
    Sampled(CompensatedReading),
    /// Nothing acknowledged on the channel.
    Absent,
    SelectFailed(AcquisitionError),
    MeasurementFailed(AcquisitionError),
}

impl ChannelOutcome {
    pub fn is_sampled(&self) -> bool {
        matches!(self, Self::Sampled(_))
    }
}

/// Outcome of every channel in one pass, in channel order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassReport<const PORTS: usize = PORT_COUNT> {
    outcomes: [ChannelOutcome; PORTS],
}

impl<const PORTS: usize> PassReport<PORTS> {
    pub fn outcome(&self, channel: usize) -> Option<&ChannelOutcome> {
        self.outcomes.get(channel)
    }

    pub fn outcomes(&self) -> &[ChannelOutcome; PORTS] {
        &self.outcomes
    }

    pub fn sampled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sampled()).count()
    }
}

/// Drives the multiplexer, the sampler and the accumulators.
///
/// The multiplexer is the only bus master path used here; selection, detection
/// and measurement of one channel always complete before the next channel is
/// selected.
pub struct SweepController<I2C, H, V, D, const PORTS: usize = PORT_COUNT> {
    mux: Multiplexer<I2C, PORTS>,
    sampler: Sampler<H, V>,
    delay: D,
    interval_ms: u32,
    accumulators: Accumulators<PORTS>,
}

impl<I2C, H, V, D, const PORTS: usize> SweepController<I2C, H, V, D, PORTS>
where
    I2C: I2c,
    H: HumitureSensor,
    V: VocSensor,
    D: DelayNs,
{
    pub fn new(
        mux: Multiplexer<I2C, PORTS>,
        sampler: Sampler<H, V>,
        delay: D,
        interval_ms: u32,
    ) -> Self {
        Self {
            mux,
            sampler,
            delay,
            interval_ms,
            accumulators: Accumulators::new(),
        }
    }

    pub fn accumulators(&self) -> &Accumulators<PORTS> {
        &self.accumulators
    }

    /// Select, probe and measure a single channel, accumulating on success.
    pub fn sample_channel(
        &mut self,
        channel: usize,
        humidity_offset: HumidityOffset,
    ) -> ChannelOutcome {
        if let Err(e) = self.mux.select_channel(channel) {
            warn!("Failed to select mux channel {}: {}", channel, e);
            return ChannelOutcome::SelectFailed(e);
        }

        if !self.mux.detect_device_present() {
            debug!("Port {} | no device", channel);
            return ChannelOutcome::Absent;
        }

        let reading = match self.sampler.measure_once(humidity_offset) {
            Ok(reading) => reading,
            Err(e) => {
                warn!("Port {} | measurement failed: {}", channel, e);
                return ChannelOutcome::MeasurementFailed(e);
            }
        };

        if let Err(e) = self.accumulators.accumulate(channel, &reading) {
            return ChannelOutcome::MeasurementFailed(e);
        }

        debug!(
            "Port {} | Temp: {:.2} °C | Humidity: {:.2} % | VOC: {} ticks",
            channel, reading.temperature, reading.humidity, reading.voc_raw
        );
        ChannelOutcome::Sampled(reading)
    }

    /// One pass over every channel, sleeping the measurement interval after
    /// each attempt whatever its outcome.
    pub fn run_pass(&mut self, humidity_offset: HumidityOffset) -> PassReport<PORTS> {
        let mut outcomes = [ChannelOutcome::Absent; PORTS];
        for (channel, outcome) in outcomes.iter_mut().enumerate() {
            *outcome = self.sample_channel(channel, humidity_offset);
            self.delay.delay_ms(self.interval_ms);
        }
        PassReport { outcomes }
    }

    /// Run a full logging cycle: reset, then `oversample_count` passes.
    pub fn run_cycle(&mut self, config: &CycleConfig) -> &Accumulators<PORTS> {
        self.accumulators.reset_all();
        for pass in 0..config.oversample_count() {
            let report = self.run_pass(config.humidity_offset());
            debug!(
                "Pass {}/{}: {} of {} channels sampled",
                pass + 1,
                config.oversample_count(),
                report.sampled_count(),
                PORTS
            );
        }
        &self.accumulators
    }

    /// Build the cycle's record and clear the accumulators for the next one.
    pub fn finalize(&mut self, timestamp: &Timestamp, oversample_count: u32) -> CsvRecord<PORTS> {
        let record = record::finalize(timestamp, &self.accumulators, oversample_count);
        self.accumulators.reset_all();
        record
    }

    pub fn release(self) -> (Multiplexer<I2C, PORTS>, Sampler<H, V>, D) {
        (self.mux, self.sampler, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;
    use crate::error::{DriverError, SensorKind};
    use crate::mux::TCA9548A_ADDR_70;
    use crate::sampler::tests::{ScriptedHumiture, ScriptedVoc};
    use crate::sensors::HumitureTicks;
    use crate::sensors::testing::{FakeBus, NoDelay};

    const SENSOR_ADDR: u8 = 0x44;
    // 25.00 °C, 50.00 %RH
    const TICKS: HumitureTicks = HumitureTicks {
        temperature: 0x6666,
        humidity: 0x8000,
    };

    type TestSweep<const PORTS: usize> =
        SweepController<FakeBus, ScriptedHumiture, ScriptedVoc, NoDelay, PORTS>;

    fn sweep<const PORTS: usize>(
        bus: &FakeBus,
        humiture: ScriptedHumiture,
        voc: ScriptedVoc,
        delay: &NoDelay,
    ) -> TestSweep<PORTS> {
        SweepController::new(
            Multiplexer::new(bus.clone(), TCA9548A_ADDR_70),
            Sampler::new(humiture, voc),
            delay.clone(),
            DEFAULT_MEASUREMENT_INTERVAL_MS,
        )
    }

    fn timestamp(text: &str) -> Timestamp {
        let mut ts = Timestamp::new();
        ts.push_str(text).unwrap();
        ts
    }

    #[test]
    fn absent_channel_is_missing_in_the_row() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        bus.populate(0, SENSOR_ADDR);

        let mut humiture = ScriptedHumiture::default();
        let mut voc = ScriptedVoc::default();
        for raw in [100, 102, 98] {
            humiture.results.push_back(Ok(TICKS));
            voc.results.push_back(Ok(raw));
        }

        let delay = NoDelay::default();
        let mut sweep: TestSweep<2> = sweep(&bus, humiture, voc, &delay);
        let config = CycleConfig::new(3, 0.0).unwrap();

        let accumulators = sweep.run_cycle(&config);
        assert_eq!(accumulators.get(0).unwrap().sample_count, 3);
        assert_eq!(accumulators.get(1).unwrap().sample_count, 0);

        let record = sweep.finalize(&timestamp("2025-06-02T10:00:00"), 3);
        assert_eq!(
            record.to_string(),
            "2025-06-02T10:00:00,25.00,50.00,100,NaN,NaN,NaN"
        );
    }

    #[test]
    fn one_failed_pass_drops_the_channel_for_the_cycle() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        bus.populate(0, SENSOR_ADDR);
        bus.populate(1, SENSOR_ADDR);

        let mut humiture = ScriptedHumiture::default();
        let mut voc = ScriptedVoc::default();
        // pass order: ch0, ch1, ch0, ch1 (fails), ch0, ch1
        for _ in 0..6 {
            humiture.results.push_back(Ok(TICKS));
        }
        for result in [Ok(200), Ok(300), Ok(200), Err(DriverError::Checksum), Ok(200), Ok(300)] {
            voc.results.push_back(result);
        }

        let delay = NoDelay::default();
        let mut sweep: TestSweep<2> = sweep(&bus, humiture, voc, &delay);
        let config = CycleConfig::new(3, 0.0).unwrap();

        sweep.run_cycle(&config);
        assert_eq!(sweep.accumulators().get(1).unwrap().sample_count, 2);

        let record = sweep.finalize(&timestamp("ts"), 3);
        assert_eq!(record.to_string(), "ts,25.00,50.00,200,NaN,NaN,NaN");
    }

    #[test]
    fn every_attempt_is_paced_and_serialized() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        let delay = NoDelay::default();
        let mut sweep: TestSweep<8> = sweep(
            &bus,
            ScriptedHumiture::default(),
            ScriptedVoc::default(),
            &delay,
        );

        sweep.run_cycle(&CycleConfig::new(2, 0.0).unwrap());

        // 8 channels × 2 passes, one interval each
        assert_eq!(delay.calls().len(), 16);
        assert_eq!(delay.total_ms(), 16 * u64::from(DEFAULT_MEASUREMENT_INTERVAL_MS));

        let selects: alloc::vec::Vec<u8> = bus
            .writes()
            .into_iter()
            .filter(|(address, _)| *address == TCA9548A_ADDR_70)
            .map(|(_, bytes)| bytes[0])
            .collect();
        let expected: alloc::vec::Vec<u8> = (0..2).flat_map(|_| (0..8).map(|ch| 1u8 << ch)).collect();
        assert_eq!(selects, expected);
    }

    #[test]
    fn select_failure_skips_measurement_but_keeps_pacing() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        bus.populate(0, SENSOR_ADDR);
        bus.set_nack(TCA9548A_ADDR_70, true);

        let mut humiture = ScriptedHumiture::default();
        humiture.results.push_back(Ok(TICKS));
        let delay = NoDelay::default();
        let mut sweep: TestSweep<2> = sweep(&bus, humiture, ScriptedVoc::default(), &delay);

        let report = sweep.run_pass(HumidityOffset::ZERO);

        assert!(matches!(
            report.outcome(0),
            Some(ChannelOutcome::SelectFailed(AcquisitionError::Bus(_)))
        ));
        assert_eq!(report.sampled_count(), 0);
        assert!(bus.probes().is_empty());
        assert_eq!(delay.calls().len(), 2);
    }

    #[test]
    fn pass_report_classifies_each_channel() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        bus.populate(0, SENSOR_ADDR);
        bus.populate(2, SENSOR_ADDR);

        let mut humiture = ScriptedHumiture::default();
        humiture.results.push_back(Ok(TICKS));
        humiture.results.push_back(Err(DriverError::Checksum));
        let mut voc = ScriptedVoc::default();
        voc.results.push_back(Ok(1234));

        let delay = NoDelay::default();
        let mut sweep: TestSweep<3> = sweep(&bus, humiture, voc, &delay);
        let report = sweep.run_pass(HumidityOffset::ZERO);

        assert!(report.outcome(0).unwrap().is_sampled());
        assert_eq!(report.outcome(1), Some(&ChannelOutcome::Absent));
        assert_eq!(
            report.outcome(2),
            Some(&ChannelOutcome::MeasurementFailed(AcquisitionError::Sensor {
                sensor: SensorKind::Humiture,
                error: DriverError::Checksum
            }))
        );
        assert_eq!(sweep.accumulators().get(0).unwrap().voc_sum, 1234);
        assert_eq!(sweep.accumulators().get(2).unwrap().sample_count, 0);
    }

    #[test]
    fn cycles_start_and_end_with_clean_accumulators() {
        let bus = FakeBus::with_mux(TCA9548A_ADDR_70);
        bus.populate(0, SENSOR_ADDR);

        let mut humiture = ScriptedHumiture::default();
        let mut voc = ScriptedVoc::default();
        for _ in 0..3 {
            humiture.results.push_back(Ok(TICKS));
            voc.results.push_back(Ok(500));
        }

        let delay = NoDelay::default();
        let mut sweep: TestSweep<1> = sweep(&bus, humiture, voc, &delay);
        let config = CycleConfig::new(1, 0.0).unwrap();

        // leftover from an interrupted cycle
        sweep.run_pass(HumidityOffset::ZERO);
        assert_eq!(sweep.accumulators().get(0).unwrap().sample_count, 1);

        sweep.run_cycle(&config);
        assert_eq!(sweep.accumulators().get(0).unwrap().sample_count, 1);

        let record = sweep.finalize(&timestamp("ts"), 1);
        assert_eq!(record.to_string(), "ts,25.00,50.00,500");
        assert_eq!(sweep.accumulators(), &Accumulators::<1>::new());
    }
}

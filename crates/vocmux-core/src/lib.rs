//! Hardware-independent core library for vocmux
//!
//! This crate contains the acquisition pipeline of the multi-port environmental
//! logger: selecting channels on the I2C multiplexer, taking one compensated
//! temperature/humidity/VOC measurement per channel, oversampling those
//! measurements across several passes, and turning the sums into one CSV record
//! per logging cycle.
//!
//! ```text
//! SweepController ──► Multiplexer ──► I2C bus
//!        │
//!        ├──► Sampler ──► HumitureSensor / VocSensor
//!        │
//!        └──► Accumulators ──► record::finalize ──► CsvRecord
//! ```
//!
//! It is `#![no_std]` with `extern crate alloc` and generic over `embedded-hal`
//! traits, so it runs on the Linux host logger and under unit tests with stub
//! transports alike.

#![no_std]

extern crate alloc;

pub mod accumulator;
pub mod config;
pub mod error;
pub mod mux;
pub mod record;
pub mod sampler;
pub mod sensors;
pub mod sweep;

pub use accumulator::{Accumulators, ChannelAccumulator, ChannelAverage};
pub use config::{ConfigIssue, CycleConfig, HumidityOffset, ParsedConfig};
pub use error::{AcquisitionError, DriverError, SensorKind};
pub use mux::Multiplexer;
pub use record::{CsvHeader, CsvRecord, Timestamp};
pub use sampler::{CompensatedReading, Sampler};
pub use sweep::{ChannelOutcome, PassReport, SweepController};

/// Number of downstream channels on the multiplexer.
pub const PORT_COUNT: usize = 8;

/// Number of fields in every CSV row (and the header) for `ports` channels.
pub const fn field_count(ports: usize) -> usize {
    1 + 3 * ports
}

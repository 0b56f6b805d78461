//! CSV record assembly
//!
//! A record is kept as typed cells (timestamp plus one triplet per channel) and
//! only rendered into a comma-separated line when displayed. Its shape is fixed
//! by the port count, so every row and the header have exactly
//! `1 + 3 × PORTS` fields.

use core::fmt::{self, Display, Write as _};

use crate::PORT_COUNT;
use crate::accumulator::{Accumulators, ChannelAverage};
use crate::field_count;

pub const TIMESTAMP_CAPACITY: usize = 32;

/// Row timestamp, already formatted by the caller.
pub type Timestamp = heapless::String<TIMESTAMP_CAPACITY>;

pub const FIELD_SEPARATOR: char = ',';

/// Token written for each field of a channel without a complete average.
pub const MISSING_TOKEN: &str = "NaN";

/// One rendered CSV field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Temperature(f32),
    Humidity(f32),
    Voc(u16),
    Missing,
}

impl Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Temperature(value) | Self::Humidity(value) => write!(f, "{:.2}", value),
            Self::Voc(value) => write!(f, "{}", value),
            Self::Missing => f.write_str(MISSING_TOKEN),
        }
    }
}

/// The three cells contributed by one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelCells {
    Present(ChannelAverage),
    Missing,
}

impl ChannelCells {
    pub fn fields<'a>(&self) -> [Field<'a>; 3] {
        match self {
            Self::Present(average) => [
                Field::Temperature(average.temperature),
                Field::Humidity(average.humidity),
                Field::Voc(average.voc),
            ],
            Self::Missing => [Field::Missing; 3],
        }
    }
}

/// One finished logging cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord<const PORTS: usize = PORT_COUNT> {
    timestamp: Timestamp,
    channels: [ChannelCells; PORTS],
}

impl<const PORTS: usize> CsvRecord<PORTS> {
    pub const FIELD_COUNT: usize = field_count(PORTS);

    pub fn timestamp(&self) -> &str {
        self.timestamp.as_str()
    }

    pub fn channel(&self, channel: usize) -> Option<&ChannelCells> {
        self.channels.get(channel)
    }

    /// Fields in column order: timestamp, then T/H/VOC per channel.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> {
        core::iter::once(Field::Text(self.timestamp.as_str()))
            .chain(self.channels.iter().flat_map(ChannelCells::fields))
    }
}

impl<const PORTS: usize> Display for CsvRecord<PORTS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, field) in self.fields().enumerate() {
            if index > 0 {
                f.write_char(FIELD_SEPARATOR)?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

/// Header row matching [`CsvRecord`] column for column.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvHeader<const PORTS: usize = PORT_COUNT>;

impl<const PORTS: usize> CsvHeader<PORTS> {
    pub const FIELD_COUNT: usize = field_count(PORTS);
}

impl<const PORTS: usize> Display for CsvHeader<PORTS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Timestamp")?;
        for port in 0..PORTS {
            write!(f, ",T{port},H{port},VOC{port}")?;
        }
        Ok(())
    }
}

/// Turn a cycle's sums into one record.
///
/// Channels whose sample count equals `oversample_count` get their exact mean;
/// every other channel gets the missing-data triplet.
pub fn finalize<const PORTS: usize>(
    timestamp: &Timestamp,
    accumulators: &Accumulators<PORTS>,
    oversample_count: u32,
) -> CsvRecord<PORTS> {
    let channels = core::array::from_fn(|channel| {
        match accumulators
            .get(channel)
            .and_then(|accumulator| accumulator.average(oversample_count))
        {
            Some(average) => ChannelCells::Present(average),
            None => ChannelCells::Missing,
        }
    });

    CsvRecord {
        timestamp: timestamp.clone(),
        channels,
    }
}

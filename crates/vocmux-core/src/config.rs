//! Logging cycle configuration
//!
//! Two values drive a run: how many passes are averaged into one CSV row, and
//! the humidity offset applied to every SHT3x reading. They are read once at
//! startup from `key = value` text and never change afterwards.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use thiserror_no_std::Error;

use crate::sensors::TICKS_FULL_SCALE;

pub const DEFAULT_OVERSAMPLE_COUNT: u32 = 5;

/// Largest accepted oversample count. Keeps the 32-bit VOC sum of a cycle far
/// from overflow.
pub const MAX_OVERSAMPLE_COUNT: u32 = 1000;

#[cfg(not(feature = "legacy-humidity-offset"))]
pub const DEFAULT_HUMIDITY_OFFSET_PERCENT: f32 = 0.0;
#[cfg(feature = "legacy-humidity-offset")]
pub const DEFAULT_HUMIDITY_OFFSET_PERCENT: f32 = 2.8;

const KEY_OVERSAMPLE_COUNT: &str = "oversample_count";
const KEY_HUMIDITY_OFFSET: &str = "humidity_offset";

/// Humidity correction in %RH together with its tick equivalent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumidityOffset {
    percent: f32,
    ticks: u16,
}

impl HumidityOffset {
    pub const ZERO: Self = Self {
        percent: 0.0,
        ticks: 0,
    };

    /// Build an offset from a percentage. Negative or non-finite values are
    /// rejected.
    pub fn from_percent(percent: f32) -> Option<Self> {
        if !percent.is_finite() || percent < 0.0 {
            return None;
        }
        // round half up; the `as` cast saturates above the tick range
        let ticks = (percent * TICKS_FULL_SCALE / 100.0 + 0.5) as u16;
        Some(Self { percent, ticks })
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn ticks(&self) -> u16 {
        self.ticks
    }

    /// Shift raw humidity ticks by the offset, clamping at full scale.
    pub fn apply(&self, humidity_ticks: u16) -> u16 {
        humidity_ticks.saturating_add(self.ticks)
    }
}

impl Default for HumidityOffset {
    fn default() -> Self {
        Self::from_percent(DEFAULT_HUMIDITY_OFFSET_PERCENT).unwrap_or(Self::ZERO)
    }
}

/// Immutable settings for every logging cycle of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleConfig {
    oversample_count: u32,
    humidity_offset: HumidityOffset,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            oversample_count: DEFAULT_OVERSAMPLE_COUNT,
            humidity_offset: HumidityOffset::default(),
        }
    }
}

/// Something in the config text that was ignored or replaced by a default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("line {line}: invalid oversample_count {value:?}, using the default")]
    InvalidOversampleCount { line: usize, value: String },
    #[error("line {line}: invalid humidity_offset {value:?}, using the default")]
    InvalidHumidityOffset { line: usize, value: String },
    #[error("line {line}: expected `key = value`")]
    MalformedLine { line: usize },
    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },
}

/// Result of parsing config text: the effective values and every problem
/// found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfig {
    pub config: CycleConfig,
    pub issues: Vec<ConfigIssue>,
}

impl CycleConfig {
    /// Validated constructor. `None` if either value is out of range.
    pub fn new(oversample_count: u32, humidity_offset_percent: f32) -> Option<Self> {
        if !(1..=MAX_OVERSAMPLE_COUNT).contains(&oversample_count) {
            return None;
        }
        Some(Self {
            oversample_count,
            humidity_offset: HumidityOffset::from_percent(humidity_offset_percent)?,
        })
    }

    /// Number of passes averaged into one record.
    pub fn oversample_count(&self) -> u32 {
        self.oversample_count
    }

    pub fn humidity_offset(&self) -> HumidityOffset {
        self.humidity_offset
    }

    /// Parse `key = value` lines. Blank lines and `#` comments are skipped;
    /// bad values fall back to the defaults and are reported as issues.
    pub fn parse(text: &str) -> ParsedConfig {
        let mut config = Self::default();
        let mut issues = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw_line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                issues.push(ConfigIssue::MalformedLine { line });
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                KEY_OVERSAMPLE_COUNT => {
                    config.oversample_count = match value.parse::<u32>() {
                        Ok(count) if (1..=MAX_OVERSAMPLE_COUNT).contains(&count) => count,
                        _ => {
                            issues.push(ConfigIssue::InvalidOversampleCount {
                                line,
                                value: value.to_string(),
                            });
                            DEFAULT_OVERSAMPLE_COUNT
                        }
                    };
                }
                KEY_HUMIDITY_OFFSET => {
                    config.humidity_offset = match value
                        .parse::<f32>()
                        .ok()
                        .and_then(HumidityOffset::from_percent)
                    {
                        Some(offset) => offset,
                        None => {
                            issues.push(ConfigIssue::InvalidHumidityOffset {
                                line,
                                value: value.to_string(),
                            });
                            HumidityOffset::default()
                        }
                    };
                }
                _ => issues.push(ConfigIssue::UnknownKey {
                    line,
                    key: key.to_string(),
                }),
            }
        }

        ParsedConfig { config, issues }
    }
}

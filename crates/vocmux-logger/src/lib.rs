//! Linux host side of vocmux
//!
//! Everything the acquisition core leaves to its platform lives here: the I2C
//! device node, the config file, wall-clock timestamps, and the CSV log file.
//! The binary in `bin/main.rs` wires these to a
//! [`SweepController`](vocmux_core::SweepController) and loops forever.

pub mod cli;
pub mod clock;
pub mod config_file;
pub mod csv_log;
pub mod error;
pub mod host_bus;

pub use error::AppError;

/// I2C adapter the multiplexer hangs off.
pub const I2C_DEVICE: &str = "/dev/i2c-1";

/// Upstream address of the multiplexer.
pub const MUX_ADDRESS: u8 = vocmux_core::mux::TCA9548A_ADDR_70;

/// Directory new CSV logs are created in.
pub const LOG_DIR: &str = "logs";

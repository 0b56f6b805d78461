//! vocmux logger
//!
//! Samples every multiplexer channel, averages `oversample_count` passes per
//! cycle, and appends one CSV row per cycle until killed.
//!
//! ```text
//! vocmux-logger [prefix]      # writes logs/<prefix>_<start time>.csv
//! ```
//!
//! Settings are read from `config.txt` in the working directory. Set
//! `RUST_LOG=debug` to see every individual measurement.

use core::cell::RefCell;
use std::path::Path;
use std::process::ExitCode;

use embedded_hal_bus::i2c::RefCellDevice;
use linux_embedded_hal::Delay;
use log::{error, info};

use vocmux_core::sensors::{SGP40_ADDR, SHT3X_ADDR_44, Sgp40Sensor, Sht3xSensor};
use vocmux_core::sweep::DEFAULT_MEASUREMENT_INTERVAL_MS;
use vocmux_core::{Multiplexer, PORT_COUNT, Sampler, SweepController};
use vocmux_logger::cli::{self, Args};
use vocmux_logger::config_file::{self, CONFIG_FILE};
use vocmux_logger::csv_log::CsvLog;
use vocmux_logger::host_bus::HostBus;
use vocmux_logger::{I2C_DEVICE, LOG_DIR, MUX_ADDRESS, clock};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting vocmux logger ({} ports)", PORT_COUNT);

    let args = Args::from_env();
    let config = config_file::load_config(Path::new(CONFIG_FILE));

    // -----------------------------------------------------------------------
    // Log file
    // -----------------------------------------------------------------------
    let start = match clock::file_timestamp() {
        Ok(stamp) => stamp,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let path = cli::log_file_path(Path::new(LOG_DIR), args.prefix(), &start);

    let mut log: CsvLog<PORT_COUNT> = match CsvLog::open(&path) {
        Ok(log) => log,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Logging to {}", log.path().display());

    // -----------------------------------------------------------------------
    // Bus and sensors
    // -----------------------------------------------------------------------
    // The multiplexer and both sensors share one adapter; the sweep never
    // overlaps their transactions.
    let bus = RefCell::new(HostBus::open_or_unavailable(I2C_DEVICE));

    let mux: Multiplexer<_, PORT_COUNT> = Multiplexer::new(RefCellDevice::new(&bus), MUX_ADDRESS);
    let humiture = Sht3xSensor::new(RefCellDevice::new(&bus), SHT3X_ADDR_44, Delay);
    let voc = Sgp40Sensor::new(RefCellDevice::new(&bus), SGP40_ADDR, Delay);

    let mut sweep = SweepController::new(
        mux,
        Sampler::new(humiture, voc),
        Delay,
        DEFAULT_MEASUREMENT_INTERVAL_MS,
    );

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    loop {
        sweep.run_cycle(&config);

        let timestamp = match clock::row_timestamp() {
            Ok(timestamp) => timestamp,
            Err(e) => {
                error!("{}; dropping this cycle", e);
                continue;
            }
        };

        let record = sweep.finalize(&timestamp, config.oversample_count());
        match log.append(&record) {
            Ok(()) => info!("{}", record),
            Err(e) => error!("{}", e),
        }
    }
}

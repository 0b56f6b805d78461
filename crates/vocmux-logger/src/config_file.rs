//! Startup configuration file
//!
//! Read once before the first cycle. A missing file is not an error: the
//! logger runs on defaults and says so.

use std::fs;
use std::path::Path;

use log::{info, warn};
use vocmux_core::{CycleConfig, ParsedConfig};

use crate::error::AppError;

/// Looked up relative to the working directory.
pub const CONFIG_FILE: &str = "config.txt";

pub fn read_config(path: &Path) -> Result<ParsedConfig, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::ConfigUnavailable {
        path: path.display().to_string(),
        kind: e.kind(),
    })?;
    Ok(CycleConfig::parse(&text))
}

/// Read `path`, falling back to defaults, and log the effective settings.
pub fn load_config(path: &Path) -> CycleConfig {
    let config = match read_config(path) {
        Ok(parsed) => {
            for issue in &parsed.issues {
                warn!("{}: {}", path.display(), issue);
            }
            info!("Loaded configuration from {}", path.display());
            parsed.config
        }
        Err(e) => {
            warn!("{}", e);
            info!("Using default configuration");
            CycleConfig::default()
        }
    };

    info!(
        "Oversample count: {}, humidity offset: {:.2} %RH ({} ticks)",
        config.oversample_count(),
        config.humidity_offset().percent(),
        config.humidity_offset().ticks()
    );
    config
}

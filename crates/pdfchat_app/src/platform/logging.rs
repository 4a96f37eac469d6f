//! Platform logging initialization for the pdfchat binary.
//!
//! The terminal belongs to the UI, so log output only goes to a file.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, ConfigBuilder, WriteLogger};

/// Installs a file logger at `path`. Failing to create the file leaves
/// logging disabled and prints a warning before the UI takes the screen.
pub fn initialize(path: &Path, level: LevelFilter) {
    match File::create(path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, build_config(), file);
        }
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
        }
    }
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

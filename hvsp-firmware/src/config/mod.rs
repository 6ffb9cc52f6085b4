//! Configuration loading and parsing
//!
//! The configuration is embedded at build time from `rescue.toml` and
//! parsed by a small no_std parser.

pub mod toml;

pub use toml::{parse_config, ParseError};

use defmt::*;
use hvsp_core::config::RescueConfig;

/// Parse and validate the embedded configuration, falling back to the
/// built-in defaults on any error
pub fn load(input: &str) -> RescueConfig {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            warn!("rescue.toml parse error: {}, using defaults", e);
            return RescueConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("rescue.toml rejected: {}, using defaults", e);
            RescueConfig::default()
        }
    }
}

//! Simple TOML parser for the rescue configuration
//!
//! Handles only the subset `rescue.toml` needs. It does NOT support the
//! full TOML spec.
//!
//! Supported:
//! - Key = value pairs (string, integer)
//! - `[pins]`, `[timing]` and `[button]` section headers
//! - Comments (# ...)

use hvsp_core::config::{PinConfig, RescueConfig};
use hvsp_hal_rp2040::parse_pin_string;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pins,
    Timing,
    Button,
}

/// Parse TOML configuration into a RescueConfig
///
/// Keys that are absent keep their default value, except `supply`: a
/// `[pins]` section without it means the target VCC is not switched.
pub fn parse_config(input: &str) -> Result<RescueConfig, ParseError> {
    let mut config = RescueConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            if section == Section::Pins {
                config.pins.supply = None;
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "pins" => Ok(Section::Pins),
        "timing" => Ok(Section::Timing),
        "button" => Ok(Section::Button),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RescueConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => match key {
            "version" => config.version = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Pins => {
            let pin = parse_pin(value)?;
            let pins = &mut config.pins;
            match key {
                "reset" => pins.reset = pin,
                "clock" => pins.clock = pin,
                "data_out" => pins.data_out = pin,
                "instr_in" => pins.instr_in = pin,
                "data_in" => pins.data_in = pin,
                "supply" => pins.supply = Some(pin),
                "led" => pins.led = pin,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Timing => {
            let value = parse_int(value)?;
            let timing = &mut config.timing;
            match key {
                "half_period_us" => timing.half_period_us = value,
                "settle_us" => timing.settle_us = value,
                "hv_assert_us" => timing.hv_assert_us = value,
                "bring_up_us" => timing.bring_up_us = value,
                "ready_timeout_us" => timing.ready_timeout_us = value,
                "ready_poll_us" => timing.ready_poll_us = value,
                "cooldown_ms" => timing.cooldown_ms = value,
                "session_budget_ms" => timing.session_budget_ms = value,
                _ => return Err(ParseError::UnknownKey),
            }
        }
        Section::Button => match key {
            "pin" => config.pins.button = parse_pin(value)?,
            "debounce_ms" => config.debounce_ms = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
    }
    Ok(())
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a pin string like "gpio11", "!gpio12", "^gpio4"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    parse_pin_string(parse_string(value)).ok_or(ParseError::InvalidPin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("\"^!gpio15\"").unwrap();
        assert_eq!(pin.pin, 15);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("\"gpio31\""), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(
            parse_key_value("led = \"gpio25\" # on-board"),
            Some(("led", "\"gpio25\""))
        );
        assert_eq!(parse_key_value("led ="), None);
    }

    #[test]
    fn test_parse_embedded_config() {
        let config = parse_config(include_str!("../../rescue.toml")).unwrap();
        assert_eq!(config, RescueConfig::default());
    }

    #[test]
    fn test_supply_optional() {
        let config = parse_config(
            r#"
[pins]
reset = "gpio10"
clock = "gpio11"
"#,
        )
        .unwrap();
        assert_eq!(config.pins.reset.pin, 10);
        assert_eq!(config.pins.clock.pin, 11);
        assert_eq!(config.pins.supply, None);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_config("[jar]"), Err(ParseError::InvalidSection));
        assert_eq!(
            parse_config("[timing]\nhalf_period = 5"),
            Err(ParseError::UnknownKey)
        );
        assert_eq!(
            parse_config("[timing]\nsettle_us = -1"),
            Err(ParseError::InvalidValue)
        );
    }
}

//! Build script for hvsp-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rescue.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lines of the HVSP connector, all required
const REQUIRED_PINS: [&str; 6] = ["reset", "clock", "data_out", "instr_in", "data_in", "led"];

/// Timing keys accepted in [timing]
const TIMING_KEYS: [&str; 8] = [
    "half_period_us",
    "settle_us",
    "hv_assert_us",
    "bring_up_us",
    "ready_timeout_us",
    "ready_poll_us",
    "cooldown_ms",
    "session_budget_ms",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rescue.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rescue.toml");

    let config_path = Path::new("rescue.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read rescue.toml", &[e.to_string()]),
    };

    let config: toml::Value = match content.parse() {
        Ok(value) => value,
        Err(e) => fail("rescue.toml is not valid TOML", &[e.to_string()]),
    };

    let mut errors = Vec::new();

    match config.get("version").and_then(|v| v.as_integer()) {
        Some(1) => {}
        Some(v) => errors.push(format!("unsupported version {}", v)),
        None => errors.push("missing 'version'".to_string()),
    }

    let mut used = HashSet::new();
    validate_pins(&config, &mut used, &mut errors);
    validate_button(&config, &mut used, &mut errors);
    validate_timing(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid rescue configuration", &errors);
    }
}

/// Validate the [pins] table
fn validate_pins(config: &toml::Value, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins").and_then(|p| p.as_table()) else {
        errors.push("missing [pins] section".to_string());
        return;
    };

    for name in REQUIRED_PINS {
        if !pins.contains_key(name) {
            errors.push(format!("[pins] missing '{}'", name));
        }
    }

    for (name, value) in pins {
        if !REQUIRED_PINS.contains(&name.as_str()) && name != "supply" {
            errors.push(format!("[pins] unknown key '{}'", name));
            continue;
        }
        check_pin(&format!("[pins] {}", name), value, used, errors);
    }
}

/// Validate the [button] table
fn validate_button(config: &toml::Value, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(button) = config.get("button").and_then(|b| b.as_table()) else {
        errors.push("missing [button] section".to_string());
        return;
    };

    match button.get("pin") {
        Some(value) => check_pin("[button] pin", value, used, errors),
        None => errors.push("[button] missing 'pin'".to_string()),
    }

    if let Some(debounce) = button.get("debounce_ms") {
        match debounce.as_integer() {
            Some(ms) if (0..=1000).contains(&ms) => {}
            _ => errors.push("[button] debounce_ms must be 0-1000".to_string()),
        }
    }
}

/// Validate the [timing] table
fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = config.get("timing").and_then(|t| t.as_table()) else {
        return;
    };

    for (key, value) in timing {
        if !TIMING_KEYS.contains(&key.as_str()) {
            errors.push(format!("[timing] unknown key '{}'", key));
            continue;
        }
        match value.as_integer() {
            Some(v) if (0..=u32::MAX as i64).contains(&v) => {}
            _ => errors.push(format!("[timing] {} must be a non-negative integer", key)),
        }
    }

    let get = |key: &str| timing.get(key).and_then(|v| v.as_integer());
    if get("half_period_us") == Some(0) {
        errors.push("[timing] half_period_us must be at least 1".to_string());
    }
    if let (Some(poll), Some(timeout)) = (get("ready_poll_us"), get("ready_timeout_us")) {
        if poll == 0 || poll > timeout {
            errors.push("[timing] ready_poll_us must be 1..=ready_timeout_us".to_string());
        }
    }
}

/// Check one pin string and record its number
fn check_pin(what: &str, value: &toml::Value, used: &mut HashSet<u8>, errors: &mut Vec<String>) {
    let Some(s) = value.as_str() else {
        errors.push(format!("{} must be a string like \"gpio4\"", what));
        return;
    };

    let digits = s.trim().trim_start_matches(['!', '^']);
    let pin = digits
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&n| n < 30);

    match pin {
        Some(pin) if !used.insert(pin) => {
            errors.push(format!("{}: gpio{} is already assigned", what, pin));
        }
        Some(_) => {}
        None => errors.push(format!("{}: invalid pin '{}'", what, s)),
    }
}

fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

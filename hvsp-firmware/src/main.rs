//! HVSP Rescue - ATtiny13 fuse recovery firmware
//!
//! Press the button and the programmer puts the target into High-Voltage
//! Serial Programming mode, checks that it is an ATtiny13 and restores
//! the factory fuse bytes. The LED reports the result.
//!
//! Pin assignment and timing come from `rescue.toml`, embedded at build
//! time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use hvsp_core::config::{PinConfig, RescueConfig};
use hvsp_core::Rescuer;
use hvsp_drivers::lines::LinePins;
use hvsp_drivers::{DebouncedButton, GpioLines, StatusLed};
use hvsp_hal_rp2040::{PinBank, PinError, RpFlex, RpInput, RpOutput};

use crate::tasks::{Lines, POLL_INTERVAL_MS};

mod channels;
mod config;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit rescue.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../rescue.toml");

/// Drivers bound to their configured pins
struct Board {
    lines: Lines,
    button: DebouncedButton<RpInput>,
    led: StatusLed<RpOutput>,
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("HVSP rescue firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);
    info!(
        "Pins: RST={} SCI={} SDO={} SII={} SDI={}, clock half period {} us",
        config.pins.reset.pin,
        config.pins.clock.pin,
        config.pins.data_out.pin,
        config.pins.instr_in.pin,
        config.pins.data_in.pin,
        config.timing.half_period_us
    );

    let mut bank = PinBank::new(p);
    let board = match bind_pins(&mut bank, &config) {
        Ok(board) => board,
        Err((pin, e)) => {
            error!("Cannot claim gpio{}: {}", pin, e);
            return;
        }
    };

    let rescuer = Rescuer::new(board.lines, Delay, config.timing);
    info!("Ready, press the button to rescue");

    spawner.spawn(tasks::status_task(board.led)).unwrap();
    spawner
        .spawn(tasks::rescue_task(rescuer, board.button))
        .unwrap();
}

/// Take every configured pin from the bank and build the drivers
fn bind_pins(bank: &mut PinBank, config: &RescueConfig) -> Result<Board, (u8, PinError)> {
    let pins = &config.pins;
    let mut take = |pin: PinConfig| bank.take(pin.pin).map_err(|e| (pin.pin, e));

    let line_pins = LinePins {
        reset: RpFlex::new(take(pins.reset)?),
        clock: RpFlex::new(take(pins.clock)?),
        data_out: RpFlex::new(take(pins.data_out)?),
        instr_in: RpFlex::new(take(pins.instr_in)?),
        data_in: RpFlex::new(take(pins.data_in)?),
    };
    let supply = match pins.supply {
        Some(supply) => Some(RpOutput::new(take(supply)?, supply.inverted)),
        None => None,
    };
    let lines = GpioLines::from_map(line_pins, supply, pins);

    let button = DebouncedButton::with_debounce_ms(
        RpInput::new(take(pins.button)?, pins.button.pull_up),
        pins.button.inverted,
        config.debounce_ms,
        POLL_INTERVAL_MS,
    );
    let led = StatusLed::new(RpOutput::new(take(pins.led)?, pins.led.inverted), pins.led.inverted);

    Ok(Board { lines, button, led })
}

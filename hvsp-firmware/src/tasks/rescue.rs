//! Rescue task
//!
//! Polls the button and runs a whole recovery session when it is pressed.
//! A session busy-waits for its timing, so nothing else runs on the
//! executor until it has finished (about a second, including cooldown).

use defmt::*;
use embassy_time::{Delay, Duration, Ticker};

use hvsp_core::Rescuer;
use hvsp_drivers::{DebouncedButton, GpioLines};
use hvsp_hal_rp2040::{RpFlex, RpInput, RpOutput};

use crate::channels::SignalIndicator;

/// Button polling interval
pub const POLL_INTERVAL_MS: u32 = 10;

/// HVSP lines as wired on the RP2040
pub type Lines = GpioLines<RpFlex, RpOutput>;

#[embassy_executor::task]
pub async fn rescue_task(mut rescuer: Rescuer<Lines, Delay>, mut button: DebouncedButton<RpInput>) {
    info!("Rescue task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS as u64));
    let mut indicator = SignalIndicator;

    loop {
        if let Some(outcome) = rescuer.poll(&mut button, &mut indicator) {
            info!("Rescue finished: {}", outcome);
        }
        ticker.next().await;
    }
}

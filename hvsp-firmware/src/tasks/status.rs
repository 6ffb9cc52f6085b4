//! Status LED task
//!
//! Plays the blink pattern for each reported outcome.

use defmt::*;
use embassy_time::Timer;

use hvsp_drivers::{BlinkPattern, StatusLed};
use hvsp_hal_rp2040::RpOutput;

use crate::channels::RESULT_SIGNAL;

#[embassy_executor::task]
pub async fn status_task(mut led: StatusLed<RpOutput>) {
    info!("Status task started");

    loop {
        let outcome = RESULT_SIGNAL.wait().await;
        let pattern = BlinkPattern::for_outcome(outcome);
        debug!("Showing {} as {}", outcome, pattern);

        for (on, hold_ms) in pattern.steps() {
            led.set_on(on);
            Timer::after_millis(hold_ms as u64).await;
        }
        led.set_on(false);
    }
}

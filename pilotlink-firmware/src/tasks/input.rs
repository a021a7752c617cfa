//! Button scan task
//!
//! Polls the button and joystick pins, debounces each one, and queues the
//! committed edges for transmission to the host.

use defmt::*;
use embassy_time::{Duration, Instant, Timer};

use pilotlink_core::config::DebounceConfig;
use pilotlink_core::debounce::{Debouncer, Edge, Level};
use pilotlink_hal::InputPin;
use pilotlink_protocol::{ButtonId, ButtonMsg, BUTTON_COUNT};

use crate::board::ButtonPin;
use crate::channels::BUTTON_EVENTS;

/// Pin polling period
const SCAN_INTERVAL_MS: u64 = 10;

/// Input task - debounces local pins into outbound button messages
#[embassy_executor::task]
pub async fn input_task(pins: [(ButtonId, ButtonPin); BUTTON_COUNT]) {
    info!("Input task started");

    let config = DebounceConfig::default();
    let mut debouncers: [Debouncer; BUTTON_COUNT] =
        core::array::from_fn(|_| Debouncer::new(config.window_ms));

    loop {
        let now_ms = Instant::now().as_millis();
        for (i, (button, pin)) in pins.iter().enumerate() {
            let level = if pin.is_low() { Level::Low } else { Level::High };
            if let Some(edge) = debouncers[i].sample(level, now_ms) {
                let msg = ButtonMsg {
                    button: *button,
                    pressed: edge == Edge::Pressed,
                };
                debug!("Button edge: {:?}", msg);
                // Drop on overflow; the link task will catch up
                if BUTTON_EVENTS.try_send(msg).is_err() {
                    warn!("Button channel full, dropping edge");
                }
            }
        }
        Timer::after(Duration::from_millis(SCAN_INTERVAL_MS)).await;
    }
}

//! Local button bank
//!
//! Scans a set of active-low GPIO pins into the fusion layer. The pins are
//! paired with their logical button at construction; the scan itself is a
//! dumb loop so the polling task stays trivial.

use pilotlink_core::debounce::Level;
use pilotlink_core::fusion::InputFusion;
use pilotlink_hal::InputPin;
use pilotlink_protocol::{ButtonId, BUTTON_COUNT};

/// All local button/joystick pins with their logical identities
pub struct ButtonBank<P> {
    pins: [(ButtonId, P); BUTTON_COUNT],
}

impl<P: InputPin> ButtonBank<P> {
    pub fn new(pins: [(ButtonId, P); BUTTON_COUNT]) -> Self {
        Self { pins }
    }

    /// Sample every pin once and feed the raw levels into `fusion`
    pub fn scan(&self, fusion: &mut InputFusion, now_ms: u64) {
        for (button, pin) in &self.pins {
            let level = if pin.is_low() { Level::Low } else { Level::High };
            fusion.sample_local(*button, level, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    use pilotlink_core::config::DebounceConfig;
    use pilotlink_core::debounce::Edge;
    use pilotlink_core::fusion::Source;

    struct MockPin {
        high: Cell<bool>,
    }

    impl MockPin {
        fn released() -> Self {
            MockPin {
                high: Cell::new(true),
            }
        }
    }

    impl InputPin for MockPin {
        fn is_high(&self) -> bool {
            self.high.get()
        }
    }

    fn bank() -> ButtonBank<MockPin> {
        ButtonBank::new(core::array::from_fn(|i| {
            (ButtonId::ALL[i], MockPin::released())
        }))
    }

    #[test]
    fn test_idle_bank_emits_nothing() {
        let bank = bank();
        let mut fusion = InputFusion::new(DebounceConfig::default());
        for t in 0..10 {
            bank.scan(&mut fusion, t * 10);
        }
        assert!(fusion.poll().is_empty());
    }

    #[test]
    fn test_held_pin_debounces_into_one_event() {
        let bank = bank();
        let mut fusion = InputFusion::new(DebounceConfig::default());
        // Key2 goes low and stays low across the scan loop
        bank.pins
            .iter()
            .find(|(b, _)| *b == ButtonId::Key2)
            .unwrap()
            .1
            .high
            .set(false);
        for t in 0..10 {
            bank.scan(&mut fusion, t * 10);
        }
        let events = fusion.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].button, ButtonId::Key2);
        assert_eq!(events[0].edge, Edge::Pressed);
        assert_eq!(events[0].source, Source::Local);
    }
}

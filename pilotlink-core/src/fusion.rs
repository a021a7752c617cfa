//! Input fusion layer
//!
//! Merges two independent input sources into one logical event stream:
//! local GPIO samples and remote button messages forwarded over the serial
//! link. Each source gets its own debounce state per button, so a bouncy
//! local pin can never mask a clean remote edge and vice versa.
//!
//! Remote edges were already debounced at the transmitting end, so their
//! debouncers run with a zero window: a genuine transition passes on the
//! message that carries it, while duplicate retransmits collapse against
//! the last stable level.
//!
//! There is no shared clock between the two devices. Events are ordered by
//! arrival within each source; the consumer decides precedence between
//! sources on conflicting simultaneous presses.

use heapless::Deque;

use pilotlink_protocol::{ButtonId, ButtonMsg, BUTTON_COUNT};

use crate::config::DebounceConfig;
use crate::debounce::{Debouncer, Edge, Level};

/// Bounded depth of the fused event queue
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Window used for the defensive re-debounce of remote edges
const REMOTE_WINDOW_MS: u64 = 0;

/// Which device produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    /// Sampled from this device's own GPIO
    Local,
    /// Forwarded over the serial link by the peer
    Remote,
}

/// One debounced button transition, ready for menu logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputEvent {
    pub source: Source,
    pub button: ButtonId,
    pub edge: Edge,
    /// Arrival timestamp on this device, milliseconds
    pub timestamp_ms: u64,
}

/// Merges local and remote button edges into one event stream
///
/// Owned by the application and passed by handle into whatever consumes
/// events; there is no global state.
pub struct InputFusion {
    local: [Debouncer; BUTTON_COUNT],
    remote: [Debouncer; BUTTON_COUNT],
    events: Deque<InputEvent, EVENT_QUEUE_DEPTH>,
    /// Events discarded because the queue was full
    overflowed: u32,
}

impl InputFusion {
    /// Create a fusion layer with every button released on both sources
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            local: core::array::from_fn(|_| Debouncer::new(config.window_ms)),
            remote: core::array::from_fn(|_| Debouncer::new(REMOTE_WINDOW_MS)),
            events: Deque::new(),
            overflowed: 0,
        }
    }

    /// Feed one raw local GPIO sample
    ///
    /// Call once per pin per polling tick with the pin's current level.
    pub fn sample_local(&mut self, button: ButtonId, level: Level, now_ms: u64) {
        if let Some(edge) = self.local[button.index()].sample(level, now_ms) {
            self.push(InputEvent {
                source: Source::Local,
                button,
                edge,
                timestamp_ms: now_ms,
            });
        }
    }

    /// Feed one remote button message decoded from the link
    pub fn push_remote(&mut self, msg: &ButtonMsg, now_ms: u64) {
        let level = Level::from_pressed(msg.pressed);
        if let Some(edge) = self.remote[msg.button.index()].sample(level, now_ms) {
            self.push(InputEvent {
                source: Source::Remote,
                button: msg.button,
                edge,
                timestamp_ms: now_ms,
            });
        }
    }

    /// Current stable level of a button as seen by one source
    pub fn stable_level(&self, source: Source, button: ButtonId) -> Level {
        match source {
            Source::Local => self.local[button.index()].stable_level(),
            Source::Remote => self.remote[button.index()].stable_level(),
        }
    }

    /// True if either source currently holds the button pressed
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.stable_level(Source::Local, button).is_pressed()
            || self.stable_level(Source::Remote, button).is_pressed()
    }

    /// Pop the oldest pending event
    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    /// Drain all pending events, oldest first
    pub fn poll(&mut self) -> heapless::Vec<InputEvent, EVENT_QUEUE_DEPTH> {
        let mut out = heapless::Vec::new();
        while let Some(event) = self.events.pop_front() {
            // Cannot fail: out has the same capacity as the queue
            let _ = out.push(event);
        }
        out
    }

    /// Number of events dropped due to queue overflow
    pub fn overflow_count(&self) -> u32 {
        self.overflowed
    }

    fn push(&mut self, event: InputEvent) {
        // Drop-oldest: the freshest edges are the ones menu logic wants
        if self.events.is_full() {
            self.events.pop_front();
            self.overflowed = self.overflowed.saturating_add(1);
        }
        let _ = self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fusion() -> InputFusion {
        InputFusion::new(DebounceConfig::default())
    }

    /// Hold a local level long enough to commit
    fn hold_local(f: &mut InputFusion, button: ButtonId, level: Level, from_ms: u64) {
        for i in 0..7 {
            f.sample_local(button, level, from_ms + i * 10);
        }
    }

    #[test]
    fn test_local_press_produces_one_event() {
        let mut f = fusion();
        hold_local(&mut f, ButtonId::Up, Level::Low, 0);
        let events = f.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, Source::Local);
        assert_eq!(events[0].button, ButtonId::Up);
        assert_eq!(events[0].edge, Edge::Pressed);
    }

    #[test]
    fn test_remote_single_message_passes() {
        let mut f = fusion();
        f.push_remote(
            &ButtonMsg {
                button: ButtonId::Key1,
                pressed: true,
            },
            100,
        );
        let events = f.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, Source::Remote);
        assert_eq!(events[0].edge, Edge::Pressed);
        assert_eq!(events[0].timestamp_ms, 100);
    }

    #[test]
    fn test_remote_duplicate_retransmit_collapses() {
        let mut f = fusion();
        let press = ButtonMsg {
            button: ButtonId::Down,
            pressed: true,
        };
        f.push_remote(&press, 100);
        f.push_remote(&press, 120);
        f.push_remote(&press, 140);
        assert_eq!(f.poll().len(), 1);

        let release = ButtonMsg {
            button: ButtonId::Down,
            pressed: false,
        };
        f.push_remote(&release, 200);
        f.push_remote(&release, 210);
        let events = f.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].edge, Edge::Released);
    }

    #[test]
    fn test_sources_stay_independent() {
        let mut f = fusion();
        // Same logical button on both sources; neither masks the other
        hold_local(&mut f, ButtonId::Press, Level::Low, 0);
        f.push_remote(
            &ButtonMsg {
                button: ButtonId::Press,
                pressed: true,
            },
            30,
        );
        let events = f.poll();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| e.source == Source::Local));
        assert!(events.iter().any(|e| e.source == Source::Remote));
        assert!(f.is_pressed(ButtonId::Press));
    }

    #[test]
    fn test_local_chatter_filtered_remote_unaffected() {
        let mut f = fusion();
        // 20 ms local blip: below the window, no event
        f.sample_local(ButtonId::Left, Level::Low, 0);
        f.sample_local(ButtonId::Left, Level::Low, 10);
        f.sample_local(ButtonId::Left, Level::High, 20);
        f.push_remote(
            &ButtonMsg {
                button: ButtonId::Left,
                pressed: true,
            },
            25,
        );
        let events = f.poll();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, Source::Remote);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut f = fusion();
        // Alternate press/release remote messages to overflow the queue
        for i in 0..(EVENT_QUEUE_DEPTH as u64 + 4) {
            f.push_remote(
                &ButtonMsg {
                    button: ButtonId::Key4,
                    pressed: i % 2 == 0,
                },
                i * 10,
            );
        }
        assert_eq!(f.overflow_count(), 4);
        let events = f.poll();
        assert_eq!(events.len(), EVENT_QUEUE_DEPTH);
        // The newest event survived
        assert_eq!(
            events.last().unwrap().timestamp_ms,
            (EVENT_QUEUE_DEPTH as u64 + 3) * 10
        );
    }

    #[test]
    fn test_events_in_arrival_order() {
        let mut f = fusion();
        f.push_remote(
            &ButtonMsg {
                button: ButtonId::Up,
                pressed: true,
            },
            10,
        );
        f.push_remote(
            &ButtonMsg {
                button: ButtonId::Down,
                pressed: true,
            },
            20,
        );
        let events = f.poll();
        assert_eq!(events[0].button, ButtonId::Up);
        assert_eq!(events[1].button, ButtonId::Down);
    }
}

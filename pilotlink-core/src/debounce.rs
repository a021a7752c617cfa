//! Debounce engine
//!
//! Per-button edge detector with a minimum stable-time filter. Buttons are
//! wired active-low: a raw `Low` level means pressed. A raw level must hold
//! continuously for at least the debounce window before it is committed as
//! the new stable state; shorter chatter is absorbed without emitting
//! anything.

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_WINDOW_MS: u64 = 50;

/// Raw electrical level sampled from a pin or decoded from the wire
///
/// Active-low semantics are carried through every layer: `Low` means
/// pressed, `High` means released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// True if this level means "pressed" (active-low)
    pub fn is_pressed(self) -> bool {
        matches!(self, Level::Low)
    }

    /// Level corresponding to a pressed/released flag
    pub fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// A committed button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Pressed,
    Released,
}

/// Debounce state for one button from one source
///
/// Pure state machine: no clocks, no I/O. `now_ms` must be monotonically
/// non-decreasing across calls for the same instance.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u64,
    last_stable: Level,
    last_edge_ms: u64,
    candidate: Level,
    candidate_since_ms: u64,
}

impl Debouncer {
    /// Create a debouncer in the released state
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_stable: Level::High,
            last_edge_ms: 0,
            candidate: Level::High,
            candidate_since_ms: 0,
        }
    }

    /// Current committed stable level
    pub fn stable_level(&self) -> Level {
        self.last_stable
    }

    /// Timestamp of the last committed edge
    pub fn last_edge_ms(&self) -> u64 {
        self.last_edge_ms
    }

    /// Feed one raw sample; returns the committed edge, if any
    ///
    /// A changed raw level restarts the stability clock. Once the candidate
    /// level has been observed continuously for the full window and differs
    /// from the stable level, it commits and the corresponding edge is
    /// emitted exactly once. A zero window commits on the sample that
    /// observes the change, which is what the defensive re-debounce of
    /// already-debounced remote edges uses.
    pub fn sample(&mut self, raw: Level, now_ms: u64) -> Option<Edge> {
        if raw != self.candidate {
            self.candidate = raw;
            self.candidate_since_ms = now_ms;
        }

        if self.candidate != self.last_stable
            && now_ms.saturating_sub(self.candidate_since_ms) >= self.window_ms
        {
            self.last_stable = self.candidate;
            self.last_edge_ms = now_ms;
            return Some(if self.candidate.is_pressed() {
                Edge::Pressed
            } else {
                Edge::Released
            });
        }

        None
    }
}

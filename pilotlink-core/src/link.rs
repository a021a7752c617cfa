//! Link connection supervision
//!
//! Tracks whether the serial peer is reachable and gates reconnect
//! attempts to a fixed retry delay. Errors on an established link drop it
//! back to `Disconnected`; in-flight data for that attempt is abandoned
//! rather than replayed, the mirror path will produce a fresh frame soon
//! enough.

use crate::config::LinkConfig;

/// Connection lifecycle of the serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// No link; waiting out the retry delay
    Disconnected,
    /// An open attempt is in progress
    Connecting,
    /// Peer reachable, traffic flowing
    Connected,
}

/// Reconnect supervisor for one serial link
///
/// Pure state machine driven by caller-supplied timestamps, the same
/// convention the debounce engine uses.
#[derive(Debug)]
pub struct LinkSupervisor {
    state: LinkState,
    retry_delay_ms: u64,
    /// When the current delay started; meaningful only while disconnected
    down_since_ms: u64,
    /// Consecutive failed attempts since the last successful connect
    failures: u32,
}

impl LinkSupervisor {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            state: LinkState::Disconnected,
            retry_delay_ms: config.retry_delay_ms,
            down_since_ms: 0,
            failures: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Consecutive failures since the link last came up
    pub fn failure_count(&self) -> u32 {
        self.failures
    }

    /// True if a new connection attempt may start now
    ///
    /// The first attempt after construction is allowed immediately; after
    /// that the fixed retry delay applies. Returns false while an attempt
    /// is already in flight or the link is up.
    pub fn should_attempt(&self, now_ms: u64) -> bool {
        match self.state {
            LinkState::Disconnected => {
                self.failures == 0
                    || now_ms.saturating_sub(self.down_since_ms) >= self.retry_delay_ms
            }
            LinkState::Connecting | LinkState::Connected => false,
        }
    }

    /// Record that a connection attempt has started
    pub fn on_attempt(&mut self) {
        if self.state == LinkState::Disconnected {
            self.state = LinkState::Connecting;
        }
    }

    /// Record a successful connection
    pub fn on_connected(&mut self) {
        self.state = LinkState::Connected;
        self.failures = 0;
    }

    /// Record a failure; drops the link and starts the retry delay
    pub fn on_error(&mut self, now_ms: u64) {
        self.state = LinkState::Disconnected;
        self.down_since_ms = now_ms;
        self.failures = self.failures.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor() -> LinkSupervisor {
        LinkSupervisor::new(LinkConfig::default())
    }

    #[test]
    fn test_initial_attempt_is_immediate() {
        let s = supervisor();
        assert_eq!(s.state(), LinkState::Disconnected);
        assert!(s.should_attempt(0));
    }

    #[test]
    fn test_connect_cycle() {
        let mut s = supervisor();
        s.on_attempt();
        assert_eq!(s.state(), LinkState::Connecting);
        assert!(!s.should_attempt(10));
        s.on_connected();
        assert!(s.is_connected());
        assert!(!s.should_attempt(10));
    }

    #[test]
    fn test_error_gates_retry_by_fixed_delay() {
        let mut s = supervisor();
        s.on_attempt();
        s.on_error(1000);
        assert_eq!(s.state(), LinkState::Disconnected);
        assert!(!s.should_attempt(1500));
        assert!(!s.should_attempt(2999));
        assert!(s.should_attempt(3000));
    }

    #[test]
    fn test_failures_reset_on_connect() {
        let mut s = supervisor();
        s.on_attempt();
        s.on_error(0);
        s.on_attempt();
        s.on_error(2000);
        assert_eq!(s.failure_count(), 2);
        s.on_attempt();
        s.on_connected();
        assert_eq!(s.failure_count(), 0);
    }

    #[test]
    fn test_error_while_connected_drops_link() {
        let mut s = supervisor();
        s.on_attempt();
        s.on_connected();
        s.on_error(5000);
        assert_eq!(s.state(), LinkState::Disconnected);
        assert!(!s.should_attempt(6000));
        assert!(s.should_attempt(7000));
    }
}

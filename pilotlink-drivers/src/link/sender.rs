//! Mirror sender
//!
//! Outbound half of the host link. Frames are offered into a single-slot
//! queue and shipped by a periodic `tick`; the renderer never waits for
//! the UART. A slot already holding a frame is simply overwritten, so a
//! slow link shows the newest image late instead of every image later.

use pilotlink_core::config::{LinkConfig, MirrorConfig};
use pilotlink_core::framebuffer::FrameBuffer;
use pilotlink_core::link::{LinkState, LinkSupervisor};
use pilotlink_core::mirror::MirrorQueue;
use pilotlink_hal::UartTx;
use pilotlink_protocol::{encode_command, encode_frame, EncodeError};

/// Rate-bounded frame transmitter over one UART
pub struct MirrorSender<TX> {
    tx: TX,
    queue: MirrorQueue,
    config: MirrorConfig,
    supervisor: LinkSupervisor,
    last_sent_ms: Option<u64>,
    sent_frames: u32,
}

impl<TX: UartTx> MirrorSender<TX> {
    pub fn new(tx: TX, config: MirrorConfig, link: LinkConfig) -> Self {
        Self {
            tx,
            queue: MirrorQueue::new(),
            config,
            supervisor: LinkSupervisor::new(link),
            last_sent_ms: None,
            sent_frames: 0,
        }
    }

    /// Offer a frame for mirroring; replaces any unsent frame
    pub fn mirror(&mut self, frame: &FrameBuffer) {
        if !self.config.enabled {
            return;
        }
        self.queue.offer(frame.clone());
    }

    /// Attempt one transmission; returns true if a frame went out
    ///
    /// No-op when nothing is pending, when the tick rate says wait, or
    /// when a downed link is still inside its retry delay. A write error
    /// drops the frame on the floor and downs the link; by the time the
    /// retry delay has passed there will be a fresher frame to send.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.queue.is_pending() {
            return false;
        }
        if let Some(last) = self.last_sent_ms {
            if now_ms.saturating_sub(last) < self.config.tick_interval_ms() {
                return false;
            }
        }
        if !self.supervisor.is_connected() {
            if !self.supervisor.should_attempt(now_ms) {
                return false;
            }
            self.supervisor.on_attempt();
        }
        let frame = match self.queue.take() {
            Some(frame) => frame,
            None => return false,
        };
        let frame = frame.downsampled(self.config.downsample);
        let encoded = match encode_frame(frame.width(), frame.height(), frame.data()) {
            Ok(bytes) => bytes,
            Err(_) => {
                // Geometry was validated at construction; treat as a drop
                self.supervisor.on_error(now_ms);
                return false;
            }
        };
        match self
            .tx
            .write_blocking(&encoded)
            .and_then(|()| self.tx.flush())
        {
            Ok(()) => {
                self.supervisor.on_connected();
                self.last_sent_ms = Some(now_ms);
                self.sent_frames = self.sent_frames.saturating_add(1);
                true
            }
            Err(_) => {
                self.supervisor.on_error(now_ms);
                false
            }
        }
    }

    /// Send a command line immediately, outside the mirror rate limit
    pub fn send_command(&mut self, text: &str) -> Result<(), EncodeError> {
        let line = encode_command(text)?;
        if self.tx.write_blocking(&line).is_err() {
            // Same policy as frames: advisory traffic is never retried
            return Ok(());
        }
        Ok(())
    }

    pub fn link_state(&self) -> LinkState {
        self.supervisor.state()
    }

    /// Frames that were replaced in the slot before sending
    pub fn dropped_frames(&self) -> u32 {
        self.queue.dropped_count()
    }

    /// Frames actually written to the wire
    pub fn sent_frames(&self) -> u32 {
        self.sent_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    use pilotlink_core::config::{LinkConfig, MirrorConfig};
    use pilotlink_core::framebuffer::rgb565;

    struct MockTx {
        written: Vec<Vec<u8>>,
        fail: bool,
    }

    impl MockTx {
        fn new() -> Self {
            MockTx {
                written: Vec::new(),
                fail: false,
            }
        }
    }

    impl UartTx for MockTx {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.push(data.to_vec());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            if self.fail {
                Err(())
            } else {
                Ok(())
            }
        }
    }

    fn frame(color: u16) -> FrameBuffer {
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        fb.fill(color);
        fb
    }

    fn sender() -> MirrorSender<MockTx> {
        MirrorSender::new(MockTx::new(), MirrorConfig::default(), LinkConfig::default())
    }

    #[test]
    fn test_newest_frame_wins_end_to_end() {
        // Two frames queued between ticks: only the second reaches the wire
        let mut s = sender();
        s.mirror(&frame(0xAAAA));
        s.mirror(&frame(0xBBBB));
        assert!(s.tick(0));
        assert_eq!(s.tx.written.len(), 1);
        let wire = &s.tx.written[0];
        assert!(wire.starts_with(b"FRAME:4x4:"));
        // Payload carries the second frame's pixels
        assert_eq!(wire[10], 0xBB);
        assert_eq!(s.dropped_frames(), 1);
        assert_eq!(s.sent_frames(), 1);
        // Slot is empty now
        assert!(!s.tick(100));
    }

    #[test]
    fn test_tick_rate_is_bounded() {
        let mut s = sender();
        s.mirror(&frame(1));
        assert!(s.tick(0));
        s.mirror(&frame(2));
        // 60 Hz default: 16 ms minimum spacing
        assert!(!s.tick(10));
        assert!(s.tick(16));
    }

    #[test]
    fn test_write_error_drops_frame_and_downs_link() {
        let mut s = sender();
        s.tx.fail = true;
        s.mirror(&frame(1));
        assert!(!s.tick(0));
        assert_eq!(s.link_state(), LinkState::Disconnected);
        // Frame was consumed, not kept for retry
        s.tx.fail = false;
        assert!(!s.tick(1));

        // A fresh frame goes out once the retry delay has passed
        s.mirror(&frame(2));
        assert!(!s.tick(1000));
        assert!(s.tick(2000));
        assert_eq!(s.link_state(), LinkState::Connected);
        assert_eq!(s.tx.written.len(), 1);
        assert_eq!(s.tx.written[0][10], 0x00);
        assert_eq!(s.tx.written[0][11], 0x02);
    }

    #[test]
    fn test_disabled_mirror_ignores_frames() {
        let config = MirrorConfig {
            enabled: false,
            ..MirrorConfig::default()
        };
        let mut s = MirrorSender::new(MockTx::new(), config, LinkConfig::default());
        s.mirror(&frame(1));
        assert!(!s.tick(0));
        assert!(s.tx.written.is_empty());
    }

    #[test]
    fn test_downsample_blurs_before_encode() {
        let config = MirrorConfig {
            downsample: 2,
            ..MirrorConfig::default()
        };
        let mut s = MirrorSender::new(MockTx::new(), config, LinkConfig::default());
        let mut fb = FrameBuffer::new(4, 4).unwrap();
        fb.fill(rgb565(0, 0, 0));
        fb.set_pixel(0, 0, 0xFFFF);
        s.mirror(&fb);
        assert!(s.tick(0));
        let wire = &s.tx.written[0];
        let payload = &wire[b"FRAME:4x4:".len()..];
        // Top-left 2x2 block flattened to the (0,0) color
        assert_eq!(&payload[0..2], &[0xFF, 0xFF]);
        assert_eq!(&payload[2..4], &[0xFF, 0xFF]);
        assert_eq!(&payload[8..10], &[0xFF, 0xFF]);
    }

    #[test]
    fn test_send_command_is_immediate() {
        let mut s = sender();
        s.send_command("SPLASH").unwrap();
        assert_eq!(s.tx.written[0], b"CMD:SPLASH\n");
    }
}

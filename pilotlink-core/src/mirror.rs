//! Mirror frame handoff
//!
//! A single-slot queue between whoever renders frames and the task that
//! serializes them onto the link. The renderer must never block on a slow
//! UART, so enqueueing a frame while one is still pending simply replaces
//! it. Only the newest image matters; a stale frame is worthless the
//! moment a fresher one exists.

use crate::framebuffer::FrameBuffer;

/// Single-slot, drop-oldest frame queue
#[derive(Debug, Default)]
pub struct MirrorQueue {
    pending: Option<FrameBuffer>,
    /// Frames replaced before they were ever sent
    dropped: u32,
    /// Frames handed to the sender
    taken: u32,
}

impl MirrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a frame, replacing any frame still pending
    ///
    /// Never blocks and never fails.
    pub fn offer(&mut self, frame: FrameBuffer) {
        if self.pending.is_some() {
            self.dropped = self.dropped.saturating_add(1);
        }
        self.pending = Some(frame);
    }

    /// Take the pending frame, leaving the slot empty
    pub fn take(&mut self) -> Option<FrameBuffer> {
        let frame = self.pending.take();
        if frame.is_some() {
            self.taken = self.taken.saturating_add(1);
        }
        frame
    }

    /// True if a frame is waiting to be sent
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames that were replaced unsent
    pub fn dropped_count(&self) -> u32 {
        self.dropped
    }

    /// Frames handed off to the sender
    pub fn taken_count(&self) -> u32 {
        self.taken
    }
}

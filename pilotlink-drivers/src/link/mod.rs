//! Host-side link endpoints
//!
//! The host end of the serial link, split along the data paths:
//!
//! - [`ButtonBank`] scans local GPIO into the fusion layer
//! - [`LinkListener`] decodes inbound bytes (remote button edges, acks)
//! - [`MirrorSender`] pushes rate-bounded framebuffer snapshots out
//! - [`HostLink`] bundles all three behind the API the menu system calls

pub mod buttons;
pub mod listener;
pub mod sender;

pub use buttons::ButtonBank;
pub use listener::{LinkListener, LinkReport};
pub use sender::MirrorSender;

use pilotlink_core::config::{ConfigError, DebounceConfig, LinkConfig, MirrorConfig};
use pilotlink_core::framebuffer::FrameBuffer;
use pilotlink_core::fusion::{InputEvent, InputFusion, EVENT_QUEUE_DEPTH};
use pilotlink_core::link::LinkState;
use pilotlink_hal::{InputPin, UartRx, UartTx};
use pilotlink_protocol::{ButtonId, EncodeError};

/// The host end of the sync subsystem
///
/// Owns the fusion layer and both directions of the serial link. The menu
/// system drives it with a periodic `tick` and consumes events with
/// `read_input_events`; everything else is internal plumbing.
pub struct HostLink<TX, RX, P> {
    buttons: ButtonBank<P>,
    listener: LinkListener<RX>,
    sender: MirrorSender<TX>,
    fusion: InputFusion,
}

impl<TX, RX, P> HostLink<TX, RX, P>
where
    TX: UartTx,
    RX: UartRx,
    P: InputPin,
{
    /// Build the host endpoint, validating every config up front
    pub fn new(
        tx: TX,
        rx: RX,
        buttons: ButtonBank<P>,
        debounce: DebounceConfig,
        mirror: MirrorConfig,
        link: LinkConfig,
    ) -> Result<Self, ConfigError> {
        debounce.validate()?;
        mirror.validate()?;
        link.validate()?;
        Ok(Self {
            buttons,
            listener: LinkListener::new(rx),
            sender: MirrorSender::new(tx, mirror, link),
            fusion: InputFusion::new(debounce),
        })
    }

    /// One run-loop iteration: scan pins, drain the wire, service the mirror
    ///
    /// Receive errors are transient by policy; they are counted in the
    /// report and the loop keeps going.
    pub fn tick(&mut self, now_ms: u64) -> LinkReport {
        self.buttons.scan(&mut self.fusion, now_ms);
        let report = self.listener.poll(&mut self.fusion, now_ms);
        self.sender.tick(now_ms);
        report
    }

    /// Drain all pending debounced input events, oldest first
    pub fn read_input_events(&mut self) -> heapless::Vec<InputEvent, EVENT_QUEUE_DEPTH> {
        self.fusion.poll()
    }

    /// Queue a frame for mirroring; never blocks
    pub fn send_frame(&mut self, frame: &FrameBuffer) {
        self.sender.mirror(frame);
    }

    /// Send a command line to the peripheral immediately
    pub fn send_command(&mut self, text: &str) -> Result<(), EncodeError> {
        self.sender.send_command(text)
    }

    /// True if the button is held on either source
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.fusion.is_pressed(button)
    }

    pub fn link_state(&self) -> LinkState {
        self.sender.link_state()
    }

    pub fn fusion(&self) -> &InputFusion {
        &self.fusion
    }
}

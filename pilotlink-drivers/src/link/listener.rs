//! Inbound link listener
//!
//! Pulls whatever bytes the UART has, feeds them through the wire decoder,
//! and routes the results: button edges into the fusion layer, everything
//! else into counters the caller can log. Partial messages simply stay
//! buffered until more bytes arrive.

use pilotlink_core::fusion::InputFusion;
use pilotlink_hal::UartRx;
use pilotlink_protocol::{CommandMsg, Decoder, WireMessage};

/// Read buffer for one poll pass
const READ_CHUNK: usize = 256;

/// What one poll pass observed on the wire
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkReport {
    /// Remote button messages routed into fusion
    pub buttons: u32,
    /// Advisory acknowledgments seen
    pub acks: u32,
    /// Frames seen (unexpected inbound on the host; discarded)
    pub frames: u32,
    /// Malformed spans the decoder resynced past
    pub decode_errors: u32,
    /// Reads that failed at the UART layer
    pub io_errors: u32,
    /// Last command line seen this pass, if any
    pub command: Option<CommandMsg>,
}

/// Decodes the inbound byte stream into fusion events and counters
pub struct LinkListener<RX> {
    rx: RX,
    decoder: Decoder,
}

impl<RX: UartRx> LinkListener<RX> {
    pub fn new(rx: RX) -> Self {
        Self {
            rx,
            decoder: Decoder::new(),
        }
    }

    /// Drain the UART and decode everything currently decodable
    ///
    /// A failed read ends the pass; whatever was buffered before the
    /// failure is still decoded. The error itself is only counted, the
    /// next pass starts clean.
    pub fn poll(&mut self, fusion: &mut InputFusion, now_ms: u64) -> LinkReport {
        let mut report = LinkReport::default();
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match self.rx.read_blocking(&mut buf) {
                Ok(0) => break,
                Ok(n) => self.decoder.extend(&buf[..n]),
                Err(_) => {
                    report.io_errors += 1;
                    break;
                }
            }
        }
        loop {
            match self.decoder.decode() {
                Ok(Some(WireMessage::Button(msg))) => {
                    report.buttons += 1;
                    fusion.push_remote(&msg, now_ms);
                }
                Ok(Some(WireMessage::Ack)) => report.acks += 1,
                Ok(Some(WireMessage::Frame(_))) => report.frames += 1,
                Ok(Some(WireMessage::Command(msg))) => report.command = Some(msg),
                Ok(None) => break,
                Err(_) => report.decode_errors += 1,
            }
        }
        report
    }

    /// Bytes currently held waiting for the rest of a message
    pub fn buffered(&self) -> usize {
        self.decoder.buffered()
    }
}

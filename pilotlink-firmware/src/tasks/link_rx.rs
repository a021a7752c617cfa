//! Host link receive task
//!
//! Decodes the inbound byte stream from the host and routes the results:
//! frames to the display task (latest wins), commands to whoever they
//! address. Malformed spans are logged and skipped; the decoder resyncs
//! on its own.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use pilotlink_protocol::{Decoder, WireMessage};

use crate::channels::{ACK_REQUEST, FRAME_READY, LINK_ACTIVITY, SPLASH_REQUEST};

/// Buffer size for one UART read
const RX_CHUNK: usize = 512;

/// Link RX task - decodes host messages
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx<'static, UART0>) {
    info!("Link RX task started");

    let mut decoder = Decoder::new();
    let mut buf = [0u8; RX_CHUNK];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                decoder.extend(&buf[..n]);
                drain(&mut decoder);
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

/// Decode everything currently decodable
fn drain(decoder: &mut Decoder) {
    loop {
        match decoder.decode() {
            Ok(Some(msg)) => {
                LINK_ACTIVITY.signal(());
                dispatch(msg);
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Protocol error: {:?}", e);
            }
        }
    }
}

fn dispatch(msg: WireMessage) {
    match msg {
        WireMessage::Frame(frame) => {
            trace!("Frame received: {}x{}", frame.width, frame.height);
            FRAME_READY.signal(frame);
        }
        WireMessage::Command(cmd) => {
            debug!("Command: {}", cmd.text.as_str());
            if cmd.text.as_str() == "SPLASH" {
                SPLASH_REQUEST.signal(());
            }
            ACK_REQUEST.signal(());
        }
        WireMessage::Button(msg) => {
            // The host does not normally forward button edges back
            debug!("Unexpected button message from host: {:?}", msg);
        }
        WireMessage::Ack => {
            trace!("ACK received");
        }
    }
}

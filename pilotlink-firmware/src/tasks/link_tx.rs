//! Host link transmit task
//!
//! Serializes outbound traffic onto the UART: debounced button edges from
//! the scan task and PICO_ACK replies requested by the receive side.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use pilotlink_protocol::{encode_ack, encode_button};

use crate::channels::{ACK_REQUEST, BUTTON_EVENTS, LINK_ACTIVITY};

/// Link TX task - writes button edges and acks to the host
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Link TX task started");

    loop {
        match select(BUTTON_EVENTS.receive(), ACK_REQUEST.wait()).await {
            Either::First(msg) => {
                let line = encode_button(msg.button, msg.pressed);
                if let Err(e) = tx.write_all(&line).await {
                    // Transient by policy; the edge is lost, not retried
                    warn!("UART write error: {:?}", e);
                } else {
                    LINK_ACTIVITY.signal(());
                }
            }
            Either::Second(()) => {
                if let Err(e) = tx.write_all(encode_ack()).await {
                    warn!("UART write error: {:?}", e);
                }
            }
        }
    }
}

//! Display task
//!
//! Owns the ST7789 panel. Shows the splash screen at startup and on
//! request, and blits mirrored frames as they arrive. If the panel fails
//! to initialize the task degrades to draining frames so the link side
//! never backs up; input keeps working without a display.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::Delay;

use pilotlink_core::framebuffer::rgb565;
use pilotlink_drivers::St7789;

use crate::board::{ControlPin, DisplaySpi};
use crate::channels::{FRAME_READY, SPLASH_REQUEST};

pub type Panel = St7789<DisplaySpi, ControlPin, Delay>;

/// Display task - splash screen and mirrored frame blits
#[embassy_executor::task]
pub async fn display_task(mut panel: Panel) {
    info!("Display task started");

    if let Err(e) = panel.init() {
        warn!("Display init failed, running headless: {:?}", e);
        loop {
            // Keep consuming frames so the receive path stays healthy
            let _ = FRAME_READY.wait().await;
        }
    }
    info!("Display initialized");
    draw_splash(&mut panel);

    loop {
        match select(FRAME_READY.wait(), SPLASH_REQUEST.wait()).await {
            Either::First(frame) => {
                if let Err(e) = panel.blit(&frame.payload) {
                    warn!("Frame rejected: {:?}", e);
                }
            }
            Either::Second(()) => {
                info!("Splash requested");
                draw_splash(&mut panel);
            }
        }
    }
}

/// Boot banner: blue field with white and red bands
fn draw_splash(panel: &mut Panel) {
    let w = panel.width();
    let h = panel.height();
    let result = panel
        .fill(rgb565(0, 0, 128))
        .and_then(|()| panel.fill_rect(0, h / 3, w, h / 3 + 24, rgb565(255, 255, 255)))
        .and_then(|()| panel.fill_rect(0, 2 * h / 3, w, 2 * h / 3 + 8, rgb565(200, 0, 0)));
    if let Err(e) = result {
        warn!("Splash draw failed: {:?}", e);
    }
}

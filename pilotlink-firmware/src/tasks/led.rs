//! Status LED task
//!
//! Gives the on-board LED a short blink whenever link traffic moves in
//! either direction, so a dead link is visible at a glance.

use embassy_rp::gpio::Output;
use embassy_time::Timer;

use crate::channels::LINK_ACTIVITY;

/// LED task - blink on link activity
#[embassy_executor::task]
pub async fn led_task(mut led: Output<'static>) {
    loop {
        LINK_ACTIVITY.wait().await;
        led.set_high();
        Timer::after_millis(30).await;
        led.set_low();
    }
}

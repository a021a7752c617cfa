//! Inter-task communication channels
//!
//! Static channels and signals connecting the Embassy tasks. Button edges
//! go through a bounded channel so none are lost under normal load; frames
//! go through a Signal because only the newest image matters and a slow
//! blit must never back the receiver up.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use pilotlink_protocol::{ButtonMsg, FrameMsg};

/// Channel capacity for outbound button edges
const BUTTON_CHANNEL_SIZE: usize = 8;

/// Debounced local button edges waiting to be sent to the host
pub static BUTTON_EVENTS: Channel<CriticalSectionRawMutex, ButtonMsg, BUTTON_CHANNEL_SIZE> =
    Channel::new();

/// Latest decoded frame for the panel; overwritten by newer frames
pub static FRAME_READY: Signal<CriticalSectionRawMutex, FrameMsg> = Signal::new();

/// Host asked for the splash screen (CMD:SPLASH)
pub static SPLASH_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// A host message arrived that warrants a PICO_ACK reply
pub static ACK_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Link traffic indicator for the status LED
pub static LINK_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

//! Hardware drivers and link endpoints for the PilotLink sync subsystem
//!
//! Everything here is generic over the `pilotlink-hal` traits, so the same
//! code runs against embassy-rp peripherals on the Pico, Linux handles on
//! the host, and in-memory mocks in the test suites.
//!
//! - [`display`] - ST7789 windowed SPI driver
//! - [`link`] - host-side link endpoints (button bank, listener, mirror
//!   sender, and the `HostLink` facade that bundles them)

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod display;
pub mod link;

pub use display::{DisplayError, St7789};
pub use link::{ButtonBank, HostLink, LinkListener, LinkReport, MirrorSender};

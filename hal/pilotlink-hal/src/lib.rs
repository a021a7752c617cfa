//! PilotLink Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the synchronization subsystem is
//! written against. Both ends of the link program to the same seams: the
//! host binds them to Linux serial/GPIO handles, the peripheral firmware
//! binds them to embassy-rp peripherals, and the test suites bind them to
//! in-memory mocks.
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial communication
//! - [`spi::SpiBus`] - SPI bus operations (display data path)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;
pub mod uart;

pub use gpio::{InputPin, OutputPin};
pub use spi::SpiBus;
pub use uart::{Uart, UartRx, UartTx};

//! Board bindings
//!
//! Thin adapters that implement the `pilotlink-hal` traits on top of the
//! embassy-rp peripherals, so the generic drivers run unchanged on the
//! Pico 2.

use embassy_rp::gpio::{Input, Output};
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};

use pilotlink_hal::{InputPin, OutputPin, SpiBus};

/// Write-only SPI1 bound to the display data path
pub struct DisplaySpi {
    pub spi: Spi<'static, SPI1, Blocking>,
}

impl SpiBus for DisplaySpi {
    type Error = embassy_rp::spi::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.spi.blocking_write(data)
    }
}

/// A display control line (DC, RST, CS, BL)
pub struct ControlPin {
    pub pin: Output<'static>,
}

impl OutputPin for ControlPin {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }
}

/// An active-low button input with its pull-up enabled
pub struct ButtonPin {
    pub pin: Input<'static>,
}

impl InputPin for ButtonPin {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

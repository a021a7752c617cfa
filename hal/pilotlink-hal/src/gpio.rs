//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by platform-specific bindings (embassy-rp on the peripheral, sysfs/lgpio
//! wrappers on the host).

/// Digital output pin
///
/// Used for the display control lines (data/command select, reset,
/// chip-select, backlight) and the status LED.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Digital input pin
///
/// Button and joystick pins are wired active-low with pull-ups: a low read
/// means pressed.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

//! SPI bus abstractions
//!
//! The display data path is write-only: commands are single bytes, pixel
//! bursts are byte sequences. Reads are not needed by the ST7789 driver.

/// SPI bus master (write-only subset)
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity (CPOL)
    pub polarity_idle_high: bool,
    /// Clock phase (CPHA)
    pub phase_second_transition: bool,
}

impl Default for SpiConfig {
    fn default() -> Self {
        // ST7789 runs mode 0 at up to 62.5 MHz
        Self {
            frequency: 62_500_000,
            polarity_idle_high: false,
            phase_second_transition: false,
        }
    }
}

//! RGB565 framebuffer
//!
//! One full rendered image in the panel's native pixel format: 16 bits per
//! pixel, 5-6-5 bit layout, stored big-endian (high byte first) because
//! that is the order the ST7789 shifts pixels in.

use alloc::vec;
use alloc::vec::Vec;

/// Errors constructing or converting framebuffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameBufferError {
    /// Byte length does not equal `width * height * 2`
    LengthMismatch { expected: usize, actual: usize },
    /// Zero-sized dimensions
    InvalidDimensions,
}

/// Pack an RGB888 color into RGB565
pub fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

/// A packed RGB565 image owned by whoever rendered it last
///
/// The mirror path always copies before enqueueing, so a renderer may keep
/// mutating its own buffer while a previous snapshot is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Expected byte length for the given dimensions
    pub fn expected_len(width: u16, height: u16) -> usize {
        width as usize * height as usize * 2
    }

    /// Create a black framebuffer
    pub fn new(width: u16, height: u16) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 {
            return Err(FrameBufferError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            data: vec![0; Self::expected_len(width, height)],
        })
    }

    /// Wrap existing pixel data, validating its length
    pub fn from_bytes(width: u16, height: u16, data: Vec<u8>) -> Result<Self, FrameBufferError> {
        if width == 0 || height == 0 {
            return Err(FrameBufferError::InvalidDimensions);
        }
        let expected = Self::expected_len(width, height);
        if data.len() != expected {
            return Err(FrameBufferError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw big-endian RGB565 bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume into the raw byte payload
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Fill the whole image with one color
    pub fn fill(&mut self, color: u16) {
        let [hi, lo] = color.to_be_bytes();
        for pixel in self.data.chunks_exact_mut(2) {
            pixel[0] = hi;
            pixel[1] = lo;
        }
    }

    /// Set one pixel; out-of-bounds coordinates are ignored
    pub fn set_pixel(&mut self, x: u16, y: u16, color: u16) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 2;
        let [hi, lo] = color.to_be_bytes();
        self.data[idx] = hi;
        self.data[idx + 1] = lo;
    }

    /// Read one pixel
    pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 2;
        Some(u16::from_be_bytes([self.data[idx], self.data[idx + 1]]))
    }

    /// Integer downsample-then-upsample at native resolution
    ///
    /// Every `factor`-sized block is replaced by its top-left pixel. The
    /// output has the same dimensions, so the receiving side needs no
    /// special handling; the payload just compresses better and the image
    /// gets blockier. A factor of 1 returns an unmodified copy.
    pub fn downsampled(&self, factor: u8) -> FrameBuffer {
        let factor = factor.max(1) as u16;
        if factor == 1 {
            return self.clone();
        }
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let sx = (x / factor) * factor;
                let sy = (y / factor) * factor;
                // Source is always in bounds: sx <= x, sy <= y
                if let Some(color) = self.pixel(sx, sy) {
                    out.set_pixel(x, y, color);
                }
            }
        }
        out
    }
}

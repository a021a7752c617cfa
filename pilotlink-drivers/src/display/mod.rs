//! Display drivers

pub mod st7789;

pub use st7789::{DisplayError, St7789};

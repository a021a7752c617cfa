//! Configuration types
//!
//! Plain parameter structs handed to the components at construction time.
//! Each struct has a `validate` that rejects out-of-range values up front,
//! so a bad setting fails at startup instead of producing a half-working
//! link.

/// Configuration rejected by a range check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Debounce window outside 0..=1000 ms
    DebounceWindowOutOfRange,
    /// Mirror tick rate outside 1..=120 Hz
    MirrorTickOutOfRange,
    /// Downsample factor outside 1..=8
    DownsampleOutOfRange,
    /// Panel dimension zero or above the protocol maximum
    PanelGeometryOutOfRange,
    /// Unsupported baud rate
    BaudOutOfRange,
}

/// Physical panel dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    pub width: u16,
    pub height: u16,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        // 1.3" square panel
        Self {
            width: 240,
            height: 240,
        }
    }
}

impl PanelGeometry {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > pilotlink_protocol::MAX_FRAME_DIM
            || self.height > pilotlink_protocol::MAX_FRAME_DIM
        {
            return Err(ConfigError::PanelGeometryOutOfRange);
        }
        Ok(())
    }

    /// Byte length of one full frame at this geometry
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

/// Debounce engine parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Minimum stable time before a level commits, milliseconds
    pub window_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            window_ms: crate::debounce::DEFAULT_DEBOUNCE_WINDOW_MS,
        }
    }
}

impl DebounceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_ms > 1000 {
            return Err(ConfigError::DebounceWindowOutOfRange);
        }
        Ok(())
    }
}

/// Display mirroring parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MirrorConfig {
    /// Master switch; when off, `mirror` calls are cheap no-ops
    pub enabled: bool,
    /// Upper bound on transmitted frames per second
    pub tick_hz: u16,
    /// Integer block size for pre-send downsampling, 1 = full quality
    pub downsample: u8,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_hz: 60,
            downsample: 1,
        }
    }
}

impl MirrorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 || self.tick_hz > 120 {
            return Err(ConfigError::MirrorTickOutOfRange);
        }
        if self.downsample == 0 || self.downsample > 8 {
            return Err(ConfigError::DownsampleOutOfRange);
        }
        Ok(())
    }

    /// Minimum spacing between transmitted frames, milliseconds
    ///
    /// Saturates a zero rate to 1 Hz so an unvalidated config throttles
    /// instead of panicking.
    pub fn tick_interval_ms(&self) -> u64 {
        1000 / u64::from(self.tick_hz.max(1))
    }
}

/// Serial link parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub baud: u32,
    /// Fixed delay between reconnect attempts, milliseconds
    pub retry_delay_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: 115_200,
            retry_delay_ms: 2000,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Rates the UART hardware on both ends supports
        const SUPPORTED: [u32; 4] = [9600, 57_600, 115_200, 230_400];
        if !SUPPORTED.contains(&self.baud) {
            return Err(ConfigError::BaudOutOfRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PanelGeometry::default().validate().is_ok());
        assert!(DebounceConfig::default().validate().is_ok());
        assert!(MirrorConfig::default().validate().is_ok());
        assert!(LinkConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_geometry() {
        let geometry = PanelGeometry::default();
        assert_eq!(geometry.width, 240);
        assert_eq!(geometry.height, 240);
        assert_eq!(geometry.frame_len(), 115_200);
    }

    #[test]
    fn test_mirror_range_checks() {
        let mut mirror = MirrorConfig::default();
        mirror.tick_hz = 0;
        assert_eq!(mirror.validate(), Err(ConfigError::MirrorTickOutOfRange));
        mirror.tick_hz = 60;
        mirror.downsample = 9;
        assert_eq!(mirror.validate(), Err(ConfigError::DownsampleOutOfRange));
    }

    #[test]
    fn test_mirror_tick_interval() {
        let mirror = MirrorConfig::default();
        assert_eq!(mirror.tick_interval_ms(), 16);
        let slow = MirrorConfig {
            tick_hz: 10,
            ..mirror
        };
        assert_eq!(slow.tick_interval_ms(), 100);
        // Invalid rate saturates rather than dividing by zero
        let zero = MirrorConfig {
            tick_hz: 0,
            ..mirror
        };
        assert_eq!(zero.tick_interval_ms(), 1000);
    }

    #[test]
    fn test_geometry_rejects_oversize() {
        let geometry = PanelGeometry {
            width: 600,
            height: 240,
        };
        assert_eq!(
            geometry.validate(),
            Err(ConfigError::PanelGeometryOutOfRange)
        );
    }

    #[test]
    fn test_link_rejects_odd_baud() {
        let link = LinkConfig {
            baud: 12345,
            ..LinkConfig::default()
        };
        assert_eq!(link.validate(), Err(ConfigError::BaudOutOfRange));
    }

    #[test]
    fn test_debounce_window_cap() {
        let debounce = DebounceConfig { window_ms: 1001 };
        assert_eq!(
            debounce.validate(),
            Err(ConfigError::DebounceWindowOutOfRange)
        );
    }
}

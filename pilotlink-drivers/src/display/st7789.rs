//! ST7789 display driver
//!
//! Windowed SPI driver for the Waveshare 1.3" 240x240 panel. The controller
//! is write-only here: commands go out with DC low, parameters and pixel
//! data with DC high, chip-select framing each transfer.
//!
//! Pixel bursts are chunked so one SPI write never exceeds
//! [`CHUNK_BYTES`] and never splits a pixel across two writes.

use embedded_hal::delay::DelayNs;

use pilotlink_core::config::PanelGeometry;
use pilotlink_core::framebuffer::FrameBuffer;
use pilotlink_hal::{OutputPin, SpiBus};

/// Largest single SPI burst, in bytes (256 pixels)
pub const CHUNK_BYTES: usize = 512;

/// Controller command opcodes
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const PORCTRL: u8 = 0xB2;
    pub const GCTRL: u8 = 0xB7;
    pub const VCOMS: u8 = 0xBB;
    pub const LCMCTRL: u8 = 0xC0;
    pub const VDVVRHEN: u8 = 0xC2;
    pub const VRHS: u8 = 0xC3;
    pub const VDVS: u8 = 0xC4;
    pub const FRCTRL2: u8 = 0xC6;
    pub const PWCTRL1: u8 = 0xD0;
    pub const PVGAMCTRL: u8 = 0xE0;
    pub const NVGAMCTRL: u8 = 0xE1;
}

/// MADCTL values for 0/90/180/270 degree rotation
const ROTATIONS: [u8; 4] = [0x00, 0x60, 0xC0, 0xA0];

/// Errors from the display driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// The init script did not complete; the panel is unusable
    InitFailed,
    /// Pixel operation attempted before `init` succeeded
    NotInitialized,
    /// Blit payload length does not match the window
    InvalidBufferSize { expected: usize, actual: usize },
    /// Window outside the panel or with a zero-sized span
    InvalidWindow,
    /// SPI bus error after init
    Bus(E),
}

/// ST7789 over write-only SPI plus DC/RST/CS/BL control lines
pub struct St7789<SPI, PIN, DELAY> {
    spi: SPI,
    dc: PIN,
    rst: PIN,
    cs: PIN,
    bl: PIN,
    delay: DELAY,
    width: u16,
    height: u16,
    initialized: bool,
}

impl<SPI, PIN, DELAY> St7789<SPI, PIN, DELAY>
where
    SPI: SpiBus,
    PIN: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, dc: PIN, rst: PIN, cs: PIN, bl: PIN, delay: DELAY, geometry: PanelGeometry) -> Self {
        Self {
            spi,
            dc,
            rst,
            cs,
            bl,
            delay,
            width: geometry.width,
            height: geometry.height,
            initialized: false,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn write_cmd(&mut self, op: u8) -> Result<(), SPI::Error> {
        self.dc.set_low();
        self.cs.set_low();
        let result = self.spi.write(&[op]);
        self.cs.set_high();
        result
    }

    fn write_data(&mut self, data: &[u8]) -> Result<(), SPI::Error> {
        self.dc.set_high();
        self.cs.set_low();
        let result = self.spi.write(data);
        self.cs.set_high();
        result
    }

    fn command(&mut self, op: u8, params: &[u8]) -> Result<(), SPI::Error> {
        self.write_cmd(op)?;
        if !params.is_empty() {
            self.write_data(params)?;
        }
        Ok(())
    }

    /// Hardware reset pulse on the RST line
    fn reset(&mut self) {
        self.rst.set_high();
        self.delay.delay_ms(50);
        self.rst.set_low();
        self.delay.delay_ms(50);
        self.rst.set_high();
        self.delay.delay_ms(50);
    }

    /// Run the panel init script
    ///
    /// Any bus failure mid-script leaves the panel in an undefined state,
    /// so it is reported as `InitFailed` and the driver stays unusable.
    /// The rest of the system keeps running without a display.
    pub fn init(&mut self) -> Result<(), DisplayError<SPI::Error>> {
        self.reset();
        self.run_init_script().map_err(|_| DisplayError::InitFailed)?;
        self.bl.set_high();
        self.initialized = true;
        Ok(())
    }

    fn run_init_script(&mut self) -> Result<(), SPI::Error> {
        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);

        self.command(cmd::MADCTL, &[0x00])?;
        // RGB565
        self.command(cmd::COLMOD, &[0x05])?;
        self.command(cmd::PORCTRL, &[0x0C, 0x0C, 0x00, 0x33, 0x33])?;
        self.command(cmd::GCTRL, &[0x35])?;
        self.command(cmd::VCOMS, &[0x19])?;
        self.command(cmd::LCMCTRL, &[0x2C])?;
        self.command(cmd::VDVVRHEN, &[0x01])?;
        self.command(cmd::VRHS, &[0x12])?;
        self.command(cmd::VDVS, &[0x20])?;
        self.command(cmd::FRCTRL2, &[0x0F])?;
        self.command(cmd::PWCTRL1, &[0xA4, 0xA1])?;
        self.command(
            cmd::PVGAMCTRL,
            &[
                0xD0, 0x04, 0x0D, 0x11, 0x13, 0x2B, 0x3F, 0x54, 0x4C, 0x18, 0x0D, 0x0B, 0x1F,
                0x23,
            ],
        )?;
        self.command(
            cmd::NVGAMCTRL,
            &[
                0xD0, 0x04, 0x0C, 0x11, 0x13, 0x2C, 0x3F, 0x44, 0x51, 0x2F, 0x1F, 0x1F, 0x20,
                0x23,
            ],
        )?;
        self.command(cmd::INVON, &[])?;
        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(100);
        Ok(())
    }

    /// Set the active write window
    ///
    /// Ends are exclusive; the controller registers are inclusive, so the
    /// last written address is `x1 - 1` / `y1 - 1`.
    pub fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError<SPI::Error>> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        if x1 <= x0 || y1 <= y0 || x1 > self.width || y1 > self.height {
            return Err(DisplayError::InvalidWindow);
        }
        let xe = x1 - 1;
        let ye = y1 - 1;
        self.command(
            cmd::CASET,
            &[(x0 >> 8) as u8, x0 as u8, (xe >> 8) as u8, xe as u8],
        )
        .map_err(DisplayError::Bus)?;
        self.command(
            cmd::RASET,
            &[(y0 >> 8) as u8, y0 as u8, (ye >> 8) as u8, ye as u8],
        )
        .map_err(DisplayError::Bus)?;
        self.write_cmd(cmd::RAMWR).map_err(DisplayError::Bus)?;
        Ok(())
    }

    /// Stream pixel bytes into the current window
    ///
    /// `pixels` must hold whole big-endian RGB565 pixels. Bursts are capped
    /// at [`CHUNK_BYTES`] and always end on a pixel boundary.
    pub fn write_pixels(&mut self, pixels: &[u8]) -> Result<(), DisplayError<SPI::Error>> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.dc.set_high();
        self.cs.set_low();
        let mut result = Ok(());
        for chunk in pixels.chunks(CHUNK_BYTES) {
            if let Err(e) = self.spi.write(chunk) {
                result = Err(DisplayError::Bus(e));
                break;
            }
        }
        self.cs.set_high();
        result
    }

    /// Fill a rectangle with one color; ends exclusive
    pub fn fill_rect(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error>> {
        self.set_window(x0, y0, x1, y1)?;
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; CHUNK_BYTES];
        for pixel in chunk.chunks_exact_mut(2) {
            pixel[0] = hi;
            pixel[1] = lo;
        }
        let total = (x1 - x0) as usize * (y1 - y0) as usize * 2;
        self.dc.set_high();
        self.cs.set_low();
        let mut remaining = total;
        let mut result = Ok(());
        while remaining > 0 {
            let n = remaining.min(CHUNK_BYTES);
            if let Err(e) = self.spi.write(&chunk[..n]) {
                result = Err(DisplayError::Bus(e));
                break;
            }
            remaining -= n;
        }
        self.cs.set_high();
        result
    }

    /// Fill the whole panel with one color
    pub fn fill(&mut self, color: u16) -> Result<(), DisplayError<SPI::Error>> {
        self.fill_rect(0, 0, self.width, self.height, color)
    }

    /// Push one full frame of raw big-endian RGB565 bytes
    ///
    /// The payload length must match the panel exactly; a mismatched frame
    /// is rejected before any window is set, so nothing partial is drawn.
    pub fn blit(&mut self, pixels: &[u8]) -> Result<(), DisplayError<SPI::Error>> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        let expected = self.width as usize * self.height as usize * 2;
        if pixels.len() != expected {
            return Err(DisplayError::InvalidBufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        self.set_window(0, 0, self.width, self.height)?;
        self.write_pixels(pixels)
    }

    /// Push a [`FrameBuffer`] whose dimensions must match the panel
    pub fn show_frame(&mut self, frame: &FrameBuffer) -> Result<(), DisplayError<SPI::Error>> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(DisplayError::InvalidBufferSize {
                expected: self.width as usize * self.height as usize * 2,
                actual: frame.data().len(),
            });
        }
        self.blit(frame.data())
    }

    /// Rotate the panel in 90 degree steps
    pub fn set_rotation(&mut self, quarter_turns: u8) -> Result<(), DisplayError<SPI::Error>> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.command(cmd::MADCTL, &[ROTATIONS[(quarter_turns % 4) as usize]])
            .map_err(DisplayError::Bus)
    }

    /// Switch the backlight line
    pub fn backlight(&mut self, on: bool) {
        self.bl.set_state(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// Records every SPI write along with the DC level at the time
    #[derive(Default)]
    struct BusLog {
        writes: Vec<(bool, Vec<u8>)>,
        fail_after: Option<usize>,
    }

    #[derive(Clone)]
    struct SharedLog(Rc<RefCell<BusLog>>);

    impl SharedLog {
        fn new() -> Self {
            SharedLog(Rc::new(RefCell::new(BusLog::default())))
        }
    }

    struct MockSpi {
        log: SharedLog,
        dc: MockPin,
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            let mut log = self.log.0.borrow_mut();
            if let Some(limit) = log.fail_after {
                if log.writes.len() >= limit {
                    return Err(());
                }
            }
            let dc_high = self.dc.level.get();
            log.writes.push((dc_high, data.to_vec()));
            Ok(())
        }
    }

    #[derive(Clone)]
    struct MockPin {
        level: Rc<core::cell::Cell<bool>>,
    }

    impl MockPin {
        fn new() -> Self {
            MockPin {
                level: Rc::new(core::cell::Cell::new(false)),
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.level.set(true);
        }
        fn set_low(&mut self) {
            self.level.set(false);
        }
    }

    struct MockDelay;

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn display(log: &SharedLog) -> St7789<MockSpi, MockPin, MockDelay> {
        let dc = MockPin::new();
        let spi = MockSpi {
            log: log.clone(),
            dc: dc.clone(),
        };
        St7789::new(
            spi,
            dc,
            MockPin::new(),
            MockPin::new(),
            MockPin::new(),
            MockDelay,
            PanelGeometry::default(),
        )
    }

    /// Commands recorded with DC low, in order
    fn commands(log: &SharedLog) -> Vec<u8> {
        log.0
            .borrow()
            .writes
            .iter()
            .filter(|(dc, _)| !dc)
            .map(|(_, bytes)| bytes[0])
            .collect()
    }

    /// Data bytes recorded immediately after the given command
    fn params_after(log: &SharedLog, op: u8) -> Option<Vec<u8>> {
        let log = log.0.borrow();
        let pos = log
            .writes
            .iter()
            .position(|(dc, bytes)| !dc && bytes[0] == op)?;
        log.writes
            .get(pos + 1)
            .filter(|(dc, _)| *dc)
            .map(|(_, bytes)| bytes.clone())
    }

    #[test]
    fn test_init_script_order() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        let ops = commands(&log);
        assert_eq!(ops[0], cmd::SWRESET);
        assert_eq!(ops[1], cmd::SLPOUT);
        assert_eq!(*ops.last().unwrap(), cmd::DISPON);
        assert!(ops.contains(&cmd::INVON));
        assert_eq!(params_after(&log, cmd::COLMOD), Some(vec![0x05]));
        assert_eq!(
            params_after(&log, cmd::PORCTRL),
            Some(vec![0x0C, 0x0C, 0x00, 0x33, 0x33])
        );
        assert!(panel.is_initialized());
    }

    #[test]
    fn test_init_failure_is_fatal_for_panel_only() {
        let log = SharedLog::new();
        log.0.borrow_mut().fail_after = Some(3);
        let mut panel = display(&log);
        assert_eq!(panel.init(), Err(DisplayError::InitFailed));
        assert!(!panel.is_initialized());
        // Pixel paths refuse to touch the bus afterwards
        assert_eq!(panel.fill(0), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_window_registers_are_inclusive() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        panel.set_window(0, 0, 240, 240).unwrap();
        // Exclusive end 240 becomes inclusive register value 239
        assert_eq!(
            params_after(&log, cmd::CASET),
            Some(vec![0x00, 0x00, 0x00, 0xEF])
        );
        assert_eq!(
            params_after(&log, cmd::RASET),
            Some(vec![0x00, 0x00, 0x00, 0xEF])
        );
        let ops = commands(&log);
        assert_eq!(*ops.last().unwrap(), cmd::RAMWR);
    }

    #[test]
    fn test_window_rejects_bad_spans() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        assert_eq!(
            panel.set_window(10, 0, 10, 240),
            Err(DisplayError::InvalidWindow)
        );
        assert_eq!(
            panel.set_window(0, 0, 241, 240),
            Err(DisplayError::InvalidWindow)
        );
    }

    #[test]
    fn test_pixel_bursts_never_split_a_pixel() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        log.0.borrow_mut().writes.clear();
        // 700 pixels: expect 512 + 512 + 376 byte bursts
        let pixels = vec![0u8; 700 * 2];
        panel.set_window(0, 0, 240, 3).unwrap();
        panel.write_pixels(&pixels).unwrap();
        let data_writes: Vec<usize> = log
            .0
            .borrow()
            .writes
            .iter()
            .filter(|(dc, _)| *dc)
            .map(|(_, bytes)| bytes.len())
            .collect();
        // Skip the CASET/RASET parameter writes
        let bursts = &data_writes[2..];
        assert_eq!(bursts, &[512, 512, 376]);
        assert!(bursts.iter().all(|len| len % 2 == 0));
    }

    #[test]
    fn test_blit_rejects_wrong_length_before_drawing() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        log.0.borrow_mut().writes.clear();
        let err = panel.blit(&vec![0u8; 100]).unwrap_err();
        assert_eq!(
            err,
            DisplayError::InvalidBufferSize {
                expected: 115_200,
                actual: 100,
            }
        );
        // Nothing reached the bus
        assert!(log.0.borrow().writes.is_empty());
    }

    #[test]
    fn test_blit_length_contract_small_panel() {
        let log = SharedLog::new();
        let dc = MockPin::new();
        let spi = MockSpi {
            log: log.clone(),
            dc: dc.clone(),
        };
        let mut panel = St7789::new(
            spi,
            dc,
            MockPin::new(),
            MockPin::new(),
            MockPin::new(),
            MockDelay,
            PanelGeometry {
                width: 40,
                height: 40,
            },
        );
        panel.init().unwrap();
        assert!(panel.blit(&vec![0u8; 40 * 40 * 2]).is_ok());
        assert_eq!(
            panel.blit(&vec![0u8; 39 * 40 * 2]),
            Err(DisplayError::InvalidBufferSize {
                expected: 40 * 40 * 2,
                actual: 39 * 40 * 2,
            })
        );
    }

    #[test]
    fn test_fill_sends_exact_pixel_count() {
        let log = SharedLog::new();
        let mut panel = display(&log);
        panel.init().unwrap();
        log.0.borrow_mut().writes.clear();
        panel.fill_rect(0, 0, 16, 16, 0xF800).unwrap();
        let total: usize = log
            .0
            .borrow()
            .writes
            .iter()
            .filter(|(dc, bytes)| *dc && bytes.len() > 4)
            .map(|(_, bytes)| bytes.len())
            .sum();
        assert_eq!(total, 16 * 16 * 2);
    }
}

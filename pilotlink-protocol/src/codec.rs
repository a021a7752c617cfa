//! Encoding and stream decoding for the wire protocol
//!
//! The decoder owns a growing byte accumulator. Frame payloads are raw
//! pixel bytes and may contain `0x0A`, so the decoder scans for the
//! `FRAME:` prefix first and reads the payload length-driven from the
//! declared dimensions; newline scanning only happens between frames.
//!
//! Truncated input is not an error: `decode` returns `Ok(None)` and the
//! caller keeps accumulating. A recognized-but-unparsable header or an
//! unrecognized line is dropped, the accumulator resynchronizes at the next
//! recognizable prefix or newline, and a [`DecodeError`] is returned so the
//! caller can log the discard.

use alloc::vec::Vec;
use heapless::Vec as HVec;

use crate::buttons::ButtonId;
use crate::messages::{ButtonMsg, CommandMsg, FrameMsg, WireMessage};

/// Prefix of the binary frame message
pub const FRAME_PREFIX: &[u8] = b"FRAME:";

/// Maximum accepted frame dimension (panels are 240x240 or 320x240)
pub const MAX_FRAME_DIM: u16 = 512;

/// Maximum encoded length of a text message line
pub const MAX_LINE_LEN: usize = 48;

/// Cap on the decode accumulator: the largest legal frame plus header slack
///
/// A stream carrying neither a newline nor a `FRAME:` prefix (a held line,
/// a baud mismatch) would otherwise accumulate forever.
pub const MAX_BUFFERED_BYTES: usize =
    MAX_FRAME_DIM as usize * MAX_FRAME_DIM as usize * 2 + MAX_LINE_LEN;

/// Errors raised while encoding messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Frame payload length does not match `width * height * 2`
    LengthMismatch { expected: usize, actual: usize },
    /// Frame dimensions are zero or exceed [`MAX_FRAME_DIM`]
    InvalidDimensions,
    /// Command text is too long or contains a newline
    InvalidCommand,
}

/// Errors raised while decoding the byte stream
///
/// All variants are recoverable: the decoder has already discarded the
/// offending bytes and resynchronized when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// `FRAME:` prefix recognized but the dimension header is unparsable
    BadFrameHeader,
    /// A `BTN:` line names a button outside the fixed set
    UnknownButton,
    /// A complete line matched no message kind
    UnknownLine,
    /// Accumulator exceeded [`MAX_BUFFERED_BYTES`]; oldest bytes discarded
    Overflow,
}

/// Encode a button edge as `BTN:<name>:PRESSED\n` / `BTN:<name>:RELEASED\n`
pub fn encode_button(button: ButtonId, pressed: bool) -> HVec<u8, MAX_LINE_LEN> {
    let mut out = HVec::new();
    // Bounded well below MAX_LINE_LEN, extends cannot fail
    let _ = out.extend_from_slice(b"BTN:");
    let _ = out.extend_from_slice(button.as_str().as_bytes());
    let _ = out.extend_from_slice(if pressed { b":PRESSED\n" } else { b":RELEASED\n" });
    out
}

/// Encode a command as `CMD:<text>\n`
pub fn encode_command(text: &str) -> Result<HVec<u8, MAX_LINE_LEN>, EncodeError> {
    if text.contains('\n') {
        return Err(EncodeError::InvalidCommand);
    }
    let mut out = HVec::new();
    out.extend_from_slice(b"CMD:")
        .map_err(|_| EncodeError::InvalidCommand)?;
    out.extend_from_slice(text.as_bytes())
        .map_err(|_| EncodeError::InvalidCommand)?;
    out.push(b'\n').map_err(|_| EncodeError::InvalidCommand)?;
    Ok(out)
}

/// The passive acknowledgment line
pub fn encode_ack() -> &'static [u8] {
    b"PICO_ACK\n"
}

/// Encode a framebuffer as `FRAME:<W>x<H>:` + payload + `\n`
///
/// The payload must be exactly `width * height * 2` bytes of RGB565 data.
/// The trailing newline is advisory; the decoder does not require it.
pub fn encode_frame(width: u16, height: u16, payload: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 || width > MAX_FRAME_DIM || height > MAX_FRAME_DIM {
        return Err(EncodeError::InvalidDimensions);
    }
    let expected = width as usize * height as usize * 2;
    if payload.len() != expected {
        return Err(EncodeError::LengthMismatch {
            expected,
            actual: payload.len(),
        });
    }

    let mut out = Vec::with_capacity(FRAME_PREFIX.len() + 12 + expected + 1);
    out.extend_from_slice(FRAME_PREFIX);
    push_decimal(&mut out, width);
    out.push(b'x');
    push_decimal(&mut out, height);
    out.push(b':');
    out.extend_from_slice(payload);
    out.push(b'\n');
    Ok(out)
}

/// Append a u16 in decimal ASCII
fn push_decimal(out: &mut Vec<u8>, mut value: u16) {
    let mut digits = [0u8; 5];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (value % 10) as u8;
        value /= 10;
        n += 1;
        if value == 0 {
            break;
        }
    }
    while n > 0 {
        n -= 1;
        out.push(digits[n]);
    }
}

/// Result of examining a frame header at the start of the accumulator
enum HeaderStatus {
    /// Header parsed; payload starts at `header_len`
    Complete {
        width: u16,
        height: u16,
        header_len: usize,
    },
    /// Header may still be valid but more bytes are needed
    Partial,
    /// Header cannot become valid
    Malformed,
}

/// Streaming decoder over a byte accumulator
///
/// Feed raw serial bytes with [`extend`](Decoder::extend), then call
/// [`decode`](Decoder::decode) until it returns `Ok(None)`.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: Vec<u8>,
}

impl Decoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes to the accumulator
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Drop the accumulator contents
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Try to decode the next message from the accumulator
    ///
    /// Returns `Ok(Some(msg))` for each complete message, `Ok(None)` when
    /// more bytes are needed, and `Err` when corrupt bytes were discarded
    /// (the decoder is already resynchronized; keep calling).
    pub fn decode(&mut self) -> Result<Option<WireMessage>, DecodeError> {
        loop {
            if self.buf.len() > MAX_BUFFERED_BYTES {
                // Undecodable backlog; shed the oldest bytes and keep the
                // tail, where any live traffic is.
                let excess = self.buf.len() - MAX_BUFFERED_BYTES;
                self.consume(excess);
                return Err(DecodeError::Overflow);
            }
            if self.buf.is_empty() {
                return Ok(None);
            }

            let frame_at = find_subslice(&self.buf, FRAME_PREFIX);

            if frame_at == Some(0) {
                match self.parse_frame_header() {
                    HeaderStatus::Complete {
                        width,
                        height,
                        header_len,
                    } => {
                        let payload_len = width as usize * height as usize * 2;
                        if self.buf.len() < header_len + payload_len {
                            return Ok(None);
                        }
                        let payload =
                            self.buf[header_len..header_len + payload_len].to_vec();
                        self.consume(header_len + payload_len);
                        return Ok(Some(WireMessage::Frame(FrameMsg {
                            width,
                            height,
                            payload,
                        })));
                    }
                    HeaderStatus::Partial => return Ok(None),
                    HeaderStatus::Malformed => {
                        // Drop the prefix so the scan moves past it
                        self.consume(FRAME_PREFIX.len());
                        return Err(DecodeError::BadFrameHeader);
                    }
                }
            }

            let newline = self.buf.iter().position(|&b| b == b'\n');

            match (frame_at, newline) {
                // Garbage (or a truncated line) directly before a frame
                // header: resynchronize at the prefix.
                (Some(f), Some(n)) if f < n => {
                    self.consume(f);
                    continue;
                }
                (Some(f), None) => {
                    self.consume(f);
                    continue;
                }
                (_, Some(n)) => {
                    let parsed = parse_line(&self.buf[..n]);
                    self.consume(n + 1);
                    match parsed? {
                        Some(msg) => return Ok(Some(msg)),
                        None => continue,
                    }
                }
                (None, None) => return Ok(None),
            }
        }
    }

    /// Parse the `FRAME:<W>x<H>:` header at the start of the accumulator
    fn parse_frame_header(&self) -> HeaderStatus {
        let (width, next) = match parse_dimension(&self.buf, FRAME_PREFIX.len(), b'x') {
            Ok(Some(v)) => v,
            Ok(None) => return HeaderStatus::Partial,
            Err(()) => return HeaderStatus::Malformed,
        };
        let (height, header_len) = match parse_dimension(&self.buf, next, b':') {
            Ok(Some(v)) => v,
            Ok(None) => return HeaderStatus::Partial,
            Err(()) => return HeaderStatus::Malformed,
        };
        HeaderStatus::Complete {
            width,
            height,
            header_len,
        }
    }

    fn consume(&mut self, n: usize) {
        self.buf.drain(..n);
    }
}

/// Parse one decimal dimension terminated by `term`
///
/// `Ok(None)` means the buffer ended mid-number (need more bytes).
fn parse_dimension(buf: &[u8], start: usize, term: u8) -> Result<Option<(u16, usize)>, ()> {
    let mut value: u32 = 0;
    let mut digits = 0;
    let mut i = start;
    loop {
        let Some(&b) = buf.get(i) else {
            return Ok(None);
        };
        if b == term {
            if digits == 0 || value == 0 {
                return Err(());
            }
            return Ok(Some((value as u16, i + 1)));
        }
        if !b.is_ascii_digit() || digits == 4 {
            return Err(());
        }
        value = value * 10 + (b - b'0') as u32;
        if value > MAX_FRAME_DIM as u32 {
            return Err(());
        }
        digits += 1;
        i += 1;
    }
}

/// Find the first occurrence of `needle` in `haystack`
fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Parse one newline-delimited message line (newline already stripped)
///
/// `Ok(None)` means the line carried nothing (blank line, e.g. the advisory
/// newline after a frame payload).
fn parse_line(line: &[u8]) -> Result<Option<WireMessage>, DecodeError> {
    let line = match line.split_last() {
        Some((&b'\r', rest)) => rest,
        _ => line,
    };
    if line.is_empty() {
        return Ok(None);
    }
    let text = core::str::from_utf8(line).map_err(|_| DecodeError::UnknownLine)?;

    if let Some(rest) = text.strip_prefix("BTN:") {
        let (name, action) = rest.split_once(':').ok_or(DecodeError::UnknownLine)?;
        let button = ButtonId::from_name(name).ok_or(DecodeError::UnknownButton)?;
        let pressed = match action {
            "PRESSED" => true,
            "RELEASED" => false,
            _ => return Err(DecodeError::UnknownLine),
        };
        return Ok(Some(WireMessage::Button(ButtonMsg { button, pressed })));
    }

    if let Some(rest) = text.strip_prefix("CMD:") {
        return Ok(Some(WireMessage::Command(CommandMsg::new(rest))));
    }

    if text == "PICO_ACK" || text == "ACK" {
        return Ok(Some(WireMessage::Ack));
    }

    // Legacy textual form: "<name> pressed" / "<name> released"
    if let Some((name, action)) = text.split_once(' ') {
        if let Some(button) = ButtonId::from_name(name) {
            let pressed = match action {
                "pressed" => true,
                "released" => false,
                _ => return Err(DecodeError::UnknownLine),
            };
            return Ok(Some(WireMessage::Button(ButtonMsg { button, pressed })));
        }
    }

    Err(DecodeError::UnknownLine)
}

//! Message types carried by the wire protocol
//!
//! Three text message kinds plus one binary message. Text messages are
//! newline-delimited; the frame message is length-prefixed by its declared
//! dimensions.

use alloc::vec::Vec;
use heapless::String;

use crate::buttons::ButtonId;

/// Maximum length of a command payload (`CMD:<text>`)
pub const MAX_COMMAND_LEN: usize = 32;

/// A debounced button edge forwarded over the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonMsg {
    pub button: ButtonId,
    /// True for PRESSED, false for RELEASED
    pub pressed: bool,
}

/// One full mirrored framebuffer
///
/// `payload` is RGB565 big-endian pixel data, exactly `width * height * 2`
/// bytes. The invariant is established by the decoder (length-driven read)
/// and by [`crate::codec::encode_frame`] (length validation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMsg {
    pub width: u16,
    pub height: u16,
    pub payload: Vec<u8>,
}

/// A host command for the peripheral (e.g. `CMD:SPLASH`)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandMsg {
    pub text: String<MAX_COMMAND_LEN>,
}

impl CommandMsg {
    /// Create a command, truncating to [`MAX_COMMAND_LEN`]
    pub fn new(text: &str) -> Self {
        let mut out = String::new();
        for ch in text.chars() {
            if out.push(ch).is_err() {
                break;
            }
        }
        Self { text: out }
    }

    /// The SPLASH command shown while the host boots
    pub fn splash() -> Self {
        Self::new("SPLASH")
    }
}

/// A decoded wire message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// Button edge (peripheral -> host)
    Button(ButtonMsg),
    /// Mirrored framebuffer (host -> peripheral)
    Frame(FrameMsg),
    /// Command (host -> peripheral)
    Command(CommandMsg),
    /// Passive acknowledgment, advisory only
    Ack,
}

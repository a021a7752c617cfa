//! PilotLink Serial Wire Protocol
//!
//! This crate defines the byte-stream protocol between the host SBC (menu
//! logic, primary display) and the Pico 2 peripheral (secondary display,
//! buttons/joystick). The protocol mixes newline-delimited text messages
//! with one length-prefixed binary message:
//!
//! ```text
//! BTN:<name>:PRESSED\n          button edge, peripheral -> host
//! BTN:<name>:RELEASED\n
//! FRAME:<W>x<H>:<W*H*2 bytes>   framebuffer mirror, host -> peripheral
//! CMD:<text>\n                  command, host -> peripheral
//! PICO_ACK\n / ACK\n            advisory acknowledgment
//! ```
//!
//! The frame payload is raw RGB565 pixel data and may contain `0x0A` bytes,
//! so the decoder reads it length-driven from the declared dimensions and
//! only scans for newlines between frames. Partial input is never an error;
//! the decoder simply asks for more bytes.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod buttons;
pub mod codec;
pub mod messages;

pub use buttons::{ButtonId, BUTTON_COUNT};
pub use codec::{
    encode_ack, encode_button, encode_command, encode_frame, DecodeError, Decoder, EncodeError,
    FRAME_PREFIX, MAX_BUFFERED_BYTES, MAX_FRAME_DIM,
};
pub use messages::{ButtonMsg, CommandMsg, FrameMsg, WireMessage, MAX_COMMAND_LEN};

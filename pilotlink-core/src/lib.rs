//! Board-agnostic core logic for the PilotLink sync subsystem
//!
//! This crate contains all synchronization logic that does not depend on
//! specific hardware implementations:
//!
//! - Debounce engine (per-button edge detection under electrical bounce)
//! - Input fusion (local GPIO + remote-forwarded edges, one event stream)
//! - Mirror queue (single-slot, drop-oldest frame handoff)
//! - RGB565 framebuffer type and integer downsampling
//! - Link state machine (reconnect supervision)
//! - Configuration type definitions and range checks
//!
//! Timestamps throughout are plain `u64` milliseconds supplied by the
//! caller; the crate never reads a clock itself.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod debounce;
pub mod framebuffer;
pub mod fusion;
pub mod link;
pub mod mirror;

pub use config::{ConfigError, DebounceConfig, LinkConfig, MirrorConfig, PanelGeometry};
pub use debounce::{Debouncer, Edge, Level};
pub use framebuffer::{FrameBuffer, FrameBufferError};
pub use fusion::{InputEvent, InputFusion, Source};
pub use link::{LinkState, LinkSupervisor};
pub use mirror::MirrorQueue;

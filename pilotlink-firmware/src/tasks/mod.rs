//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod display;
pub mod input;
pub mod led;
pub mod link_rx;
pub mod link_tx;

pub use display::display_task;
pub use input::input_task;
pub use led::led_task;
pub use link_rx::link_rx_task;
pub use link_tx::link_tx_task;

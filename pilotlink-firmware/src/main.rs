//! PilotLink - Peripheral Firmware
//!
//! Firmware for the Pico 2 (RP235x) display/input unit of a dual-device
//! pilot assistant. Drives a secondary ST7789 panel mirrored from the
//! host over UART and forwards debounced local button/joystick edges back
//! the other way.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pilotlink_core::config::PanelGeometry;
use pilotlink_drivers::St7789;
use pilotlink_protocol::ButtonId;

use crate::board::{ButtonPin, ControlPin, DisplaySpi};

// Heap allocator for frame payloads
#[global_allocator]
static HEAP: Heap = Heap::empty();

// One 240x240 RGB565 frame is 115200 bytes and the decoder can briefly
// hold two while a blit is pending
const HEAP_SIZE: usize = 256 * 1024;

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 1024]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PilotLink peripheral starting...");

    // Initialize heap allocator
    init_heap();

    // Initialize RP235x peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Host link on UART0, 115200 8N1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 1024]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for host link");

    // ST7789 on SPI1, write-only
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = 62_500_000;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let panel = St7789::new(
        DisplaySpi { spi },
        ControlPin {
            pin: Output::new(p.PIN_8, Level::Low),
        },
        ControlPin {
            pin: Output::new(p.PIN_12, Level::High),
        },
        ControlPin {
            pin: Output::new(p.PIN_9, Level::High),
        },
        ControlPin {
            pin: Output::new(p.PIN_13, Level::Low),
        },
        Delay,
        PanelGeometry::default(),
    );

    // Buttons and joystick, active-low with pull-ups
    let buttons = [
        (
            ButtonId::Up,
            ButtonPin {
                pin: Input::new(p.PIN_2, Pull::Up),
            },
        ),
        (
            ButtonId::Press,
            ButtonPin {
                pin: Input::new(p.PIN_3, Pull::Up),
            },
        ),
        (
            ButtonId::Key1,
            ButtonPin {
                pin: Input::new(p.PIN_15, Pull::Up),
            },
        ),
        (
            ButtonId::Left,
            ButtonPin {
                pin: Input::new(p.PIN_16, Pull::Up),
            },
        ),
        (
            ButtonId::Key2,
            ButtonPin {
                pin: Input::new(p.PIN_17, Pull::Up),
            },
        ),
        (
            ButtonId::Down,
            ButtonPin {
                pin: Input::new(p.PIN_18, Pull::Up),
            },
        ),
        (
            ButtonId::Key3,
            ButtonPin {
                pin: Input::new(p.PIN_19, Pull::Up),
            },
        ),
        (
            ButtonId::Right,
            ButtonPin {
                pin: Input::new(p.PIN_20, Pull::Up),
            },
        ),
        (
            ButtonId::Key4,
            ButtonPin {
                pin: Input::new(p.PIN_21, Pull::Up),
            },
        ),
    ];

    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(tasks::input_task(buttons)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::display_task(panel)).unwrap();
    spawner.spawn(tasks::led_task(led)).unwrap();

    info!("All tasks spawned");
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

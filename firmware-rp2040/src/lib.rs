//! GameCube controller port engine for RP2040.
//!
//! This crate provides the embedded side of the wired adapter: it answers
//! the console on up to four GameCube controller ports, serving the pad
//! or keyboard state kept in the adapter's wired buffers.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Receives console commands on each port's data line (PIO0)
//! 2. Dispatches them through [`nsi_proto::NsiEngine`] from the PIO interrupt
//! 3. Forwards rumble and game identification feedback to a task
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | Port 1   | 2    | Controller data line (SM0) |
//! | Port 2   | 3    | Controller data line (SM1) |
//! | Port 3   | 4    | Controller data line (SM2) |
//! | Port 4   | 5    | Controller data line (SM3) |
//! | LED      | 25   | On-board LED (rumble indicator) |
//!
//! # Architecture
//!
//! The protocol runs entirely in the `PIO0_IRQ_1` interrupt at the highest
//! priority; the console expects a reply within a few microseconds, which
//! rules out the async executor. Two Embassy tasks handle the slow side:
//!
//! - **Feedback Task**: Drains the engine's feedback queue and logs it
//! - **Rumble Task**: Mirrors the active rumble ports on the LED
//!
//! The tasks communicate through Embassy's [`Signal`](embassy_sync::signal::Signal)
//! with "latest value wins" semantics.
//!
//! # Modules
//!
//! - [`board`]: Pin assignment ([`board::PORT_MAP`])
//! - [`pio_bus`]: PIO-backed [`nsi_proto::PulseBus`] ([`PioPulseBus`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//!
//! # Re-exports
//!
//! This crate re-exports the engine and core types it wires together, so
//! the binary only needs to depend on this crate.

#![no_std]

pub use nsi_proto::{NsiConfig, NsiEngine, PulseBus};
pub use wired_core::{
    Config, FeedbackConsumer, FeedbackProducer, FeedbackQueue, FeedbackType, RawFeedback,
    SystemId, WiredAdapter, WiredDriver, WiredSystem, MAX_PORTS,
};

pub mod board;
pub mod pio_bus;

pub use pio_bus::PioPulseBus;

//! GameCube single-wire controller bus engine.
//!
//! The console talks to each controller port over one open-drain line,
//! with 4 µs bit cells and a fixed command/response framing. This crate
//! implements the device side of that protocol on top of a pulse-train
//! peripheral abstracted by [`PulseBus`], entirely from interrupt context.
//!
//! # Overview
//!
//! - [`symbol`]: Pulse symbols and the [`SymbolRam`] seam
//! - [`codec`]: Bytes to symbols and back, with table or XOR checksum
//! - [`crc`]: Per-bit table checksum
//! - [`bus`]: The [`PulseBus`] peripheral trait and status word geometry
//! - [`port`]: Port/channel/pin tables and per-port state
//! - [`trigger`]: Analog trigger to digital latch filter
//! - [`gc`]: GameCube report layout and turbo tables
//! - [`dispatch`]: Per-command handling
//! - [`engine`]: The interrupt router, [`NsiEngine`]
//!
//! # Example
//!
//! ```rust
//! use nsi_proto::codec::{decode, encode, Checksum};
//! use nsi_proto::symbol::Symbol;
//!
//! let mut ram = [Symbol::default(); 64];
//! let out = encode(&mut ram, 0, &[0x09, 0x00, 0x20], Checksum::Table, Symbol::STOP_BIT_2US);
//! assert_eq!(out.checksum, 0x85);
//! assert_eq!(ram[out.next], Symbol::STOP_BIT_2US);
//!
//! let mut back = [0u8; 3];
//! decode(&ram, 0, &mut back);
//! assert_eq!(back, [0x09, 0x00, 0x20]);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and engine logs (for embedded logging)
//! - **`log`**: Emit engine logs through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod fmt;

pub mod bus;
pub mod codec;
pub mod config;
pub mod crc;
pub mod dispatch;
pub mod engine;
pub mod gc;
pub mod port;
pub mod symbol;
pub mod trigger;

#[cfg(test)]
mod mock;

// Re-export main types at crate root
pub use bus::{ChannelConfig, Event, PulseBus};
pub use codec::{Checksum, Encoded};
pub use config::{ChecksumTrailer, NsiConfig};
pub use dispatch::Command;
pub use engine::NsiEngine;
pub use port::{port_map, PortMap, PortMapping, PortState};
pub use symbol::{Symbol, SymbolRam};
pub use trigger::TriggerLatch;

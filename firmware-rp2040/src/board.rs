//! Board wiring.
//!
//! | Port | GPIO | PIO0 state machine |
//! |------|------|--------------------|
//! | 1    | 2    | SM0 |
//! | 2    | 3    | SM1 |
//! | 3    | 4    | SM2 |
//! | 4    | 5    | SM3 |
//!
//! Each data line needs the console side's 3.3 V pull-up; the internal
//! pull-up is enabled as well so an unplugged port idles high.

use nsi_proto::{port_map, ChecksumTrailer, NsiConfig, PortMap};
use wired_core::MAX_PORTS;

/// Controller port data pins, port 1 first.
pub const PORT_PINS: [u8; MAX_PORTS] = [2, 3, 4, 5];

/// Port routing handed to the engine.
pub const PORT_MAP: PortMap = port_map(PORT_PINS);

/// Engine settings for this board.
///
/// Pad responses go out as payload and stop bit only, the framing real
/// controllers use; the console does not expect a checksum byte.
pub const NSI_CONFIG: NsiConfig = NsiConfig::new().with_checksum_trailer(ChecksumTrailer::Omit);

//! Wired console systems and driver selection.
//!
//! Every console the adapter can plug into gets its own protocol engine.
//! Engines expose the same three capabilities through [`WiredDriver`]:
//! bring-up, port-mask reconfiguration, and the interrupt-time protocol
//! tick. [`WiredSystem`] picks the engine once, from the configured
//! [`SystemId`], instead of indexing function tables on every call.

use crate::config::{Config, ConfigError};
use crate::types::WiredAdapter;

/// Wired systems known to the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemId {
    #[default]
    Auto = 0,
    Parallel1p,
    Parallel2p,
    Nes,
    Pce,
    Genesis,
    Snes,
    Cdi,
    Cd32,
    Real3do,
    Jaguar,
    Psx,
    Saturn,
    Pcfx,
    Jvs,
    N64,
    Dc,
    Ps2,
    Gc,
    WiiExt,
    Vb,
    Parallel1pOd,
    Parallel2pOd,
    SeaBoard,
}

/// Number of wired systems.
pub const WIRED_MAX: usize = 24;

const SYS_NAME: [&str; WIRED_MAX] = [
    "AUTO",
    "PARALLEL_1P_PP",
    "PARALLEL_2P_PP",
    "NES",
    "PCE",
    "MD-GENESIS",
    "SNES",
    "CD-i",
    "CD32",
    "3DO",
    "JAGUAR",
    "PSX",
    "SATURN",
    "PC-FX",
    "JVS",
    "N64",
    "DC",
    "PS2",
    "GC",
    "Wii-EXT",
    "VB",
    "PARALLEL_1P_OD",
    "PARALLEL_2P_OD",
    "SEA Board",
];

const SYS_ID: [SystemId; WIRED_MAX] = [
    SystemId::Auto,
    SystemId::Parallel1p,
    SystemId::Parallel2p,
    SystemId::Nes,
    SystemId::Pce,
    SystemId::Genesis,
    SystemId::Snes,
    SystemId::Cdi,
    SystemId::Cd32,
    SystemId::Real3do,
    SystemId::Jaguar,
    SystemId::Psx,
    SystemId::Saturn,
    SystemId::Pcfx,
    SystemId::Jvs,
    SystemId::N64,
    SystemId::Dc,
    SystemId::Ps2,
    SystemId::Gc,
    SystemId::WiiExt,
    SystemId::Vb,
    SystemId::Parallel1pOd,
    SystemId::Parallel2pOd,
    SystemId::SeaBoard,
];

impl SystemId {
    /// Display name of the system.
    #[must_use]
    pub const fn name(self) -> &'static str {
        SYS_NAME[self as usize]
    }
}

impl TryFrom<u8> for SystemId {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SYS_ID
            .get(value as usize)
            .copied()
            .ok_or(ConfigError::InvalidSystem(value))
    }
}

/// Capabilities every wired protocol engine provides.
///
/// `B` is the hardware the engine drives. All methods run to completion
/// without blocking; [`WiredDriver::on_interrupt`] is called from the
/// peripheral's interrupt handler.
pub trait WiredDriver<B: ?Sized> {
    /// Bring up the peripheral, pin routing and receive paths.
    fn init(&mut self, bus: &mut B);

    /// Route ports whose bit is set in `mask`, park the others.
    fn port_cfg(&mut self, bus: &mut B, mask: u16);

    /// Service every pending peripheral event.
    fn on_interrupt(&mut self, bus: &mut B, adapter: &mut WiredAdapter, config: &Config);
}

/// The wired system selected for this adapter.
///
/// Only the GameCube engine exists; every other id resolves to
/// [`WiredSystem::Unsupported`], whose capabilities do nothing.
#[derive(Debug)]
pub enum WiredSystem<Gc> {
    Gamecube(Gc),
    Unsupported(SystemId),
}

impl<Gc> WiredSystem<Gc> {
    /// Resolve `id` to its engine, building it only when supported.
    pub fn select(id: SystemId, gc: impl FnOnce() -> Gc) -> Self {
        match id {
            SystemId::Gc => WiredSystem::Gamecube(gc()),
            other => WiredSystem::Unsupported(other),
        }
    }

    /// System this selection stands for.
    #[must_use]
    pub fn id(&self) -> SystemId {
        match self {
            WiredSystem::Gamecube(_) => SystemId::Gc,
            WiredSystem::Unsupported(id) => *id,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.id().name()
    }
}

impl<B: ?Sized, Gc: WiredDriver<B>> WiredDriver<B> for WiredSystem<Gc> {
    fn init(&mut self, bus: &mut B) {
        if let WiredSystem::Gamecube(gc) = self {
            gc.init(bus);
        }
    }

    fn port_cfg(&mut self, bus: &mut B, mask: u16) {
        if let WiredSystem::Gamecube(gc) = self {
            gc.port_cfg(bus, mask);
        }
    }

    fn on_interrupt(&mut self, bus: &mut B, adapter: &mut WiredAdapter, config: &Config) {
        if let WiredSystem::Gamecube(gc) = self {
            gc.on_interrupt(bus, adapter, config);
        }
    }
}

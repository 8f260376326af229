//! Per-port output device configuration.

use crate::types::MAX_PORTS;

/// Error type for configuration decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown device mode byte.
    InvalidDevMode(u8),
    /// Unknown accessory mode byte.
    InvalidAccMode(u8),
    /// Unknown wired system id.
    InvalidSystem(u8),
    /// Port index out of range.
    InvalidPort(usize),
}

/// Device the adapter emulates on a port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DevMode {
    #[default]
    Pad,
    PadAlt,
    Keyboard,
    Mouse,
}

impl TryFrom<u8> for DevMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DevMode::Pad),
            1 => Ok(DevMode::PadAlt),
            2 => Ok(DevMode::Keyboard),
            3 => Ok(DevMode::Mouse),
            v => Err(ConfigError::InvalidDevMode(v)),
        }
    }
}

/// Accessory emulated alongside the device.
///
/// Only [`AccMode::Rumble`] reports rumble through feedback events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccMode {
    #[default]
    None,
    Mem,
    Rumble,
    Both,
}

impl TryFrom<u8> for AccMode {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccMode::None),
            1 => Ok(AccMode::Mem),
            2 => Ok(AccMode::Rumble),
            3 => Ok(AccMode::Both),
            v => Err(ConfigError::InvalidAccMode(v)),
        }
    }
}

/// Output configuration for one port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutCfg {
    pub dev_mode: DevMode,
    pub acc_mode: AccMode,
}

impl OutCfg {
    #[must_use]
    pub const fn new(dev_mode: DevMode, acc_mode: AccMode) -> Self {
        Self { dev_mode, acc_mode }
    }

    /// Decode from the persisted `[dev_mode, acc_mode]` byte pair.
    pub fn from_bytes(bytes: [u8; 2]) -> Result<Self, ConfigError> {
        Ok(Self {
            dev_mode: DevMode::try_from(bytes[0])?,
            acc_mode: AccMode::try_from(bytes[1])?,
        })
    }
}

/// Adapter configuration read by console engines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub out_cfg: [OutCfg; MAX_PORTS],
}

impl Config {
    /// Every port as a plain pad without accessory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            out_cfg: [OutCfg::new(DevMode::Pad, AccMode::None); MAX_PORTS],
        }
    }

    /// Replace one port's configuration.
    pub fn set_port(&mut self, port: usize, cfg: OutCfg) -> Result<(), ConfigError> {
        let slot = self
            .out_cfg
            .get_mut(port)
            .ok_or(ConfigError::InvalidPort(port))?;
        *slot = cfg;
        Ok(())
    }
}

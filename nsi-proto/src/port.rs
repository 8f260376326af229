//! Port to channel and pin mapping, and per-port engine state.

use crate::trigger::TriggerLatch;
use wired_core::MAX_PORTS;

/// Hardware channel pair per port. The engine uses the second channel for
/// both directions; the first is left to the peripheral's default mapping.
pub const NSI_CHANNELS: [[u8; 2]; MAX_PORTS] = [[0, 0], [1, 2], [2, 4], [3, 6]];

/// Port served by each peripheral channel.
pub const CHANNEL_PORT: [u8; 8] = [0, 0, 1, 1, 2, 2, 3, 3];

/// Physical routing of one port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortMapping {
    /// GPIO the controller connector's data line is wired to.
    pub pin: u8,
    /// Channel pair, see [`NSI_CHANNELS`].
    pub channels: [u8; 2],
}

impl PortMapping {
    #[must_use]
    pub const fn new(pin: u8, channels: [u8; 2]) -> Self {
        Self { pin, channels }
    }

    /// Channel carrying this port's traffic.
    #[inline]
    #[must_use]
    pub const fn channel(&self) -> u8 {
        self.channels[1]
    }
}

/// Board pin assignment for all ports.
pub type PortMap = [PortMapping; MAX_PORTS];

/// Build a port map from one data pin per port and the standard channels.
#[must_use]
pub const fn port_map(pins: [u8; MAX_PORTS]) -> PortMap {
    [
        PortMapping::new(pins[0], NSI_CHANNELS[0]),
        PortMapping::new(pins[1], NSI_CHANNELS[1]),
        PortMapping::new(pins[2], NSI_CHANNELS[2]),
        PortMapping::new(pins[3], NSI_CHANNELS[3]),
    ]
}

/// Port served by `channel`, if the channel exists.
#[inline]
#[must_use]
pub fn channel_to_port(channel: u8) -> Option<usize> {
    CHANNEL_PORT.get(channel as usize).map(|&p| p as usize)
}

/// Engine state kept per port across polls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortState {
    pub trig_l: TriggerLatch,
    pub trig_r: TriggerLatch,
    /// Rumble state last reported through feedback.
    pub last_rumble: u8,
    /// Completed poll exchanges, wrapping.
    pub frame_cnt: u32,
}

impl PortState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            trig_l: TriggerLatch::new(),
            trig_r: TriggerLatch::new(),
            last_rumble: 0,
            frame_cnt: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_to_port() {
        assert_eq!(channel_to_port(0), Some(0));
        assert_eq!(channel_to_port(2), Some(1));
        assert_eq!(channel_to_port(5), Some(2));
        assert_eq!(channel_to_port(6), Some(3));
        assert_eq!(channel_to_port(8), None);
    }

    #[test]
    fn test_active_channels_map_back_to_their_port() {
        for (port, pair) in NSI_CHANNELS.iter().enumerate() {
            assert_eq!(channel_to_port(pair[1]), Some(port));
        }
    }

    #[test]
    fn test_port_map() {
        let map = port_map([19, 5, 26, 27]);
        assert_eq!(map[1].pin, 5);
        assert_eq!(map[1].channel(), 2);
        assert_eq!(map[3].channel(), 6);
    }
}

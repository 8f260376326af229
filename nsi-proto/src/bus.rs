//! Pulse-train peripheral abstraction.
//!
//! The engine needs a peripheral with up to eight transmit/receive channels
//! sharing one symbol memory, and one interrupt status word with three event
//! bits per channel. [`PulseBus`] is that peripheral's register surface, cut
//! down to the operations the bus protocol uses.

use crate::symbol::SymbolRam;

/// Number of peripheral channels.
pub const CHANNEL_COUNT: usize = 8;

/// Symbols of memory owned by each channel.
pub const SYMBOLS_PER_CHANNEL: usize = 64;

/// Event bits per channel in the interrupt status word.
pub const EVENTS_PER_CHANNEL: u32 = 3;

/// Status bits that carry channel events; higher bits are never dispatched.
pub const EVENT_BITS: u32 = (1 << (CHANNEL_COUNT as u32 * EVENTS_PER_CHANNEL)) - 1;

/// Per-channel interrupt event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Transmission finished.
    TxDone,
    /// Receiver saw the idle gap that ends a command.
    RxDone,
    /// Receiver framing or noise error.
    RxError,
}

impl Event {
    /// Decode a status bit index into `(channel, event)`.
    ///
    /// Returns `None` for bits past the channel event range.
    #[inline]
    #[must_use]
    pub const fn from_status_bit(bit: u32) -> Option<(u8, Event)> {
        if bit >= CHANNEL_COUNT as u32 * EVENTS_PER_CHANNEL {
            return None;
        }
        let channel = (bit / EVENTS_PER_CHANNEL) as u8;
        let event = match bit % EVENTS_PER_CHANNEL {
            0 => Event::TxDone,
            1 => Event::RxDone,
            _ => Event::RxError,
        };
        Some((channel, event))
    }

    /// Status bit index of this event on `channel`.
    #[inline]
    #[must_use]
    pub const fn status_bit(self, channel: u8) -> u32 {
        channel as u32 * EVENTS_PER_CHANNEL
            + match self {
                Event::TxDone => 0,
                Event::RxDone => 1,
                Event::RxError => 2,
            }
    }
}

/// Status mask covering all three events of `channel`.
#[inline]
#[must_use]
pub const fn channel_event_mask(channel: u8) -> u32 {
    0b111 << (channel as u32 * EVENTS_PER_CHANNEL)
}

/// Index of the first symbol of `channel`'s memory block.
#[inline]
#[must_use]
pub const fn channel_base(channel: u8) -> usize {
    channel as usize * SYMBOLS_PER_CHANNEL
}

/// Static channel setup applied at bring-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Source clock divider; one tick of the divided clock is one symbol tick.
    pub clock_div: u8,
    /// Receive ends after the line stays idle this many ticks.
    pub idle_threshold: u16,
    /// Memory blocks the channel spans.
    pub mem_blocks: u8,
    /// Output level while not transmitting.
    pub idle_level: bool,
}

/// Register-level operations on the pulse-train peripheral.
///
/// Every method must be callable from interrupt context: no blocking, no
/// allocation, bounded time.
pub trait PulseBus {
    /// Symbol memory shared by all channels.
    type Ram: SymbolRam + ?Sized;

    /// Access the symbol memory.
    fn ram(&mut self) -> &mut Self::Ram;

    /// Apply the static configuration of `channel` and leave it idle.
    fn configure(&mut self, channel: u8, cfg: &ChannelConfig);

    /// Reset the receive pointer, give memory to hardware and enable receive.
    fn rx_rearm(&mut self, channel: u8);

    /// Disable receive, take memory back for software and reset the write pointer.
    fn rx_stop(&mut self, channel: u8);

    /// Start transmitting the symbols at the channel's memory block.
    fn tx_start(&mut self, channel: u8);

    /// Current interrupt status word.
    fn int_status(&mut self) -> u32;

    /// Clear the status bits set in `mask`.
    fn int_clear(&mut self, mask: u32);

    /// Enable the status bits set in `mask`.
    fn int_enable(&mut self, mask: u32);

    /// Disable the status bits set in `mask`.
    fn int_disable(&mut self, mask: u32);

    /// Connect `pin` to `channel` as an open-drain bidirectional bus line.
    fn route_pin(&mut self, pin: u8, channel: u8);

    /// Release `pin` and feed `channel`'s receiver a constant high level.
    fn park_pin(&mut self, pin: u8, channel: u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bit_decoding() {
        assert_eq!(Event::from_status_bit(0), Some((0, Event::TxDone)));
        assert_eq!(Event::from_status_bit(1), Some((0, Event::RxDone)));
        assert_eq!(Event::from_status_bit(2), Some((0, Event::RxError)));
        assert_eq!(Event::from_status_bit(7), Some((2, Event::RxDone)));
        assert_eq!(Event::from_status_bit(23), Some((7, Event::RxError)));
        assert_eq!(Event::from_status_bit(24), None);
        assert_eq!(Event::from_status_bit(31), None);
    }

    #[test]
    fn test_status_bit_round_trip_per_channel() {
        for channel in 0..CHANNEL_COUNT as u8 {
            for event in [Event::TxDone, Event::RxDone, Event::RxError] {
                let bit = event.status_bit(channel);
                assert_eq!(Event::from_status_bit(bit), Some((channel, event)));
                assert_ne!(channel_event_mask(channel) & (1 << bit), 0);
            }
        }
    }

    #[test]
    fn test_event_bits_cover_eight_channels() {
        assert_eq!(EVENT_BITS, 0x00FF_FFFF);
        assert_eq!(channel_event_mask(2), 0b111 << 6);
        assert_eq!(channel_base(6), 384);
    }
}

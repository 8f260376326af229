//! Engine configuration.

use crate::bus::ChannelConfig;

/// Whether table-checksum responses carry their checksum byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChecksumTrailer {
    /// Payload, checksum byte, stop symbol.
    #[default]
    Append,
    /// Payload and stop symbol only; the checksum is computed and dropped.
    Omit,
}

/// Static engine settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NsiConfig {
    pub checksum_trailer: ChecksumTrailer,
    /// Peripheral clock divider; 40 gives 0.5 µs ticks from 80 MHz.
    pub clock_div: u8,
    /// Idle ticks that end a receive. One bit period.
    pub idle_threshold: u16,
}

impl NsiConfig {
    pub const DEFAULT_CLOCK_DIV: u8 = 40;
    pub const DEFAULT_IDLE_THRESHOLD: u16 = 10;
    /// Memory blocks per active channel: its own and the idle odd one after it.
    pub const MEM_BLOCKS: u8 = 2;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            checksum_trailer: ChecksumTrailer::Append,
            clock_div: Self::DEFAULT_CLOCK_DIV,
            idle_threshold: Self::DEFAULT_IDLE_THRESHOLD,
        }
    }

    #[must_use]
    pub const fn with_checksum_trailer(mut self, trailer: ChecksumTrailer) -> Self {
        self.checksum_trailer = trailer;
        self
    }

    /// Per-channel setup derived from these settings.
    #[must_use]
    pub const fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            clock_div: self.clock_div,
            idle_threshold: self.idle_threshold,
            mem_blocks: Self::MEM_BLOCKS,
            idle_level: true,
        }
    }
}

impl Default for NsiConfig {
    fn default() -> Self {
        Self::new()
    }
}

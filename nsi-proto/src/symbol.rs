//! Pulse symbols and the symbol memory they live in.
//!
//! The pulse-train peripheral describes a waveform as a list of 32-bit
//! symbols, each holding two (level, duration) phases:
//!
//! ```text
//!  31   30..16      15   14..0
//! +----+----------+----+----------+
//! | L1 | DURATION1| L0 | DURATION0|
//! +----+----------+----+----------+
//! ```
//!
//! Durations count 0.5 µs ticks. A zero second duration ends a transmission.

/// One hardware pulse symbol.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbol(pub u32);

impl Symbol {
    /// Data `0`: 3 µs low, 1 µs high.
    pub const BIT_ZERO: Self = Self(0x8002_0006);
    /// Data `1`: 1 µs low, 3 µs high.
    pub const BIT_ONE: Self = Self(0x8006_0002);
    /// Device stop bit: 2 µs low, then end of transmission.
    pub const STOP_BIT_2US: Self = Self(0x8000_0004);
    /// Console stop bit: 1 µs low, then end of transmission.
    pub const STOP_BIT_1US: Self = Self(0x8000_0002);

    /// Any high phase of at least 2 µs decodes as a `1`.
    pub const BIT_ONE_MASK: u32 = 0x7FFC_0000;

    /// Build a symbol from its two phases.
    #[must_use]
    pub const fn new(level0: bool, duration0: u16, level1: bool, duration1: u16) -> Self {
        Self(
            (duration0 as u32 & 0x7FFF)
                | ((level0 as u32) << 15)
                | ((duration1 as u32 & 0x7FFF) << 16)
                | ((level1 as u32) << 31),
        )
    }

    #[inline]
    #[must_use]
    pub const fn duration0(self) -> u16 {
        (self.0 & 0x7FFF) as u16
    }

    #[inline]
    #[must_use]
    pub const fn level0(self) -> bool {
        self.0 & (1 << 15) != 0
    }

    #[inline]
    #[must_use]
    pub const fn duration1(self) -> u16 {
        ((self.0 >> 16) & 0x7FFF) as u16
    }

    #[inline]
    #[must_use]
    pub const fn level1(self) -> bool {
        self.0 & (1 << 31) != 0
    }

    /// Whether this captured symbol decodes as a `1` bit.
    #[inline]
    #[must_use]
    pub const fn is_one(self) -> bool {
        self.0 & Self::BIT_ONE_MASK != 0
    }

    /// Whether this symbol terminates a transmission.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.duration1() == 0
    }

    /// Symbol encoding a data bit.
    #[inline]
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Self::BIT_ONE
        } else {
            Self::BIT_ZERO
        }
    }
}

impl core::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Symbol({:#010x})", self.0)
    }
}

/// Indexed symbol storage the codec reads and writes.
///
/// Peripherals with memory-mapped symbol RAM implement this with volatile
/// accesses; host tests use a plain array.
pub trait SymbolRam {
    /// Number of addressable symbols.
    fn len(&self) -> usize;

    fn read(&self, index: usize) -> Symbol;

    fn write(&mut self, index: usize, symbol: Symbol);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SymbolRam for [Symbol] {
    #[inline]
    fn len(&self) -> usize {
        <[Symbol]>::len(self)
    }

    #[inline]
    fn read(&self, index: usize) -> Symbol {
        self[index]
    }

    #[inline]
    fn write(&mut self, index: usize, symbol: Symbol) {
        self[index] = symbol;
    }
}

impl<const N: usize> SymbolRam for [Symbol; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn read(&self, index: usize) -> Symbol {
        self[index]
    }

    #[inline]
    fn write(&mut self, index: usize, symbol: Symbol) {
        self[index] = symbol;
    }
}

//! Table checksum for device responses.
//!
//! Unlike a byte-wise CRC table, [`NSI_CRC_TABLE`] holds one entry per bit
//! position of the message: slot `k` is XORed into the accumulator when
//! bit `k` (counted MSB first from the start of the message) is set. The
//! table repeats with a period of 256 bits.

/// Initial accumulator value.
pub const CRC_INIT: u8 = 0xFF;

/// Per-bit-position checksum contributions.
pub const NSI_CRC_TABLE: [u8; 256] = [
    0x8F, 0x85, 0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01, 0xC2, 0x61, 0xF2, 0x79, 0xFE, 0x7F,
    0xFD, 0xBC, 0x5E, 0x2F, 0xD5, 0xA8, 0x54, 0x2A, 0x15, 0xC8, 0x64, 0x32, 0x19, 0xCE, 0x67, 0xF1,
    0xBA, 0x5D, 0xEC, 0x76, 0x3B, 0xDF, 0xAD, 0x94, 0x4A, 0x25, 0xD0, 0x68, 0x34, 0x1A, 0x0D, 0xC4,
    0x62, 0x31, 0xDA, 0x6D, 0xF4, 0x7A, 0x3D, 0xDC, 0x6E, 0x37, 0xD9, 0xAE, 0x57, 0xE9, 0xB6, 0x5B,
    0xEF, 0xB5, 0x98, 0x4C, 0x26, 0x13, 0xCB, 0xA7, 0x91, 0x8A, 0x45, 0xE0, 0x70, 0x38, 0x1C, 0x0E,
    0x07, 0xC1, 0xA2, 0x51, 0xEA, 0x75, 0xF8, 0x7C, 0x3E, 0x1F, 0xCD, 0xA4, 0x52, 0x29, 0xD6, 0x6B,
    0xF7, 0xB9, 0x9E, 0x4F, 0xE5, 0xB0, 0x58, 0x2C, 0x16, 0x0B, 0xC7, 0xA1, 0x92, 0x49, 0xE6, 0x73,
    0xFB, 0xBF, 0x9D, 0x8C, 0x46, 0x23, 0xD3, 0xAB, 0x97, 0x89, 0x86, 0x43, 0xE3, 0xB3, 0x9B, 0x8F,
    0x85, 0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01, 0xC2, 0x61, 0xF2, 0x79, 0xFE, 0x7F, 0xFD,
    0xBC, 0x5E, 0x2F, 0xD5, 0xA8, 0x54, 0x2A, 0x15, 0xC8, 0x64, 0x32, 0x19, 0xCE, 0x67, 0xF1, 0xBA,
    0x5D, 0xEC, 0x76, 0x3B, 0xDF, 0xAD, 0x94, 0x4A, 0x25, 0xD0, 0x68, 0x34, 0x1A, 0x0D, 0xC4, 0x62,
    0x31, 0xDA, 0x6D, 0xF4, 0x7A, 0x3D, 0xDC, 0x6E, 0x37, 0xD9, 0xAE, 0x57, 0xE9, 0xB6, 0x5B, 0xEF,
    0xB5, 0x98, 0x4C, 0x26, 0x13, 0xCB, 0xA7, 0x91, 0x8A, 0x45, 0xE0, 0x70, 0x38, 0x1C, 0x0E, 0x07,
    0xC1, 0xA2, 0x51, 0xEA, 0x75, 0xF8, 0x7C, 0x3E, 0x1F, 0xCD, 0xA4, 0x52, 0x29, 0xD6, 0x6B, 0xF7,
    0xB9, 0x9E, 0x4F, 0xE5, 0xB0, 0x58, 0x2C, 0x16, 0x0B, 0xC7, 0xA1, 0x92, 0x49, 0xE6, 0x73, 0xFB,
    0xBF, 0x9D, 0x8C, 0x46, 0x23, 0xD3, 0xAB, 0x97, 0x89, 0x86, 0x43, 0xE3, 0xB3, 0x9B, 0x8F, 0x85,
];

/// Calculate the table checksum of a byte slice.
#[must_use]
pub fn calculate_crc(data: &[u8]) -> u8 {
    let mut digest = CrcDigest::new();
    digest.update_slice(data);
    digest.finalize()
}

/// Incremental table checksum.
///
/// Tracks the bit position so bits can be fed as they are emitted.
#[derive(Clone, Copy, Debug)]
pub struct CrcDigest {
    crc: u8,
    slot: usize,
}

impl CrcDigest {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crc: CRC_INIT,
            slot: 0,
        }
    }

    /// Account for the next bit of the message.
    #[inline]
    pub fn update_bit(&mut self, bit: bool) {
        if bit {
            self.crc ^= NSI_CRC_TABLE[self.slot % NSI_CRC_TABLE.len()];
        }
        self.slot += 1;
    }

    /// Account for the next byte of the message, MSB first.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        for shift in (0..8).rev() {
            self.update_bit(byte & (1 << shift) != 0);
        }
    }

    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    #[inline]
    #[must_use]
    pub const fn finalize(self) -> u8 {
        self.crc
    }
}

impl Default for CrcDigest {
    fn default() -> Self {
        Self::new()
    }
}

//! Bit codec between bytes and pulse symbols.
//!
//! Bytes go out MSB first, one symbol per bit, followed by a single stop
//! symbol. Both directions work in place on the peripheral's symbol memory
//! at a caller-supplied index and return the index just past the last data
//! symbol, so a checksum byte can be appended by encoding again at the
//! returned index (its symbols overwrite the previous stop symbol).

use crate::crc::CrcDigest;
use crate::symbol::{Symbol, SymbolRam};

/// Checksum accumulated while encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Checksum {
    /// Per-bit table checksum, see [`crate::crc`].
    Table,
    /// XOR of whole bytes.
    Xor,
}

/// Result of an encode call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoded {
    /// Index of the stop symbol, i.e. the next free data slot.
    pub next: usize,
    /// Checksum of the encoded bytes.
    pub checksum: u8,
}

/// Write `data` as symbols starting at `item`, then `stop`.
///
/// # Panics
///
/// Panics if `item + data.len() * 8` is out of bounds of `ram`.
pub fn encode<R: SymbolRam + ?Sized>(
    ram: &mut R,
    item: usize,
    data: &[u8],
    mode: Checksum,
    stop: Symbol,
) -> Encoded {
    let mut next = item;
    let mut crc = CrcDigest::new();
    let mut xor = 0u8;

    for &byte in data {
        for shift in (0..8).rev() {
            let bit = byte & (1 << shift) != 0;
            if mode == Checksum::Table {
                crc.update_bit(bit);
            }
            ram.write(next, Symbol::from_bit(bit));
            next += 1;
        }
        xor ^= byte;
    }
    ram.write(next, stop);

    let checksum = match mode {
        Checksum::Table => crc.finalize(),
        Checksum::Xor => xor,
    };
    Encoded { next, checksum }
}

/// Read `out.len()` bytes of captured symbols starting at `item`.
///
/// Returns the index just past the last symbol read.
pub fn decode<R: SymbolRam + ?Sized>(ram: &R, item: usize, out: &mut [u8]) -> usize {
    let mut next = item;
    for byte in out.iter_mut() {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | ram.read(next).is_one() as u8;
            next += 1;
        }
        *byte = value;
    }
    next
}

/// Expand a raw bit capture into symbols at `item`.
///
/// `words` holds the bits MSB first: `bits / 32` full words, then one word
/// with the remaining `bits % 32` bits right-aligned. Every slot after the
/// last bit, up to `item + span`, is reset to an end symbol so a short
/// capture leaves nothing of an earlier frame behind.
///
/// Returns the index just past the last bit, or `None` when `words` does
/// not match `bits` or the capture and its end symbol do not fit in `span`.
pub fn load_capture<R: SymbolRam + ?Sized>(
    ram: &mut R,
    item: usize,
    span: usize,
    words: &[u32],
    bits: usize,
) -> Option<usize> {
    let full = bits / 32;
    let tail = bits % 32;
    if words.len() != full + 1 || bits >= span || item + span > ram.len() {
        return None;
    }

    for i in 0..bits {
        let (word, shift) = if i / 32 < full {
            (words[i / 32], 31 - i % 32)
        } else {
            (words[full], tail - 1 - i % 32)
        };
        ram.write(item + i, Symbol::from_bit((word >> shift) & 1 != 0));
    }
    for slot in item + bits..item + span {
        ram.write(slot, Symbol::default());
    }
    Some(item + bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{channel_base, CHANNEL_COUNT, SYMBOLS_PER_CHANNEL};
    use crate::crc::calculate_crc;

    const RAM_LEN: usize = CHANNEL_COUNT * SYMBOLS_PER_CHANNEL;

    fn ram() -> [Symbol; RAM_LEN] {
        [Symbol::default(); RAM_LEN]
    }

    #[test]
    fn test_encode_emits_msb_first_and_stop() {
        let mut ram = ram();
        let out = encode(&mut ram, 0, &[0xA0], Checksum::Table, Symbol::STOP_BIT_2US);
        assert_eq!(out.next, 8);
        let expected = [1, 0, 1, 0, 0, 0, 0, 0];
        for (i, &bit) in expected.iter().enumerate() {
            assert_eq!(ram[i], Symbol::from_bit(bit == 1), "bit {i}");
        }
        assert_eq!(ram[8], Symbol::STOP_BIT_2US);
    }

    #[test]
    fn test_round_trip() {
        let samples: [&[u8]; 4] = [
            &[0x00],
            &[0xFF, 0x00, 0x55, 0xAA],
            &[0x09, 0x00, 0x20],
            &[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x01, 0x80],
        ];
        for data in samples {
            let mut ram = ram();
            let out = encode(&mut ram, 64, data, Checksum::Xor, Symbol::STOP_BIT_2US);
            assert_eq!(out.next, 64 + data.len() * 8);

            let mut back = [0u8; 10];
            let next = decode(&ram, 64, &mut back[..data.len()]);
            assert_eq!(next, out.next);
            assert_eq!(&back[..data.len()], data);
        }
    }

    #[test]
    fn test_round_trip_every_byte_value() {
        let mut ram = ram();
        for value in 0..=u8::MAX {
            encode(&mut ram, 0, &[value], Checksum::Table, Symbol::STOP_BIT_2US);
            let mut back = [0u8; 1];
            decode(&ram, 0, &mut back);
            assert_eq!(back[0], value, "byte {value:#04x}");
        }
    }

    #[test]
    fn test_round_trip_at_last_channel() {
        let base = channel_base(6);
        assert_eq!(base, 384);

        let mut ram = ram();
        let data: [u8; 11] = [0x40, 0x03, 0x01, 0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0xFF, 0x5A, 0xA5];
        let out = encode(&mut ram, base, &data, Checksum::Xor, Symbol::STOP_BIT_1US);
        assert_eq!(out.next, base + data.len() * 8);
        assert_eq!(ram[out.next], Symbol::STOP_BIT_1US);

        let mut back = [0u8; 11];
        assert_eq!(decode(&ram, base, &mut back), out.next);
        assert_eq!(back, data);
    }

    #[test]
    fn test_load_capture_full_and_partial_words() {
        let mut ram = ram();
        // Exactly one full word is followed by an empty tail word.
        let words = [0x4003_0100, 0x0000_0000];
        assert_eq!(load_capture(&mut ram, 128, 128, &words[..1], 32), None);
        assert_eq!(load_capture(&mut ram, 128, 128, &words, 32), Some(160));
        let mut back = [0u8; 4];
        decode(&ram, 128, &mut back);
        assert_eq!(back, [0x40, 0x03, 0x01, 0x00]);

        // 0x40 0x03 0x01 plus the console stop bit, right-aligned in the tail.
        let words = [(0x40_0301 << 1) | 1];
        assert_eq!(load_capture(&mut ram, 128, 128, &words, 25), Some(153));
        let mut back = [0u8; 3];
        decode(&ram, 128, &mut back);
        assert_eq!(back, [0x40, 0x03, 0x01]);
        assert!(ram[152].is_one());
        assert!(ram[153].is_end());
    }

    #[test]
    fn test_load_capture_clears_stale_frame() {
        let mut ram = ram();
        let base = channel_base(2);
        encode(&mut ram, base, &[0xFF; 11], Checksum::Xor, Symbol::STOP_BIT_1US);

        // A one-byte command followed by the stop bit.
        let words = [(0x1D << 1) | 1];
        assert_eq!(load_capture(&mut ram, base, 128, &words, 9), Some(base + 9));

        let mut staged = [0u8; 11];
        decode(&ram, base, &mut staged);
        assert_eq!(staged[0], 0x1D);
        assert_eq!(staged[1], 0x80);
        assert!(staged[2..].iter().all(|&b| b == 0));
        assert!(ram[base + 9..base + 128].iter().all(|s| s.is_end()));
    }

    #[test]
    fn test_load_capture_rejects_bad_shapes() {
        let mut ram = ram();
        // Word count disagrees with the bit count.
        assert_eq!(load_capture(&mut ram, 0, 128, &[0, 0], 8), None);
        assert_eq!(load_capture(&mut ram, 0, 128, &[], 0), None);
        // Capture fills the whole span, leaving no room for the end symbol.
        assert_eq!(load_capture(&mut ram, 0, 64, &[0, 0, 0], 64), None);
        // Span runs past the end of memory.
        assert_eq!(load_capture(&mut ram, 448, 128, &[0], 8), None);
        assert_eq!(load_capture(&mut ram, 384, 128, &[0], 8), Some(392));
    }

    #[test]
    fn test_table_checksum_matches_digest() {
        let mut ram = ram();
        let out = encode(&mut ram, 0, &[0x09, 0x00, 0x20], Checksum::Table, Symbol::STOP_BIT_2US);
        assert_eq!(out.checksum, 0x85);
        assert_eq!(out.checksum, calculate_crc(&[0x09, 0x00, 0x20]));
    }

    #[test]
    fn test_table_checksum_restarts_each_call() {
        let mut ram = ram();
        let first = encode(&mut ram, 0, &[0x80], Checksum::Table, Symbol::STOP_BIT_2US);
        let second = encode(&mut ram, first.next, &[0x80], Checksum::Table, Symbol::STOP_BIT_2US);
        assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn test_xor_checksum() {
        let mut ram = ram();
        let out = encode(&mut ram, 0, &[0x12, 0x34, 0x0F], Checksum::Xor, Symbol::STOP_BIT_2US);
        assert_eq!(out.checksum, 0x12 ^ 0x34 ^ 0x0F);
    }

    #[test]
    fn test_appending_overwrites_stop() {
        let mut ram = ram();
        let out = encode(&mut ram, 0, &[0xFF], Checksum::Xor, Symbol::STOP_BIT_2US);
        let tail = encode(&mut ram, out.next, &[out.checksum], Checksum::Xor, Symbol::STOP_BIT_2US);
        assert_eq!(tail.next, 16);
        assert_eq!(ram[8], Symbol::BIT_ONE);
        assert_eq!(ram[16], Symbol::STOP_BIT_2US);

        let mut back = [0u8; 2];
        decode(&ram, 0, &mut back);
        assert_eq!(back, [0xFF, 0xFF]);
    }

    #[test]
    fn test_decode_uses_captured_high_time() {
        // Captured symbols are not the exact transmit patterns.
        let mut ram = ram();
        let long_high = Symbol::new(false, 3, true, 5);
        let short_high = Symbol::new(false, 5, true, 3);
        for i in 0..8 {
            ram[i] = if i % 2 == 0 { long_high } else { short_high };
        }
        let mut out = [0u8; 1];
        decode(&ram, 0, &mut out);
        assert_eq!(out[0], 0xAA);
    }
}

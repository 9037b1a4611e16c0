//! Sub-byte bit packing.
//!
//! A field of `n` bits is split into chunks at byte boundaries. The chunk
//! holding the field's most significant bits is written first, and each
//! chunk is placed into the open byte starting at its lowest free bit. The
//! reader consumes chunks in the same order and reassembles them most
//! significant first, so any sequence of `add_bits` calls round-trips through
//! `read_bits` calls of the same widths.

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// BitWriter
// ---------------------------------------------------------------------------

/// Accumulates bit fields of arbitrary width into a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    data: Vec<u8>,
    current_byte: u8,
    /// Number of bits already used in `current_byte` (0..8).
    bit_position: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            data: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Write the low `num_bits` bits of `value`.
    ///
    /// Higher bits of `value` are ignored. Widths above 64 are accepted; the
    /// excess leading bits are written as zeros.
    pub fn add_bits(&mut self, value: u64, num_bits: u32) {
        let mut remaining = num_bits;
        while remaining > 0 {
            let chunk = (8 - self.bit_position).min(remaining);
            let mask = (1u64 << chunk) - 1;
            let bits = value.checked_shr(remaining - chunk).unwrap_or(0) & mask;
            self.current_byte |= (bits as u8) << self.bit_position;
            self.bit_position += chunk;
            remaining -= chunk;
            if self.bit_position == 8 {
                self.data.push(self.current_byte);
                self.current_byte = 0;
                self.bit_position = 0;
            }
        }
    }

    /// Total number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.data.len() * 8 + self.bit_position as usize
    }

    pub fn is_byte_aligned(&self) -> bool {
        self.bit_position == 0
    }

    /// Copy out the written bytes, flushing a partial byte with zero padding
    /// in its unused high bits.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.extend_from_slice(&self.data);
        if self.bit_position > 0 {
            out.push(self.current_byte);
        }
        out
    }

    /// Consume the writer and return the written bytes (see [`bytes`](Self::bytes)).
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_position > 0 {
            self.data.push(self.current_byte);
        }
        self.data
    }
}

// ---------------------------------------------------------------------------
// BitReader
// ---------------------------------------------------------------------------

/// Reads bit fields back from a byte slice in the order they were written.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_index: usize,
    /// Number of bits already consumed from `data[byte_index]` (0..8).
    bit_position: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_index: 0,
            bit_position: 0,
        }
    }

    /// Read `num_bits` bits, stopping early if the buffer runs out.
    ///
    /// Bits read first land in the highest positions of the `num_bits`-wide
    /// result. On exhaustion the unread low positions stay zero and no error
    /// is reported.
    pub fn read_bits(&mut self, num_bits: u32) -> u64 {
        let mut result = 0u64;
        let mut bits_read = 0;
        while bits_read < num_bits {
            let Some(&byte) = self.data.get(self.byte_index) else {
                break;
            };
            let chunk = (8 - self.bit_position).min(num_bits - bits_read);
            let mask = (1u64 << chunk) - 1;
            let bits = (u64::from(byte) >> self.bit_position) & mask;
            result |= bits
                .checked_shl(num_bits - bits_read - chunk)
                .unwrap_or(0);
            self.bit_position += chunk;
            bits_read += chunk;
            if self.bit_position == 8 {
                self.byte_index += 1;
                self.bit_position = 0;
            }
        }
        result
    }

    /// Read `num_bits` bits, failing without consuming anything if fewer
    /// remain.
    pub fn try_read_bits(&mut self, num_bits: u32) -> Result<u64, DecodeError> {
        let remaining = self.bits_remaining();
        if (num_bits as usize) > remaining {
            return Err(DecodeError::Truncated {
                needed: num_bits,
                remaining,
            });
        }
        Ok(self.read_bits(num_bits))
    }

    pub fn byte_index(&self) -> usize {
        self.byte_index
    }

    pub fn bit_position(&self) -> u32 {
        self.bit_position
    }

    pub fn bits_remaining(&self) -> usize {
        (self.data.len().saturating_sub(self.byte_index) * 8)
            .saturating_sub(self.bit_position as usize)
    }

    /// True while the byte cursor is in bounds or the last byte is only
    /// partially consumed.
    pub fn has_remaining(&self) -> bool {
        self.byte_index < self.data.len() || self.bit_position != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_aligned_fields_are_plain_bytes() {
        let mut w = BitWriter::new();
        w.add_bits(0x53, 8);
        w.add_bits(0x57, 8);
        assert_eq!(w.finish(), vec![0x53, 0x57]);
    }

    #[test]
    fn sub_byte_fields_fill_from_low_bit() {
        let mut w = BitWriter::new();
        w.add_bits(0b0101, 4);
        w.add_bits(0b11, 2);
        w.add_bits(0, 2);
        assert_eq!(w.finish(), vec![0b0011_0101]);
    }

    #[test]
    fn high_chunk_written_first_across_byte_boundary() {
        let mut w = BitWriter::new();
        w.add_bits(0, 4);
        // 0xAB split as 4 high bits (0xA) into the open byte, 4 low (0xB) next.
        w.add_bits(0xAB, 8);
        assert_eq!(w.finish(), vec![0xA0, 0x0B]);
    }

    #[test]
    fn value_bits_above_width_are_masked() {
        let mut w = BitWriter::new();
        w.add_bits(0xFF, 3);
        assert_eq!(w.finish(), vec![0b0000_0111]);
    }

    #[test]
    fn partial_byte_flushed_with_zero_padding() {
        let mut w = BitWriter::new();
        w.add_bits(0x12, 8);
        w.add_bits(0b1, 1);
        assert_eq!(w.bit_len(), 9);
        assert!(!w.is_byte_aligned());
        assert_eq!(w.bytes(), vec![0x12, 0x01]);
        assert_eq!(w.finish(), vec![0x12, 0x01]);
    }

    #[test]
    fn empty_writer_produces_nothing() {
        assert!(BitWriter::new().finish().is_empty());
    }

    #[test]
    fn widths_above_64_write_leading_zeros() {
        let mut w = BitWriter::new();
        w.add_bits(u64::MAX, 72);
        let bytes = w.finish();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 0);
        assert!(bytes[1..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn reader_mirrors_writer_for_mixed_widths() {
        let fields: [(u64, u32); 6] = [(5, 3), (0x1FF, 9), (0, 1), (0xABCD, 16), (3, 2), (77, 7)];
        let mut w = BitWriter::new();
        for &(v, n) in &fields {
            w.add_bits(v, n);
        }
        let bytes = w.finish();
        let mut r = BitReader::new(&bytes);
        for &(v, n) in &fields {
            assert_eq!(r.read_bits(n), v);
        }
    }

    #[test]
    fn reader_stops_early_on_exhaustion() {
        let data = [0xFFu8];
        let mut r = BitReader::new(&data);
        // 8 bits available, 12 requested: the 8 read bits take the top slots.
        assert_eq!(r.read_bits(12), 0xFF0);
        assert_eq!(r.read_bits(8), 0);
        assert!(!r.has_remaining());
    }

    #[test]
    fn cursor_tracks_byte_and_bit_positions() {
        let data = [0u8, 0u8];
        let mut r = BitReader::new(&data);
        r.read_bits(3);
        assert_eq!((r.byte_index(), r.bit_position()), (0, 3));
        assert_eq!(r.bits_remaining(), 13);
        r.read_bits(5);
        assert_eq!((r.byte_index(), r.bit_position()), (1, 0));
        assert!(r.has_remaining());
        r.read_bits(8);
        assert_eq!(r.bits_remaining(), 0);
        assert!(!r.has_remaining());
    }

    #[test]
    fn try_read_bits_rejects_without_consuming() {
        let data = [0xA5u8];
        let mut r = BitReader::new(&data);
        assert_eq!(r.try_read_bits(4), Ok(0x5));
        assert_eq!(
            r.try_read_bits(5),
            Err(DecodeError::Truncated {
                needed: 5,
                remaining: 4
            })
        );
        assert_eq!(r.try_read_bits(4), Ok(0xA));
    }
}

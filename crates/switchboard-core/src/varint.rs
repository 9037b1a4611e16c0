//! Zigzag-mapped variable-length integers.
//!
//! A signed value is first mapped to unsigned so that small magnitudes of
//! either sign stay small, then written as 7-bit groups (low group first),
//! each group an 8-bit field whose high bit flags that another group follows.

use crate::bitstream::{BitReader, BitWriter};
use crate::error::DecodeError;

/// Groups needed for any 32-bit value (ceil(32 / 7)).
pub const MAX_VARINT_GROUPS: u32 = 5;

const PAYLOAD_MASK: u8 = 0x7F;
const CONTINUATION: u8 = 0x80;

/// Map a signed value to unsigned: 0, -1, 1, -2, 2 ... -> 0, 1, 2, 3, 4 ...
pub fn zigzag_encode(value: i32) -> u32 {
    (value.wrapping_shl(1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Number of bytes `value` occupies once encoded.
pub fn encoded_len(value: i32) -> usize {
    let mut unsigned = zigzag_encode(value);
    let mut len = 1;
    while unsigned >= u32::from(CONTINUATION) {
        unsigned >>= 7;
        len += 1;
    }
    len
}

pub fn write_varint(writer: &mut BitWriter, value: i32) {
    let mut unsigned = zigzag_encode(value);
    while unsigned >= u32::from(CONTINUATION) {
        let group = (unsigned as u8 & PAYLOAD_MASK) | CONTINUATION;
        writer.add_bits(u64::from(group), 8);
        unsigned >>= 7;
    }
    writer.add_bits(u64::from(unsigned), 8);
}

/// Read a varint, rejecting truncated input and values wider than 32 bits.
pub fn read_varint(reader: &mut BitReader<'_>) -> Result<i32, DecodeError> {
    let mut value = 0u32;
    for group in 0..MAX_VARINT_GROUPS {
        let byte = reader.try_read_bits(8)? as u8;
        let payload = u32::from(byte & PAYLOAD_MASK);
        // The last group may only carry the top 4 bits of a u32.
        if group == MAX_VARINT_GROUPS - 1 && payload > 0x0F {
            return Err(DecodeError::VarintOverflow {
                groups: MAX_VARINT_GROUPS,
            });
        }
        value |= payload << (group * 7);
        if byte & CONTINUATION == 0 {
            return Ok(zigzag_decode(value));
        }
    }
    Err(DecodeError::VarintOverflow {
        groups: MAX_VARINT_GROUPS,
    })
}

/// Read a varint the permissive way: never fails.
///
/// Groups are consumed until one has a clear continuation bit. Past the end
/// of the buffer groups read as zero, which ends the loop. Payload bits above
/// bit 31 are dropped.
pub fn read_varint_lenient(reader: &mut BitReader<'_>) -> i32 {
    let mut value = 0u32;
    let mut shift = 0u32;
    loop {
        let byte = reader.read_bits(8) as u8;
        let payload = u32::from(byte & PAYLOAD_MASK);
        value |= payload.checked_shl(shift).unwrap_or(0);
        if byte & CONTINUATION == 0 {
            return zigzag_decode(value);
        }
        shift = shift.saturating_add(7);
    }
}

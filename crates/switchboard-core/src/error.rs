//! Error types shared by the bitstream, varint, and codec modules.

use crate::cell::GridPosition;
use crate::codec::HEADER;

/// Errors that can occur while decoding a circuit stream in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid header: expected 0x{:08X}, got 0x{:08X}", HEADER, .found)]
    InvalidHeader { found: u32 },
    #[error("truncated stream: needed {needed} bits, {remaining} remaining")]
    Truncated { needed: u32, remaining: usize },
    #[error("varint exceeds 32 bits after {groups} groups")]
    VarintOverflow { groups: u32 },
}

/// Errors that can occur while encoding a circuit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("duplicate cell at grid position ({}, {})", .0.x, .0.y)]
    DuplicatePosition(GridPosition),
}

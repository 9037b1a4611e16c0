//! Switchboard Core -- the compact binary codec for circuit layouts.
//!
//! A circuit is a sparse 2D grid of typed, rotated, powered cells. This
//! crate packs it into a dense bitstream and reads it back losslessly.
//!
//! # Wire Layout
//!
//! Every stream is laid out as:
//!
//! 1. **Header** -- 4 bytes, big-endian magic [`codec::HEADER`].
//! 2. **Grid size** -- width and height as zigzag varints.
//! 3. **Cells** -- until the data runs out, in canonical (x, then y) order:
//!    - grid position delta (x, y) and world position delta, four varints;
//!    - power level, 4 bits;
//!    - rotation quadrant, 2 bits;
//!    - 2 reserved zero bits;
//!    - cell type, zigzag varint.
//!
//! Every delta is taken against the previous cell in encoding order, starting
//! from zero. There is no cell count: the decoder stops when no bits remain.
//!
//! # Strict and Lenient Decoding
//!
//! ```rust,ignore
//! let bytes = codec::encode(&circuit)?;
//! let strict = codec::decode(&bytes)?;          // typed errors
//! let lenient = codec::decode_lenient(&bytes);  // never fails
//! if let Some(circuit) = lenient.circuit() { /* header matched */ }
//! ```
//!
//! # Key Types
//!
//! - [`bitstream::BitWriter`] / [`bitstream::BitReader`] -- sub-byte field
//!   packing, low bit first within each byte.
//! - [`varint`] -- zigzag mapping and 7-bit group varints.
//! - [`cell::Circuit`] and [`cell::Cell`] -- the strongly typed layout model.
//! - [`codec`] -- encode, strict decode, lenient decode.
//! - [`payload::PayloadLimits`] -- size guard applied before decoding
//!   untrusted data; [`payload::circuit_id`] names a payload.
//! - [`document::CircuitDocument`] -- the loose JSON form of a circuit.

pub mod bitstream;
pub mod cell;
pub mod codec;
pub mod document;
pub mod error;
pub mod payload;
pub mod varint;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use cell::{Cell, CellType, Circuit, GridPosition, GridSize, Power, Rotation, WorldPosition};
pub use codec::{DecodeMode, Decoded, HEADER, decode, decode_lenient, decode_with_mode, encode};
pub use error::{DecodeError, EncodeError};

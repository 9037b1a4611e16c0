//! Circuit encoding and decoding.
//!
//! See the crate docs for the wire layout. Encoding always writes cells in
//! canonical order; decoding replays whatever deltas the stream holds.

use crate::bitstream::{BitReader, BitWriter};
use crate::cell::{Cell, CellType, Circuit, GridPosition, GridSize, Power, Rotation, WorldPosition};
use crate::error::{DecodeError, EncodeError};
use crate::varint::{read_varint, read_varint_lenient, write_varint};
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::marker::PhantomData;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number opening every circuit stream ("SW", format 1).
pub const HEADER: u32 = 0x5357_0001;

const HEADER_BITS: u32 = 32;
const POWER_BITS: u32 = 4;
const ROTATION_BITS: u32 = 2;
const RESERVED_BITS: u32 = 2;

// ---------------------------------------------------------------------------
// Decode mode
// ---------------------------------------------------------------------------

/// How the decoder reacts to malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodeMode {
    /// Report bad headers, truncation, and oversized varints as errors.
    #[default]
    Strict,
    /// Never fail: a bad header yields [`Decoded::InvalidHeader`], reads past
    /// the end yield zero bits, and a truncated trailing cell is kept as
    /// decoded.
    Lenient,
}

impl DecodeMode {
    pub fn from_lenient(lenient: bool) -> Self {
        if lenient {
            DecodeMode::Lenient
        } else {
            DecodeMode::Strict
        }
    }
}

// ---------------------------------------------------------------------------
// Delta state
// ---------------------------------------------------------------------------

/// Absolute values of the previously coded cell. Starts at zero.
#[derive(Debug, Clone, Copy, Default)]
struct DeltaBase {
    position: GridPosition,
    world: WorldPosition,
}

impl DeltaBase {
    fn advance(&mut self, cell: &Cell) {
        self.position = cell.position;
        self.world = cell.world;
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode a circuit into a byte stream.
///
/// Cells are sorted into canonical order on a copy; the input is untouched.
/// Two cells on the same grid position are rejected.
pub fn encode(circuit: &Circuit) -> Result<Vec<u8>, EncodeError> {
    let mut cells: Vec<&Cell> = circuit.cells.iter().collect();
    cells.sort_by_key(|cell| cell.position);
    if let Some(pair) = cells
        .windows(2)
        .find(|pair| pair[0].position == pair[1].position)
    {
        return Err(EncodeError::DuplicatePosition(pair[0].position));
    }

    let mut writer = BitWriter::with_capacity(8 + cells.len() * 6);
    writer.add_bits(u64::from(HEADER), HEADER_BITS);
    write_varint(&mut writer, circuit.grid_size.width);
    write_varint(&mut writer, circuit.grid_size.height);

    let mut base = DeltaBase::default();
    for cell in cells {
        write_cell(&mut writer, cell, &base);
        base.advance(cell);
    }

    let bytes = writer.finish();
    debug!(
        "encoded {} cells ({}x{}) into {} bytes",
        circuit.cells.len(),
        circuit.grid_size.width,
        circuit.grid_size.height,
        bytes.len()
    );
    Ok(bytes)
}

fn write_cell(writer: &mut BitWriter, cell: &Cell, base: &DeltaBase) {
    write_varint(writer, cell.position.x.wrapping_sub(base.position.x));
    write_varint(writer, cell.position.y.wrapping_sub(base.position.y));
    write_varint(writer, cell.world.x.wrapping_sub(base.world.x));
    write_varint(writer, cell.world.y.wrapping_sub(base.world.y));
    writer.add_bits(u64::from(cell.power.level()), POWER_BITS);
    writer.add_bits(u64::from(cell.rotation.quadrant()), ROTATION_BITS);
    writer.add_bits(0, RESERVED_BITS);
    write_varint(writer, cell.cell_type.0);
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

/// Outcome of decoding a stream.
///
/// Lenient decoding reports a header mismatch as [`Decoded::InvalidHeader`],
/// so it stays distinguishable from a well-formed empty circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Circuit(Circuit),
    InvalidHeader { found: u32 },
}

impl Decoded {
    pub fn circuit(&self) -> Option<&Circuit> {
        match self {
            Decoded::Circuit(circuit) => Some(circuit),
            Decoded::InvalidHeader { .. } => None,
        }
    }

    pub fn into_circuit(self) -> Option<Circuit> {
        match self {
            Decoded::Circuit(circuit) => Some(circuit),
            Decoded::InvalidHeader { .. } => None,
        }
    }

    pub fn is_invalid_header(&self) -> bool {
        matches!(self, Decoded::InvalidHeader { .. })
    }
}

/// Decode a stream, reporting malformed input as an error.
pub fn decode(data: &[u8]) -> Result<Circuit, DecodeError> {
    match decode_stream::<StrictReads>(data)? {
        Decoded::Circuit(circuit) => Ok(circuit),
        Decoded::InvalidHeader { found } => Err(DecodeError::InvalidHeader { found }),
    }
}

/// Decode a stream without ever failing.
///
/// A header mismatch gives [`Decoded::InvalidHeader`]. Truncated data is read
/// as zero bits, so a cut-off trailing cell comes back partially zeroed.
pub fn decode_lenient(data: &[u8]) -> Decoded {
    let decoded = match decode_stream::<LenientReads>(data) {
        Ok(decoded) => decoded,
        Err(never) => match never {},
    };
    if let Decoded::InvalidHeader { found } = decoded {
        warn!("invalid header 0x{found:08X}, expected 0x{HEADER:08X}");
    }
    decoded
}

/// Decode a stream in the given mode. Lenient mode always returns `Ok`.
pub fn decode_with_mode(data: &[u8], mode: DecodeMode) -> Result<Decoded, DecodeError> {
    match mode {
        DecodeMode::Strict => decode(data).map(Decoded::Circuit),
        DecodeMode::Lenient => Ok(decode_lenient(data)),
    }
}

/// Validate the header and read the grid size without decoding any cells.
pub fn read_preamble(data: &[u8]) -> Result<GridSize, DecodeError> {
    let mut decoder = StreamDecoder::<StrictReads>::new(data);
    let found = decoder.header()?;
    if found != HEADER {
        return Err(DecodeError::InvalidHeader { found });
    }
    decoder.grid_size()
}

fn decode_stream<P: ReadPolicy>(data: &[u8]) -> Result<Decoded, P::Error> {
    let mut decoder = StreamDecoder::<P>::new(data);
    let found = decoder.header()?;
    if found != HEADER {
        return Ok(Decoded::InvalidHeader { found });
    }
    let grid_size = decoder.grid_size()?;

    let mut cells = Vec::new();
    let mut base = DeltaBase::default();
    while decoder.reader.has_remaining() {
        let cell = decoder.cell(&base)?;
        trace!("decoded cell {:?}", cell);
        base.advance(&cell);
        cells.push(cell);
    }

    debug!(
        "decoded {} cells ({}x{}) from {} bytes",
        cells.len(),
        grid_size.width,
        grid_size.height,
        data.len()
    );
    Ok(Decoded::Circuit(Circuit { grid_size, cells }))
}

/// What happens when a read runs past the end of the data.
trait ReadPolicy {
    type Error;

    fn bits(reader: &mut BitReader<'_>, num_bits: u32) -> Result<u64, Self::Error>;
    fn varint(reader: &mut BitReader<'_>) -> Result<i32, Self::Error>;
}

/// Short reads and overlong varints are errors.
struct StrictReads;

impl ReadPolicy for StrictReads {
    type Error = DecodeError;

    fn bits(reader: &mut BitReader<'_>, num_bits: u32) -> Result<u64, DecodeError> {
        reader.try_read_bits(num_bits)
    }

    fn varint(reader: &mut BitReader<'_>) -> Result<i32, DecodeError> {
        read_varint(reader)
    }
}

/// Short reads are zero-filled; nothing fails.
struct LenientReads;

impl ReadPolicy for LenientReads {
    type Error = Infallible;

    fn bits(reader: &mut BitReader<'_>, num_bits: u32) -> Result<u64, Infallible> {
        Ok(reader.read_bits(num_bits))
    }

    fn varint(reader: &mut BitReader<'_>) -> Result<i32, Infallible> {
        Ok(read_varint_lenient(reader))
    }
}

struct StreamDecoder<'a, P> {
    reader: BitReader<'a>,
    policy: PhantomData<P>,
}

impl<'a, P: ReadPolicy> StreamDecoder<'a, P> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BitReader::new(data),
            policy: PhantomData,
        }
    }

    fn bits(&mut self, num_bits: u32) -> Result<u64, P::Error> {
        P::bits(&mut self.reader, num_bits)
    }

    fn varint(&mut self) -> Result<i32, P::Error> {
        P::varint(&mut self.reader)
    }

    fn header(&mut self) -> Result<u32, P::Error> {
        Ok(self.bits(HEADER_BITS)? as u32)
    }

    fn grid_size(&mut self) -> Result<GridSize, P::Error> {
        let width = self.varint()?;
        let height = self.varint()?;
        Ok(GridSize::new(width, height))
    }

    fn cell(&mut self, base: &DeltaBase) -> Result<Cell, P::Error> {
        let dx = self.varint()?;
        let dy = self.varint()?;
        let world_dx = self.varint()?;
        let world_dy = self.varint()?;
        let power = Power::from_bits(self.bits(POWER_BITS)? as u8);
        let rotation = Rotation::from_quadrant(self.bits(ROTATION_BITS)? as u8);
        self.bits(RESERVED_BITS)?;
        let cell_type = CellType(self.varint()?);

        Ok(Cell {
            position: GridPosition::new(
                base.position.x.wrapping_add(dx),
                base.position.y.wrapping_add(dy),
            ),
            world: WorldPosition::new(
                base.world.x.wrapping_add(world_dx),
                base.world.y.wrapping_add(world_dy),
            ),
            power,
            rotation,
            cell_type,
        })
    }
}

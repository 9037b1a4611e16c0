//! The circuit layout model: cells on a sparse grid.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A cell's coordinates in the sparse grid.
///
/// The derived ordering (x first, then y) is the canonical cell order that
/// delta encoding is defined against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A cell's placement in world space, delta coded independently of the grid
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: i32,
    pub y: i32,
}

impl WorldPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height of the circuit's grid. Not checked against cell
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Per-cell fields
// ---------------------------------------------------------------------------

/// A 4-bit power level (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Power(u8);

impl Power {
    pub const MAX: u8 = 0x0F;
    pub const OFF: Power = Power(0);

    /// Returns `None` if `level` does not fit in 4 bits.
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    /// Keep only the low 4 bits of `bits`.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MAX)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Power {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Power::new(level).ok_or_else(|| format!("power level {level} exceeds {}", Power::MAX))
    }
}

impl From<Power> for u8 {
    fn from(power: Power) -> u8 {
        power.0
    }
}

/// Rotation of a cell in 90 degree steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees.
    Cw90,
    /// 180 degrees.
    Cw180,
    /// 270 degrees.
    Cw270,
}

impl Rotation {
    /// All four rotation values.
    pub fn all() -> [Rotation; 4] {
        [
            Rotation::None,
            Rotation::Cw90,
            Rotation::Cw180,
            Rotation::Cw270,
        ]
    }

    pub fn degrees(self) -> u32 {
        u32::from(self.quadrant()) * 90
    }

    /// Parse a rotation in degrees. Only exact multiples of 90 below 360 are
    /// accepted.
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Cw90),
            180 => Some(Rotation::Cw180),
            270 => Some(Rotation::Cw270),
            _ => None,
        }
    }

    /// The 2-bit quadrant index stored on the wire (`degrees / 90`).
    pub fn quadrant(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Cw90 => 1,
            Rotation::Cw180 => 2,
            Rotation::Cw270 => 3,
        }
    }

    /// Inverse of [`quadrant`](Self::quadrant). Only the low 2 bits are used.
    pub fn from_quadrant(quadrant: u8) -> Self {
        match quadrant & 0b11 {
            0 => Rotation::None,
            1 => Rotation::Cw90,
            2 => Rotation::Cw180,
            _ => Rotation::Cw270,
        }
    }
}

/// Identifies the visual/logical kind of a cell. Stable key into a sprite
/// atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct CellType(pub i32);

impl CellType {
    /// Sentinel for cells with no visual.
    pub const NONE: CellType = CellType(-1);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

// ---------------------------------------------------------------------------
// Cell / Circuit
// ---------------------------------------------------------------------------

/// One cell of a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub position: GridPosition,
    pub world: WorldPosition,
    #[serde(default)]
    pub power: Power,
    #[serde(default)]
    pub rotation: Rotation,
    pub cell_type: CellType,
}

impl Cell {
    pub fn new(position: GridPosition, world: WorldPosition, cell_type: CellType) -> Self {
        Self {
            position,
            world,
            power: Power::OFF,
            rotation: Rotation::None,
            cell_type,
        }
    }

    pub fn with_power(mut self, power: Power) -> Self {
        self.power = power;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A circuit layout: a grid size and an ordered list of cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Circuit {
    pub grid_size: GridSize,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Circuit {
    pub fn new(grid_size: GridSize, cells: Vec<Cell>) -> Self {
        Self { grid_size, cells }
    }

    /// A zero-sized circuit with no cells.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sort cells into canonical order (ascending x, then ascending y).
    ///
    /// The sort is stable, so cells sharing a position keep their relative
    /// order.
    pub fn canonicalize(&mut self) {
        self.cells.sort_by_key(|cell| cell.position);
    }

    /// Consuming variant of [`canonicalize`](Self::canonicalize).
    pub fn canonicalized(mut self) -> Self {
        self.canonicalize();
        self
    }

    pub fn is_canonical(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].position <= pair[1].position)
    }

    /// Look up the cell at a grid position.
    pub fn cell_at(&self, position: GridPosition) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.position == position)
    }
}

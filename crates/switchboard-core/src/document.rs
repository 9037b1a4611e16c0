//! The loose JSON form of a circuit.
//!
//! Circuits travel between tools as
//! `{"s": [w, h], "d": [[[x, y], [[rx, ry], power, rotation, type]], ...]}`.
//! Older producers write the world position as a string such as
//! `"(-2, -1)"`; both spellings are accepted, pairs are written.

use crate::cell::{Cell, CellType, Circuit, GridPosition, GridSize, Power, Rotation, WorldPosition};
use crate::codec::Decoded;
use serde::{Deserialize, Serialize};

/// Errors converting a [`CircuitDocument`] into a [`Circuit`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("grid size must have 2 components, got {0}")]
    GridSizeArity(usize),
    #[error("cell {index}: power {value} is outside 0..=15")]
    PowerOutOfRange { index: usize, value: i64 },
    #[error("cell {index}: rotation {value} is not one of 0, 90, 180, 270")]
    InvalidRotation { index: usize, value: i64 },
    #[error("cell {index}: malformed world position {text:?}")]
    WorldPosition { index: usize, text: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// World coordinates as either a `[x, y]` pair or a `"(x, y)"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WorldCoords {
    Pair([i32; 2]),
    Text(String),
}

impl WorldCoords {
    fn parse(&self) -> Option<WorldPosition> {
        match self {
            WorldCoords::Pair([x, y]) => Some(WorldPosition::new(*x, *y)),
            WorldCoords::Text(text) => {
                let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
                let (x, y) = inner.split_once(',')?;
                Some(WorldPosition::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
            }
        }
    }
}

/// `[world, power, rotation_degrees, cell_type]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellFields(pub WorldCoords, pub i64, pub i64, pub i32);

/// `[[x, y], fields]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCell(pub [i32; 2], pub CellFields);

/// A circuit in its JSON document shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CircuitDocument {
    /// Grid size; empty when the source stream had an invalid header.
    #[serde(rename = "s", default)]
    pub size: Vec<i32>,
    #[serde(rename = "d", default)]
    pub cells: Vec<DocumentCell>,
}

impl CircuitDocument {
    /// The document reported for a stream whose header did not match.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into a typed [`Circuit`]. Cell order is kept.
    pub fn into_circuit(self) -> Result<Circuit, DocumentError> {
        let grid_size = match self.size.as_slice() {
            [width, height] => GridSize::new(*width, *height),
            other => return Err(DocumentError::GridSizeArity(other.len())),
        };

        let cells = self
            .cells
            .into_iter()
            .enumerate()
            .map(|(index, DocumentCell([x, y], CellFields(world, power, rotation, cell_type)))|
                -> Result<Cell, DocumentError> {
                let world = world.parse().ok_or_else(|| DocumentError::WorldPosition {
                    index,
                    text: format!("{world:?}"),
                })?;
                let power = u8::try_from(power)
                    .ok()
                    .and_then(Power::new)
                    .ok_or(DocumentError::PowerOutOfRange { index, value: power })?;
                let rotation = u32::try_from(rotation)
                    .ok()
                    .and_then(Rotation::from_degrees)
                    .ok_or(DocumentError::InvalidRotation {
                        index,
                        value: rotation,
                    })?;
                Ok(Cell {
                    position: GridPosition::new(x, y),
                    world,
                    power,
                    rotation,
                    cell_type: CellType(cell_type),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Circuit { grid_size, cells })
    }
}

impl From<&Circuit> for CircuitDocument {
    fn from(circuit: &Circuit) -> Self {
        Self {
            size: vec![circuit.grid_size.width, circuit.grid_size.height],
            cells: circuit
                .cells
                .iter()
                .map(|cell| {
                    DocumentCell(
                        [cell.position.x, cell.position.y],
                        CellFields(
                            WorldCoords::Pair([cell.world.x, cell.world.y]),
                            i64::from(cell.power.level()),
                            i64::from(cell.rotation.degrees()),
                            cell.cell_type.0,
                        ),
                    )
                })
                .collect(),
        }
    }
}

/// A header mismatch becomes [`CircuitDocument::invalid`].
impl From<&Decoded> for CircuitDocument {
    fn from(decoded: &Decoded) -> Self {
        match decoded {
            Decoded::Circuit(circuit) => Self::from(circuit),
            Decoded::InvalidHeader { .. } => Self::invalid(),
        }
    }
}

//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::cell::*;

// ===========================================================================
// Golden vectors
// ===========================================================================

/// Encoding of [`single_cell_circuit`].
pub const SINGLE_CELL_BYTES: [u8; 12] = [
    0x53, 0x57, 0x00, 0x01, 0x06, 0x06, 0x02, 0x02, 0x01, 0x01, 0x10, 0x00,
];

/// A 3x3 grid with one unpowered cell at (1, 1), world (-1, -1), rotated 90.
pub fn single_cell_circuit() -> Circuit {
    Circuit::new(
        GridSize::new(3, 3),
        vec![make_cell(1, 1, 0).with_world(-1, -1).rotated(Rotation::Cw90)],
    )
}

// ===========================================================================
// Cell constructors
// ===========================================================================

/// An unpowered, unrotated cell whose world position equals its grid position.
pub fn make_cell(x: i32, y: i32, cell_type: i32) -> Cell {
    Cell::new(
        GridPosition::new(x, y),
        WorldPosition::new(x, y),
        CellType(cell_type),
    )
}

/// Chainable tweaks for test cells.
pub trait CellExt {
    fn with_world(self, x: i32, y: i32) -> Cell;
    fn powered(self, level: u8) -> Cell;
    fn rotated(self, rotation: Rotation) -> Cell;
}

impl CellExt for Cell {
    fn with_world(mut self, x: i32, y: i32) -> Cell {
        self.world = WorldPosition::new(x, y);
        self
    }

    fn powered(self, level: u8) -> Cell {
        self.with_power(Power::from_bits(level))
    }

    fn rotated(self, rotation: Rotation) -> Cell {
        self.with_rotation(rotation)
    }
}

// ===========================================================================
// Circuit builders
// ===========================================================================

/// A fully populated `width` x `height` circuit in canonical order, with
/// power, rotation, and cell type cycling through their ranges.
pub fn dense_circuit(width: i32, height: i32) -> Circuit {
    let mut cells = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
    for x in 0..width {
        for y in 0..height {
            let i = x * height + y;
            cells.push(
                make_cell(x, y, i % 13 - 1)
                    .with_world(x - width / 2, y - height / 2)
                    .powered((i % 16) as u8)
                    .rotated(Rotation::from_quadrant((i % 4) as u8)),
            );
        }
    }
    Circuit::new(GridSize::new(width, height), cells)
}

/// Every `stride`-th cell of a `width` x `height` grid, canonical order.
pub fn sparse_circuit(width: i32, height: i32, stride: usize) -> Circuit {
    let mut circuit = dense_circuit(width, height);
    circuit.cells = circuit.cells.into_iter().step_by(stride.max(1)).collect();
    circuit
}

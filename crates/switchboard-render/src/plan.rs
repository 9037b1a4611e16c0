//! Render planning: where each cell's sprite goes and how it is drawn.

use crate::atlas::{SpriteAtlas, TileRegion};
use log::debug;
use serde::{Deserialize, Serialize};
use switchboard_core::{CellType, Circuit, Power, Rotation};

/// Output size of one grid cell, in pixels, unless configured otherwise.
pub const DEFAULT_CELL_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Tint
// ---------------------------------------------------------------------------

/// Color treatment of a sprite's visible pixels, chosen by power level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    /// Saturate every channel.
    White,
    /// Saturate red only.
    Red,
    /// Saturate blue only.
    Blue,
}

impl Tint {
    /// Power 1 and 3 draw red, 2 draws blue, everything else white.
    pub fn for_power(power: Power) -> Self {
        match power.level() {
            1 | 3 => Tint::Red,
            2 => Tint::Blue,
            _ => Tint::White,
        }
    }

    /// Apply to an RGBA pixel. Fully transparent pixels are left alone.
    pub fn apply(self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        if a == 0 {
            return [r, g, b, a];
        }
        match self {
            Tint::White => [u8::MAX, u8::MAX, u8::MAX, a],
            Tint::Red => [u8::MAX, g, b, a],
            Tint::Blue => [r, g, u8::MAX, a],
        }
    }
}

// ---------------------------------------------------------------------------
// RenderPlan
// ---------------------------------------------------------------------------

/// One sprite to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub cell_type: CellType,
    /// Source rectangle in the atlas image.
    pub source: TileRegion,
    /// Top-left corner on the canvas. May lie outside it.
    pub dest_x: i64,
    pub dest_y: i64,
    /// Edge length of the destination square.
    pub size: u32,
    pub rotation: Rotation,
    pub tint: Tint,
}

impl Placement {
    /// Rotation to apply, clockwise.
    pub fn clockwise_degrees(&self) -> u32 {
        self.rotation.degrees()
    }
}

/// Everything a pixel backend needs to draw a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub canvas_width: u64,
    pub canvas_height: u64,
    pub cell_size: u32,
    /// In cell order, so later cells draw over earlier ones.
    pub placements: Vec<Placement>,
    /// Cells whose type has no sprite.
    pub skipped: usize,
}

impl RenderPlan {
    pub fn build(circuit: &Circuit, atlas: &SpriteAtlas, cell_size: u32) -> Self {
        let size = i64::from(cell_size);
        let mut placements = Vec::with_capacity(circuit.cells.len());
        let mut skipped = 0;

        for cell in &circuit.cells {
            let Some(source) = atlas.region(cell.cell_type) else {
                skipped += 1;
                continue;
            };
            placements.push(Placement {
                cell_type: cell.cell_type,
                source,
                dest_x: i64::from(cell.position.x) * size,
                dest_y: i64::from(cell.position.y) * size,
                size: cell_size,
                rotation: cell.rotation,
                tint: Tint::for_power(cell.power),
            });
        }

        debug!(
            "planned {} sprites, skipped {} cells without a sprite",
            placements.len(),
            skipped
        );

        Self {
            canvas_width: canvas_extent(circuit.grid_size.width, cell_size),
            canvas_height: canvas_extent(circuit.grid_size.height, cell_size),
            cell_size,
            placements,
            skipped,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.placements.is_empty()
    }
}

fn canvas_extent(cells: i32, cell_size: u32) -> u64 {
    u64::try_from(cells).unwrap_or(0) * u64::from(cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::test_utils::*;
    use switchboard_core::GridSize;

    #[test]
    fn tint_by_power_level() {
        assert_eq!(Tint::for_power(Power::OFF), Tint::White);
        assert_eq!(Tint::for_power(Power::from_bits(1)), Tint::Red);
        assert_eq!(Tint::for_power(Power::from_bits(2)), Tint::Blue);
        assert_eq!(Tint::for_power(Power::from_bits(3)), Tint::Red);
        assert_eq!(Tint::for_power(Power::from_bits(4)), Tint::White);
        assert_eq!(Tint::for_power(Power::from_bits(15)), Tint::White);
    }

    #[test]
    fn tint_saturates_visible_pixels_only() {
        let px = [10, 20, 30, 200];
        assert_eq!(Tint::White.apply(px), [255, 255, 255, 200]);
        assert_eq!(Tint::Red.apply(px), [255, 20, 30, 200]);
        assert_eq!(Tint::Blue.apply(px), [10, 20, 255, 200]);
        assert_eq!(Tint::Red.apply([10, 20, 30, 0]), [10, 20, 30, 0]);
    }

    #[test]
    fn plan_positions_and_canvas() {
        let circuit = Circuit::new(
            GridSize::new(3, 2),
            vec![
                make_cell(0, 0, 0),
                make_cell(2, 1, 11).powered(2).rotated(Rotation::Cw270),
            ],
        );
        let plan = RenderPlan::build(&circuit, &SpriteAtlas::standard(), DEFAULT_CELL_SIZE);
        assert_eq!((plan.canvas_width, plan.canvas_height), (150, 100));
        assert_eq!(plan.placements.len(), 2);
        assert_eq!(plan.skipped, 0);

        let second = plan.placements[1];
        assert_eq!((second.dest_x, second.dest_y), (100, 50));
        assert_eq!(second.size, 50);
        assert_eq!(second.source.x, 640);
        assert_eq!(second.source.y, 128);
        assert_eq!(second.tint, Tint::Blue);
        assert_eq!(second.clockwise_degrees(), 270);
    }

    #[test]
    fn cells_without_sprites_are_skipped() {
        let circuit = Circuit::new(
            GridSize::new(2, 2),
            vec![make_cell(0, 0, -1), make_cell(0, 1, 500), make_cell(1, 1, 5)],
        );
        let plan = RenderPlan::build(&circuit, &SpriteAtlas::standard(), 10);
        assert_eq!(plan.skipped, 2);
        assert_eq!(plan.placements.len(), 1);
        assert_eq!(plan.placements[0].cell_type, CellType(5));
    }

    #[test]
    fn negative_grid_size_gives_empty_canvas() {
        let circuit = Circuit::new(GridSize::new(-4, 3), Vec::new());
        let plan = RenderPlan::build(&circuit, &SpriteAtlas::standard(), 50);
        assert_eq!((plan.canvas_width, plan.canvas_height), (0, 150));
        assert!(plan.is_blank());
    }

    #[test]
    fn cells_outside_grid_keep_their_offsets() {
        let circuit = Circuit::new(GridSize::new(1, 1), vec![make_cell(-2, 5, 0)]);
        let plan = RenderPlan::build(&circuit, &SpriteAtlas::standard(), 50);
        assert_eq!((plan.placements[0].dest_x, plan.placements[0].dest_y), (-100, 250));
    }
}

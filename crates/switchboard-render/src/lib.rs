//! Render planning for decoded circuits.
//!
//! Pixel work is left to a backend behind [`CircuitRenderer`]. This crate
//! decides what the backend draws: which atlas tile each cell uses, where it
//! lands on the canvas, how it is rotated, and how its power level tints it.
//!
//! ```rust,ignore
//! let circuit = switchboard_core::decode(&bytes)?;
//! let plan = RenderPlan::build(&circuit, &SpriteAtlas::standard(), DEFAULT_CELL_SIZE);
//! let image = backend.render(&plan)?;
//! ```

pub mod atlas;
pub mod plan;

pub use atlas::{AtlasError, SpriteAtlas, TileCoord, TileRegion};
pub use plan::{DEFAULT_CELL_SIZE, Placement, RenderPlan, Tint};

use std::convert::Infallible;
use switchboard_core::Circuit;

/// A pixel backend that draws render plans.
pub trait CircuitRenderer {
    type Output;
    type Error;

    fn render(&mut self, plan: &RenderPlan) -> Result<Self::Output, Self::Error>;
}

/// Plan a circuit against an atlas and hand it to a renderer.
pub fn render_circuit<R: CircuitRenderer>(
    renderer: &mut R,
    circuit: &Circuit,
    atlas: &SpriteAtlas,
    cell_size: u32,
) -> Result<R::Output, R::Error> {
    let plan = RenderPlan::build(circuit, atlas, cell_size);
    renderer.render(&plan)
}

/// A renderer that keeps every plan it is given. Returns the number of
/// placements drawn.
#[derive(Debug, Default)]
pub struct PlanRecorder {
    plans: Vec<RenderPlan>,
}

impl PlanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plans(&self) -> &[RenderPlan] {
        &self.plans
    }

    pub fn last(&self) -> Option<&RenderPlan> {
        self.plans.last()
    }
}

impl CircuitRenderer for PlanRecorder {
    type Output = usize;
    type Error = Infallible;

    fn render(&mut self, plan: &RenderPlan) -> Result<usize, Infallible> {
        self.plans.push(plan.clone());
        Ok(plan.placements.len())
    }
}

//! Decoded streams flowing into the renderer interface.

use switchboard_core::codec::{decode, decode_lenient, encode};
use switchboard_core::test_utils::*;
use switchboard_core::{CellType, Circuit, Rotation};
use switchboard_render::{
    CircuitRenderer, PlanRecorder, RenderPlan, SpriteAtlas, TileCoord, Tint, render_circuit,
};

#[test]
fn single_cell_stream_to_plan() {
    let circuit = decode(&SINGLE_CELL_BYTES).unwrap();
    let mut recorder = PlanRecorder::new();
    let drawn = render_circuit(&mut recorder, &circuit, &SpriteAtlas::standard(), 50).unwrap();
    assert_eq!(drawn, 1);

    let plan = recorder.last().unwrap();
    assert_eq!((plan.canvas_width, plan.canvas_height), (150, 150));
    let placement = plan.placements[0];
    assert_eq!((placement.dest_x, placement.dest_y), (50, 50));
    assert_eq!(placement.rotation, Rotation::Cw90);
    assert_eq!(placement.tint, Tint::White);
}

#[test]
fn lenient_invalid_header_has_nothing_to_render() {
    let decoded = decode_lenient(b"\x00\x00\x00\x00garbage");
    assert!(decoded.is_invalid_header());
    assert!(decoded.circuit().is_none());
}

#[test]
fn recorder_keeps_every_plan_in_order() {
    let empty = decode_lenient(&encode(&Circuit::empty()).unwrap());
    let single = decode_lenient(&SINGLE_CELL_BYTES);
    let atlas = SpriteAtlas::standard();
    let mut recorder = PlanRecorder::new();

    for decoded in [&empty, &single] {
        let circuit = decoded.circuit().unwrap();
        render_circuit(&mut recorder, circuit, &atlas, 50).unwrap();
    }

    let plans = recorder.plans();
    assert_eq!(plans.len(), 2);
    assert!(plans[0].is_blank());
    assert_eq!((plans[0].canvas_width, plans[0].canvas_height), (0, 0));
    assert_eq!(plans[1].placements.len(), 1);
    assert_eq!(recorder.last(), Some(&plans[1]));
}

#[test]
fn mock_atlas_controls_what_is_drawn() {
    let circuit = dense_circuit(4, 4);
    let bytes = encode(&circuit).unwrap();
    let decoded = decode(&bytes).unwrap();

    let mut only_zero = SpriteAtlas::new(64).unwrap();
    only_zero.insert(CellType(0), TileCoord::new(2, 3)).unwrap();

    let plan = RenderPlan::build(&decoded, &only_zero, 10);
    let zeros = decoded.cells.iter().filter(|c| c.cell_type == CellType(0)).count();
    assert_eq!(plan.placements.len(), zeros);
    assert_eq!(plan.skipped, decoded.cells.len() - zeros);
    assert!(plan.placements.iter().all(|p| p.source.x == 128 && p.source.y == 192));
}

/// A backend that fails, to check errors pass through untouched.
struct Broken;

impl CircuitRenderer for Broken {
    type Output = ();
    type Error = String;

    fn render(&mut self, plan: &RenderPlan) -> Result<(), String> {
        Err(format!("cannot draw {} sprites", plan.placements.len()))
    }
}

#[test]
fn renderer_errors_propagate() {
    let circuit = single_cell_circuit();
    let result = render_circuit(&mut Broken, &circuit, &SpriteAtlas::standard(), 50);
    assert_eq!(result, Err("cannot draw 1 sprites".to_string()));
}

#[test]
fn plan_serializes_to_json() {
    let plan = RenderPlan::build(&single_cell_circuit(), &SpriteAtlas::standard(), 50);
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["canvas_width"], 150);
    assert_eq!(json["placements"][0]["rotation"], "Cw90");
    assert_eq!(json["placements"][0]["cell_type"], 0);
}

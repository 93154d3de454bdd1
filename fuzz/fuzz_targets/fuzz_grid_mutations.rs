#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilegrid_layout::{
    CellPos, DragController, Grid, GridConfig, PlacementOutcome, PointerPosition, Span,
};

#[derive(Debug, Arbitrary)]
struct Session {
    columns: u8,
    rows: u8,
    ops: Vec<Op>,
}

#[derive(Debug, Arbitrary)]
enum Op {
    Add { cols: u8, rows: u8 },
    Place { pick: u8, col: u8, row: u8 },
    MoveBy { pick: u8, delta_col: i8, delta_row: i8 },
    ResizeColumns { pick: u8, delta: i8 },
    ResizeRows { pick: u8, delta: i8 },
    NearestFree { pick: u8, col: u8, row: u8 },
    Drag { pick: u8, dx: i16, dy: i16 },
    Remove { pick: u8 },
    Reset,
}

fuzz_target!(|session: Session| {
    // Keep grids small enough that every op stays cheap (1..16 x 1..12).
    let columns = u16::from(session.columns % 16) + 1;
    let rows = u16::from(session.rows % 12) + 1;
    let mut grid: Grid<usize> = Grid::new(GridConfig::new(columns, rows)).expect("positive dimensions");

    for (step, op) in session.ops.into_iter().take(256).enumerate() {
        let before = grid.clone();
        let pick = |grid: &Grid<usize>, raw: u8| {
            let items = grid.items();
            (!items.is_empty()).then(|| items[usize::from(raw) % items.len()].id())
        };

        let outcome = match op {
            Op::Add { cols, rows: span_rows } => {
                let span = Span::new(
                    u16::from(cols) % columns + 1,
                    u16::from(span_rows) % rows + 1,
                );
                let _ = grid.add_item(span, step);
                None
            }
            Op::Place { pick: raw, col, row } => pick(&grid, raw).map(|id| {
                grid.place_item(id, CellPos::new(u16::from(col), u16::from(row)))
                    .expect("live id")
            }),
            Op::MoveBy {
                pick: raw,
                delta_col,
                delta_row,
            } => pick(&grid, raw).map(|id| {
                grid.move_by(id, i32::from(delta_col), i32::from(delta_row))
                    .expect("live id")
            }),
            Op::ResizeColumns { pick: raw, delta } => pick(&grid, raw)
                .map(|id| grid.resize_column_span(id, i32::from(delta)).expect("live id")),
            Op::ResizeRows { pick: raw, delta } => pick(&grid, raw)
                .map(|id| grid.resize_row_span(id, i32::from(delta)).expect("live id")),
            Op::NearestFree { pick: raw, col, row } => pick(&grid, raw).map(|id| {
                grid.place_nearest_free(id, CellPos::new(u16::from(col), u16::from(row)))
                    .expect("live id")
            }),
            Op::Drag { pick: raw, dx, dy } => pick(&grid, raw).map(|id| {
                let mut drag = DragController::new();
                drag.begin(&grid, id, PointerPosition::new(0, 0)).expect("live id");
                drag.pointer_moved(&grid, PointerPosition::new(i32::from(dx), i32::from(dy)));
                drag.release(&mut grid).expect("live id")
            }),
            Op::Remove { pick: raw } => {
                if let Some(id) = pick(&grid, raw) {
                    assert!(grid.remove_item(id).is_some());
                }
                None
            }
            Op::Reset => {
                grid.reset();
                None
            }
        };

        if matches!(
            outcome,
            Some(PlacementOutcome::Failed | PlacementOutcome::NoMovement)
        ) {
            assert_eq!(grid, before, "rejected op mutated the grid at step {step}");
        }
        let report = grid.invariant_report();
        assert!(report.is_clean(), "step {step}: {:?}", report.issues);
    }
});

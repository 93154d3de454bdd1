//! Property/fuzz-style invariants for grid mutations.
//!
//! This suite drives random operation streams against the public Grid API and
//! asserts that every call either commits a valid layout or leaves the grid
//! untouched, and that replaying the same stream reproduces the same state.

use proptest::prelude::*;
use tilegrid_layout::{
    CellPos, DragController, Grid, GridConfig, ItemId, PlacementOutcome, PointerPosition, Span,
};

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_u16_range(&mut self, min: u16, max: u16) -> u16 {
        debug_assert!(min <= max);
        if min == max {
            return min;
        }
        let span = u64::from(max - min + 1);
        min + (self.next_u64() % span) as u16
    }

    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        let span = (i64::from(max) - i64::from(min) + 1) as u64;
        min + (self.next_u64() % span) as i32
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridOperation {
    Add { span: Span },
    Place { item: ItemId, target: CellPos },
    MoveBy { item: ItemId, delta_col: i32, delta_row: i32 },
    ResizeColumns { item: ItemId, delta: i32 },
    ResizeRows { item: ItemId, delta: i32 },
    NearestFree { item: ItemId, target: CellPos },
    Drag { item: ItemId, dx: i32, dy: i32 },
    Remove { item: ItemId },
}

fn random_operation(grid: &Grid<u32>, rng: &mut Lcg) -> GridOperation {
    let columns = grid.columns();
    let rows = grid.rows();
    let ids: Vec<ItemId> = grid.items().iter().map(|item| item.id()).collect();

    if ids.is_empty() || rng.next_u64() % 6 == 0 {
        return GridOperation::Add {
            span: Span::new(
                rng.next_u16_range(1, columns.min(3)),
                rng.next_u16_range(1, rows.min(3)),
            ),
        };
    }

    let item = ids[rng.choose_index(ids.len())];
    let target = CellPos::new(rng.next_u16_range(0, columns + 1), rng.next_u16_range(0, rows + 1));
    match rng.next_u64() % 12 {
        0..=4 => GridOperation::Place { item, target },
        5 => GridOperation::MoveBy {
            item,
            delta_col: rng.next_i32_range(-2, 2),
            delta_row: rng.next_i32_range(-2, 2),
        },
        6 => GridOperation::ResizeColumns {
            item,
            delta: rng.next_i32_range(-2, 2),
        },
        7 => GridOperation::ResizeRows {
            item,
            delta: rng.next_i32_range(-2, 2),
        },
        8 => GridOperation::NearestFree { item, target },
        9 | 10 => GridOperation::Drag {
            item,
            dx: rng.next_i32_range(-300, 300),
            dy: rng.next_i32_range(-300, 300),
        },
        _ => GridOperation::Remove { item },
    }
}

/// Apply one operation. Returns the outcome for operations that report one.
fn apply(grid: &mut Grid<u32>, operation: GridOperation, tag: u32) -> Option<PlacementOutcome> {
    match operation {
        GridOperation::Add { span } => {
            let _ = grid.add_item(span, tag);
            None
        }
        GridOperation::Place { item, target } => {
            Some(grid.place_item(item, target).expect("item is live"))
        }
        GridOperation::MoveBy {
            item,
            delta_col,
            delta_row,
        } => Some(grid.move_by(item, delta_col, delta_row).expect("item is live")),
        GridOperation::ResizeColumns { item, delta } => {
            Some(grid.resize_column_span(item, delta).expect("item is live"))
        }
        GridOperation::ResizeRows { item, delta } => {
            Some(grid.resize_row_span(item, delta).expect("item is live"))
        }
        GridOperation::NearestFree { item, target } => {
            Some(grid.place_nearest_free(item, target).expect("item is live"))
        }
        GridOperation::Drag { item, dx, dy } => {
            let mut drag = DragController::new();
            let start = PointerPosition::new(400, 400);
            drag.begin(grid, item, start).expect("item is live");
            drag.pointer_moved(grid, PointerPosition::new(start.x + dx, start.y + dy));
            Some(drag.release(grid).expect("item is live"))
        }
        GridOperation::Remove { item } => {
            assert!(grid.remove_item(item).is_some());
            None
        }
    }
}

fn assert_grid_invariants(grid: &Grid<u32>) {
    let report = grid.invariant_report();
    assert!(
        report.is_clean(),
        "invariant report contains issues: {:?}",
        report.issues
    );
    assert!(grid.collisions().layout_is_valid());
}

fn run_sequence(seed: u64, steps: usize) -> (Grid<u32>, Vec<GridOperation>) {
    let mut rng = Lcg::new(seed);
    let columns = rng.next_u16_range(1, 8);
    let rows = rng.next_u16_range(1, 6);
    let mut grid = Grid::new(GridConfig::new(columns, rows)).expect("positive dimensions");
    let mut applied = Vec::with_capacity(steps);

    for step in 0..steps {
        let operation = random_operation(&grid, &mut rng);
        let before = grid.clone();
        let outcome = apply(&mut grid, operation, step as u32);

        if matches!(
            outcome,
            Some(PlacementOutcome::Failed | PlacementOutcome::NoMovement)
        ) {
            assert_eq!(
                grid, before,
                "rejected operation mutated the grid at step {step}, seed={seed}, op={operation:?}"
            );
        }
        assert_grid_invariants(&grid);
        applied.push(operation);
    }

    (grid, applied)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn grid_random_operation_sequences_preserve_invariants(
        seed in any::<u64>(),
        steps in 20usize..160,
    ) {
        let (grid, _) = run_sequence(seed, steps);
        assert_grid_invariants(&grid);
    }

    #[test]
    fn grid_random_operation_sequences_replay_deterministically(
        seed in any::<u64>(),
        steps in 20usize..80,
    ) {
        let (final_grid, operations) = run_sequence(seed, steps);

        let mut replay = Grid::new(*final_grid.config()).expect("same config");
        for (step, operation) in operations.into_iter().enumerate() {
            apply(&mut replay, operation, step as u32);
        }

        assert_eq!(
            replay.state_hash(),
            final_grid.state_hash(),
            "same operation sequence should produce identical state hash"
        );
        assert_eq!(
            replay.snapshot(),
            final_grid.snapshot(),
            "same operation sequence should produce identical snapshot"
        );
    }

    #[test]
    fn idempotent_placement_never_mutates(seed in any::<u64>(), steps in 0usize..60) {
        let (mut grid, _) = run_sequence(seed, steps);
        let anchors: Vec<_> = grid.anchors().collect();
        for (id, anchor) in anchors {
            let before = grid.clone();
            prop_assert_eq!(grid.place_item(id, anchor), Ok(PlacementOutcome::NoMovement));
            prop_assert_eq!(&grid, &before);
        }
    }
}

#[test]
fn grid_fuzz_seed_corpus_preserves_invariants() {
    let seeds = [
        0_u64,
        1,
        2,
        3,
        5,
        8,
        13,
        21,
        34,
        55,
        89,
        144,
        u32::MAX as u64,
        (u32::MAX as u64) + 1,
        u64::MAX - 1,
        u64::MAX,
    ];

    for seed in seeds {
        let (grid, _) = run_sequence(seed, 240);
        assert_grid_invariants(&grid);
    }
}

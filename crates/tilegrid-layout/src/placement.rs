//! Multi-strategy placement engine.
//!
//! [`Grid::place_item`] realizes a requested move or leaves the layout
//! untouched. Every attempt is transactional:
//!
//! ```text
//! clamp target -> checkpoint -> direct | push -> swap | complex swap -> nearest free
//!                      \______________ restore on every failed step ______/
//! ```
//!
//! # Strategies (tried in order)
//!
//! 1. **Direct**: the target is free; move there.
//! 2. **Push**: colliding items slide one cell along the dominant axis of
//!    travel, cascading through a LIFO worklist. Items that would leave the
//!    grid are redirected behind their pusher.
//! 3. **Swap**: exactly one collider with the same span trades anchors with
//!    the mover.
//! 4. **Complex swap**: exactly one collider with a different span; the mover
//!    takes its anchor and the collider steps back against the direction of
//!    travel or falls back to the nearest free anchor.
//! 5. **Nearest free**: breadth-first search outward from the target for the
//!    closest anchor where the mover alone fits.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Result |
//! |---------|-------|--------|
//! | Grid saturated | No strategy finds room | `Failed`, layout unchanged |
//! | Push cascade too deep | More than `2 × item count` levels | Push skipped, next strategy runs |
//! | Unknown id | Caller bug | `Err(GridError::UnknownItem)` |

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tilegrid_core::geometry::clamp_axis;
use tilegrid_core::CellPos;

use crate::collision::overlaps;
use crate::error::GridError;
use crate::model::{Grid, GridItem, ItemId, ItemShape};

/// Result of a placement or resize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOutcome {
    /// A new consistent layout was committed.
    Success,
    /// The request resolved to the item's current geometry; nothing changed.
    NoMovement,
    /// Every strategy was exhausted; the layout is exactly as before.
    Failed,
}

/// Which step of the engine committed a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    Direct,
    Push,
    Swap,
    ComplexSwap,
    NearestFree,
}

/// Outcome plus diagnostics for one placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub outcome: PlacementOutcome,
    /// The clamped target anchor.
    pub target: CellPos,
    /// Strategy that committed, `None` unless the outcome is `Success`.
    pub strategy: Option<ResolutionStrategy>,
    /// Items whose anchor changed, in iteration order.
    pub moved: Vec<ItemId>,
}

impl PlacementReport {
    fn unchanged(outcome: PlacementOutcome, target: CellPos) -> Self {
        Self {
            outcome,
            target,
            strategy: None,
            moved: Vec::new(),
        }
    }
}

/// Full-layout checkpoint: every item's anchor, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    anchors: FxHashMap<ItemId, CellPos>,
}

impl Checkpoint {
    /// Record the anchor of every item.
    #[must_use]
    pub fn capture<P>(items: &[GridItem<P>]) -> Self {
        Self {
            anchors: items.iter().map(|item| (item.id(), item.anchor)).collect(),
        }
    }

    /// Put every recorded item back at its recorded anchor.
    pub(crate) fn restore<P>(&self, items: &mut [GridItem<P>]) {
        for item in items.iter_mut() {
            if let Some(anchor) = self.anchor_of(item.id()) {
                item.anchor = anchor;
            }
        }
    }

    /// Ids whose current anchor differs from the recorded one.
    #[must_use]
    pub fn moved<P>(&self, items: &[GridItem<P>]) -> Vec<ItemId> {
        items
            .iter()
            .filter(|item| self.anchor_of(item.id()) != Some(item.anchor))
            .map(GridItem::id)
            .collect()
    }

    fn anchor_of(&self, id: ItemId) -> Option<CellPos> {
        self.anchors.get(&id).copied()
    }
}

/// Unit step along the dominant axis of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PushStep {
    col: i32,
    row: i32,
}

impl PushStep {
    /// Sign of travel per axis; diagonal moves keep only the longer axis
    /// (columns win ties).
    fn between(from: CellPos, to: CellPos) -> Self {
        let delta_col = i32::from(to.col) - i32::from(from.col);
        let delta_row = i32::from(to.row) - i32::from(from.row);
        if delta_col != 0 && delta_row != 0 {
            if delta_col.abs() >= delta_row.abs() {
                return Self {
                    col: delta_col.signum(),
                    row: 0,
                };
            }
            return Self {
                col: 0,
                row: delta_row.signum(),
            };
        }
        Self {
            col: delta_col.signum(),
            row: delta_row.signum(),
        }
    }

    const fn is_zero(self) -> bool {
        self.col == 0 && self.row == 0
    }
}

/// One pending displacement in the push cascade.
#[derive(Debug, Clone, Copy)]
struct PushJob {
    item: ItemId,
    pusher: ItemId,
    depth: usize,
}

const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl<P> Grid<P> {
    /// Move an item toward `target`, resolving collisions.
    ///
    /// `target` is clamped so the item's full span fits. Returns
    /// [`PlacementOutcome::NoMovement`] when the clamped target is the current
    /// anchor, and [`PlacementOutcome::Failed`] (layout untouched) when no
    /// strategy succeeds. The nearest-free fallback may settle on the
    /// current anchor; that still commits as `Success` with nothing moved.
    pub fn place_item(&mut self, id: ItemId, target: CellPos) -> Result<PlacementOutcome, GridError> {
        self.place_item_report(id, target).map(|report| report.outcome)
    }

    /// [`place_item`](Self::place_item) with the committing strategy and the
    /// list of items whose anchors changed.
    pub fn place_item_report(
        &mut self,
        id: ItemId,
        target: CellPos,
    ) -> Result<PlacementReport, GridError> {
        let mover = self.require_index(id)?;
        let shape = self.items[mover].shape();
        let origin = self.items[mover].anchor;
        let target = target.clamp_to(self.config.max_anchor(shape.span));

        let _span = tracing::debug_span!(
            "grid_place",
            item = id.get(),
            from_col = origin.col,
            from_row = origin.row,
            to_col = target.col,
            to_row = target.row
        )
        .entered();

        if target == origin {
            return Ok(PlacementReport::unchanged(
                PlacementOutcome::NoMovement,
                target,
            ));
        }

        let checkpoint = Checkpoint::capture(&self.items);
        let colliders = self.collisions().collision_ids_at(shape, target);

        if colliders.is_empty() {
            self.items[mover].anchor = target;
            return Ok(self.commit(&checkpoint, target, ResolutionStrategy::Direct));
        }

        let step = PushStep::between(origin, target);
        if !step.is_zero()
            && self.attempt(&checkpoint, ResolutionStrategy::Push, |grid| {
                grid.try_push(mover, target, step)
            })
        {
            return Ok(self.commit(&checkpoint, target, ResolutionStrategy::Push));
        }

        if let [single] = colliders[..] {
            let other = self.require_index(single)?;
            let strategy = if self.items[other].span == shape.span {
                ResolutionStrategy::Swap
            } else {
                ResolutionStrategy::ComplexSwap
            };
            let swapped = self.attempt(&checkpoint, strategy, |grid| match strategy {
                ResolutionStrategy::Swap => grid.try_swap(mover, other, origin),
                _ => grid.try_complex_swap(mover, other, origin),
            });
            if swapped {
                return Ok(self.commit(&checkpoint, target, strategy));
            }
        }

        // The search ignores the mover, so `origin` itself is a valid answer.
        if let Some(free) = self.nearest_free(shape, target) {
            self.items[mover].anchor = free;
            return Ok(self.commit(&checkpoint, target, ResolutionStrategy::NearestFree));
        }

        checkpoint.restore(&mut self.items);
        tracing::debug!(colliders = colliders.len(), "placement rejected");
        Ok(PlacementReport::unchanged(PlacementOutcome::Failed, target))
    }

    /// Nearest anchor (by breadth-first search from `target`) where the item
    /// fits without collision, ignoring the item itself.
    pub fn find_nearest_free(
        &self,
        id: ItemId,
        target: CellPos,
    ) -> Result<Option<CellPos>, GridError> {
        let index = self.require_index(id)?;
        Ok(self.nearest_free(self.items[index].shape(), target))
    }

    /// Move an item straight to the nearest free anchor around `target`,
    /// without displacing anything.
    pub fn place_nearest_free(
        &mut self,
        id: ItemId,
        target: CellPos,
    ) -> Result<PlacementOutcome, GridError> {
        let index = self.require_index(id)?;
        let Some(free) = self.nearest_free(self.items[index].shape(), target) else {
            return Ok(PlacementOutcome::Failed);
        };
        if free == self.items[index].anchor {
            return Ok(PlacementOutcome::NoMovement);
        }
        self.items[index].anchor = free;
        Ok(PlacementOutcome::Success)
    }

    fn commit(
        &self,
        checkpoint: &Checkpoint,
        target: CellPos,
        strategy: ResolutionStrategy,
    ) -> PlacementReport {
        debug_assert!(self.collisions().layout_is_valid());
        let moved = checkpoint.moved(&self.items);
        tracing::debug!(?strategy, moved = moved.len(), "placement committed");
        PlacementReport {
            outcome: PlacementOutcome::Success,
            target,
            strategy: Some(strategy),
            moved,
        }
    }

    /// Run one strategy; restore the checkpoint if it fails.
    fn attempt(
        &mut self,
        checkpoint: &Checkpoint,
        strategy: ResolutionStrategy,
        run: impl FnOnce(&mut Self) -> bool,
    ) -> bool {
        let accepted = run(self);
        if !accepted {
            checkpoint.restore(&mut self.items);
        }
        tracing::trace!(?strategy, accepted, "strategy attempted");
        accepted
    }

    fn try_push(&mut self, mover: usize, target: CellPos, step: PushStep) -> bool {
        self.items[mover].anchor = target;
        let mover_shape = self.items[mover].shape();
        let depth_limit = self.items.len().saturating_mul(2);

        let mut processed = FxHashSet::default();
        processed.insert(mover_shape.id);

        // LIFO so the cascade visits items in depth-first order.
        let mut work: Vec<PushJob> = self
            .collisions()
            .collision_ids_at(mover_shape, target)
            .into_iter()
            .rev()
            .map(|item| PushJob {
                item,
                pusher: mover_shape.id,
                depth: 0,
            })
            .collect();

        while let Some(job) = work.pop() {
            if job.depth > depth_limit {
                tracing::trace!(depth = job.depth, "push cascade exceeded depth limit");
                return false;
            }
            if !processed.insert(job.item) {
                continue;
            }
            let (Some(pushed), Some(pusher)) = (self.index_of(job.item), self.index_of(job.pusher))
            else {
                return false;
            };
            let Some(next) = self.displace(pushed, pusher, step) else {
                return false;
            };
            self.items[pushed].anchor = next;

            let pushed_shape = self.items[pushed].shape();
            let fresh: Vec<ItemId> = self
                .collisions()
                .collision_ids_at(pushed_shape, next)
                .into_iter()
                .filter(|id| !processed.contains(id))
                .collect();
            work.extend(fresh.into_iter().rev().map(|item| PushJob {
                item,
                pusher: job.item,
                depth: job.depth + 1,
            }));
        }

        self.collisions().layout_is_valid()
    }

    /// Next anchor for `pushed` when shoved by `pusher` one step along `step`.
    fn displace(&self, pushed: usize, pusher: usize, step: PushStep) -> Option<CellPos> {
        let item = &self.items[pushed];
        let by = &self.items[pusher];
        let max = self.config.max_anchor(item.span);
        let columns = i32::from(self.config.columns);
        let rows = i32::from(self.config.rows);

        let mut col = i32::from(item.anchor.col) + step.col;
        let mut row = i32::from(item.anchor.row) + step.row;
        let span_cols = i32::from(item.span.cols);
        let span_rows = i32::from(item.span.rows);

        let mut redirected = true;
        if step.col > 0 && col + span_cols - 1 > columns {
            col = i32::from(by.anchor.col) - span_cols;
        } else if step.col < 0 && col < 1 {
            col = i32::from(by.anchor.col) + i32::from(by.span.cols);
        } else if step.row > 0 && row + span_rows - 1 > rows {
            row = i32::from(by.anchor.row) - span_rows;
        } else if step.row < 0 && row < 1 {
            row = i32::from(by.anchor.row) + i32::from(by.span.rows);
        } else {
            redirected = false;
        }

        let candidate = CellPos::new(clamp_axis(col, max.col), clamp_axis(row, max.row));
        if redirected && overlaps(item.shape(), candidate, by) {
            return self.probe_perpendicular(item.shape(), candidate, step);
        }
        Some(candidate)
    }

    /// Alternate −1, +1, −2, +2, … across the axis of travel until a free
    /// anchor turns up.
    fn probe_perpendicular(&self, shape: ItemShape, from: CellPos, step: PushStep) -> Option<CellPos> {
        let max = self.config.max_anchor(shape.span);
        let reach = i32::from(self.config.columns.max(self.config.rows));
        let view = self.collisions();
        (1..=reach).find_map(|distance| {
            let offset = if distance % 2 == 0 {
                distance / 2
            } else {
                -(distance / 2 + 1)
            };
            let (delta_col, delta_row) = if step.col != 0 { (0, offset) } else { (offset, 0) };
            let candidate = from.offset_clamped(delta_col, delta_row, max);
            (!view.has_collision(shape, candidate, &[])).then_some(candidate)
        })
    }

    fn try_swap(&mut self, mover: usize, other: usize, origin: CellPos) -> bool {
        let destination = self.items[other].anchor;
        self.items[mover].anchor = destination;
        self.items[other].anchor = origin;

        let view = self.collisions();
        !view.has_collision(self.items[mover].shape(), destination, &[])
            && !view.has_collision(self.items[other].shape(), origin, &[])
    }

    fn try_complex_swap(&mut self, mover: usize, other: usize, origin: CellPos) -> bool {
        let destination = self.items[other].anchor;
        self.items[mover].anchor = destination;

        let other_shape = self.items[other].shape();
        let back_col = -(i32::from(destination.col) - i32::from(origin.col)).signum();
        let back_row = -(i32::from(destination.row) - i32::from(origin.row)).signum();

        let mut spot = None;
        if back_col != 0 || back_row != 0 {
            let candidate = destination.offset_clamped(
                back_col,
                back_row,
                self.config.max_anchor(other_shape.span),
            );
            if !self.collisions().has_collision(other_shape, candidate, &[]) {
                spot = Some(candidate);
            }
        }
        let Some(spot) = spot.or_else(|| self.nearest_free(other_shape, destination)) else {
            return false;
        };
        self.items[other].anchor = spot;

        let view = self.collisions();
        !view.has_collision(self.items[mover].shape(), destination, &[])
            && !view.has_collision(other_shape, spot, &[])
    }

    /// Breadth-first search over anchors within span-adjusted bounds,
    /// expanding in 4-neighbour order.
    pub(crate) fn nearest_free(&self, shape: ItemShape, start: CellPos) -> Option<CellPos> {
        let max = self.config.max_anchor(shape.span);
        let start = start.clamp_to(max);
        let view = self.collisions();

        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            if !view.has_collision(shape, cell, &[]) {
                return Some(cell);
            }
            for (delta_col, delta_row) in NEIGHBOURS {
                if let Some(next) = cell.offset(delta_col, delta_row)
                    && next.col <= max.col
                    && next.row <= max.row
                    && visited.insert(next)
                {
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridConfig, ItemDescriptor};
    use tilegrid_core::Span;
    use tracing_test::traced_test;

    fn grid(columns: u16, rows: u16, items: &[(u16, u16, u16, u16)]) -> (Grid<()>, Vec<ItemId>) {
        let mut grid = Grid::new(GridConfig::new(columns, rows)).expect("valid config");
        let ids = items
            .iter()
            .map(|&(col, row, cols, span_rows)| {
                grid.insert(ItemDescriptor::new(
                    CellPos::new(col, row),
                    Span::new(cols, span_rows),
                    (),
                ))
                .expect("fixture items fit")
            })
            .collect();
        (grid, ids)
    }

    fn anchor(grid: &Grid<()>, id: ItemId) -> CellPos {
        grid.item(id).expect("item exists").anchor()
    }

    #[test]
    fn push_step_prefers_longer_axis() {
        let from = CellPos::new(2, 2);
        assert_eq!(
            PushStep::between(from, CellPos::new(5, 3)),
            PushStep { col: 1, row: 0 }
        );
        assert_eq!(
            PushStep::between(from, CellPos::new(1, 5)),
            PushStep { col: 0, row: 1 }
        );
        assert_eq!(
            PushStep::between(from, CellPos::new(3, 3)),
            PushStep { col: 1, row: 0 }
        );
        assert_eq!(
            PushStep::between(from, CellPos::new(2, 1)),
            PushStep { col: 0, row: -1 }
        );
    }

    #[test]
    fn free_target_moves_directly() {
        let (mut grid, ids) = grid(4, 4, &[(1, 1, 1, 1)]);
        let report = grid
            .place_item_report(ids[0], CellPos::new(4, 4))
            .expect("known id");
        assert_eq!(report.outcome, PlacementOutcome::Success);
        assert_eq!(report.strategy, Some(ResolutionStrategy::Direct));
        assert_eq!(report.moved, vec![ids[0]]);
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(4, 4));
    }

    #[test]
    fn target_is_clamped_to_span() {
        let (mut grid, ids) = grid(4, 4, &[(1, 1, 2, 2)]);
        let outcome = grid.place_item(ids[0], CellPos::new(9, 9)).expect("known id");
        assert_eq!(outcome, PlacementOutcome::Success);
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(3, 3));
    }

    #[test]
    fn same_cell_is_no_movement() {
        let (mut grid, ids) = grid(4, 4, &[(2, 2, 1, 1), (3, 2, 1, 1)]);
        let before = grid.clone();
        assert_eq!(
            grid.place_item(ids[0], CellPos::new(2, 2)),
            Ok(PlacementOutcome::NoMovement)
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn clamped_to_current_is_no_movement() {
        let (mut grid, ids) = grid(4, 4, &[(3, 3, 2, 2)]);
        assert_eq!(
            grid.place_item(ids[0], CellPos::new(10, 10)),
            Ok(PlacementOutcome::NoMovement)
        );
    }

    #[test]
    fn unknown_item_is_an_error() {
        let (mut grid, _) = grid(2, 2, &[]);
        let ghost = ItemId::new(42).expect("non-zero");
        assert_eq!(
            grid.place_item(ghost, CellPos::new(1, 1)),
            Err(GridError::UnknownItem { id: ghost })
        );
    }

    #[test]
    fn push_slides_neighbour() {
        let (mut grid, ids) = grid(4, 4, &[(1, 1, 1, 1), (2, 1, 1, 1)]);
        let report = grid
            .place_item_report(ids[0], CellPos::new(2, 1))
            .expect("known id");
        assert_eq!(report.strategy, Some(ResolutionStrategy::Push));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(3, 1));
    }

    #[test]
    fn push_cascades_through_chain() {
        let (mut grid, ids) = grid(5, 1, &[(1, 1, 1, 1), (2, 1, 1, 1), (3, 1, 1, 1)]);
        let outcome = grid.place_item(ids[0], CellPos::new(2, 1)).expect("known id");
        assert_eq!(outcome, PlacementOutcome::Success);
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(3, 1));
        assert_eq!(anchor(&grid, ids[2]), CellPos::new(4, 1));
    }

    #[test]
    fn push_redirects_at_boundary() {
        let (mut grid, ids) = grid(2, 2, &[(1, 1, 1, 1), (2, 1, 1, 1)]);
        let report = grid
            .place_item_report(ids[0], CellPos::new(2, 1))
            .expect("known id");
        assert_eq!(report.strategy, Some(ResolutionStrategy::Push));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(1, 1));
    }

    #[test]
    fn vertical_push_moves_down() {
        let (mut grid, ids) = grid(2, 4, &[(1, 1, 2, 1), (1, 2, 2, 1)]);
        grid.place_item(ids[0], CellPos::new(1, 2)).expect("known id");
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(1, 2));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(1, 3));
    }

    #[test]
    fn swap_trades_equal_spans_when_push_is_blocked() {
        // A full row: the cascade folds back onto the mover, so the pair swaps.
        let (mut grid, ids) = grid(3, 1, &[(1, 1, 1, 1), (2, 1, 1, 1), (3, 1, 1, 1)]);
        let report = grid
            .place_item_report(ids[0], CellPos::new(3, 1))
            .expect("known id");
        assert_eq!(report.strategy, Some(ResolutionStrategy::Swap));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(3, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(2, 1));
        assert_eq!(anchor(&grid, ids[2]), CellPos::new(1, 1));
    }

    #[test]
    fn try_swap_exchanges_anchors() {
        let (mut grid, ids) = grid(3, 1, &[(1, 1, 1, 1), (3, 1, 1, 1)]);
        assert!(grid.try_swap(0, 1, CellPos::new(1, 1)));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(3, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(1, 1));
    }

    #[test]
    fn complex_swap_steps_collider_back() {
        let (mut grid, ids) = grid(4, 1, &[(4, 1, 1, 1), (1, 1, 2, 1)]);
        assert!(grid.try_complex_swap(0, 1, CellPos::new(4, 1)));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(1, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(2, 1));
    }

    #[test]
    fn complex_swap_falls_back_to_search() {
        let (mut grid, ids) = grid(4, 2, &[(1, 2, 1, 1), (2, 2, 2, 1)]);
        assert!(grid.try_complex_swap(0, 1, CellPos::new(1, 2)));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 2));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(3, 2));
        assert!(grid.collisions().layout_is_valid());
    }

    #[test]
    fn nearest_free_searches_outward() {
        let (grid, ids) = grid(3, 3, &[(1, 1, 1, 1), (2, 1, 1, 1), (1, 2, 1, 1)]);
        let probe = ItemShape {
            id: ItemId::new(99).expect("non-zero"),
            span: Span::UNIT,
        };
        assert_eq!(grid.nearest_free(probe, CellPos::new(1, 1)), Some(CellPos::new(3, 1)));
        // Ties resolve in neighbour order: right before left.
        assert_eq!(
            grid.find_nearest_free(ids[0], CellPos::new(2, 1)),
            Ok(Some(CellPos::new(3, 1)))
        );
        assert_eq!(
            grid.find_nearest_free(ids[0], CellPos::new(1, 1)),
            Ok(Some(CellPos::new(1, 1)))
        );
    }

    #[test]
    fn nearest_free_respects_span_bounds() {
        let (grid, _) = grid(3, 3, &[(1, 1, 3, 2)]);
        let probe = ItemShape {
            id: ItemId::new(99).expect("non-zero"),
            span: Span::new(2, 1),
        };
        assert_eq!(grid.nearest_free(probe, CellPos::new(3, 1)), Some(CellPos::new(2, 3)));
    }

    #[test]
    fn place_nearest_free_skips_displacement() {
        let (mut grid, ids) = grid(3, 1, &[(1, 1, 1, 1), (2, 1, 1, 1)]);
        assert_eq!(
            grid.place_nearest_free(ids[0], CellPos::new(2, 1)),
            Ok(PlacementOutcome::Success)
        );
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(3, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(2, 1));
    }

    #[test]
    fn boxed_in_item_settles_on_its_own_anchor() {
        // The bar cannot be pushed past the wall or trade places, and the
        // only free anchor for the mover is where it already stands.
        let (mut grid, ids) = grid(3, 1, &[(1, 1, 1, 1), (2, 1, 2, 1)]);
        let before = grid.clone();
        let report = grid
            .place_item_report(ids[0], CellPos::new(2, 1))
            .expect("known id");
        assert_eq!(report.outcome, PlacementOutcome::Success);
        assert_eq!(report.strategy, Some(ResolutionStrategy::NearestFree));
        assert!(report.moved.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn redirect_onto_pusher_tries_perpendicular_rows() {
        // The bar bounces off the right wall back onto the mover, then finds
        // room one row down.
        let (mut grid, ids) = grid(3, 2, &[(1, 1, 1, 1), (2, 1, 2, 1)]);
        let report = grid
            .place_item_report(ids[0], CellPos::new(2, 1))
            .expect("known id");
        assert_eq!(report.strategy, Some(ResolutionStrategy::Push));
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 1));
        assert_eq!(anchor(&grid, ids[1]), CellPos::new(1, 2));
        assert!(grid.collisions().layout_is_valid());
    }

    #[test]
    fn full_grid_stays_valid() {
        let (mut grid, ids) = grid(
            2,
            2,
            &[(1, 1, 1, 1), (2, 1, 1, 1), (1, 2, 1, 1), (2, 2, 1, 1)],
        );
        let outcome = grid.place_item(ids[0], CellPos::new(2, 2)).expect("known id");
        assert_eq!(outcome, PlacementOutcome::Success);
        assert_eq!(anchor(&grid, ids[0]), CellPos::new(2, 2));
        assert!(grid.collisions().layout_is_valid());
    }

    #[test]
    fn checkpoint_restores_and_diffs() {
        let (mut grid, ids) = grid(4, 4, &[(1, 1, 1, 1), (2, 2, 1, 1), (3, 3, 1, 1)]);
        let checkpoint = Checkpoint::capture(&grid.items);
        grid.items[2].anchor = CellPos::new(4, 4);
        grid.items[0].anchor = CellPos::new(4, 1);
        assert_eq!(checkpoint.moved(&grid.items), vec![ids[0], ids[2]]);
        checkpoint.restore(&mut grid.items);
        assert!(checkpoint.moved(&grid.items).is_empty());
        assert_eq!(anchor(&grid, ids[2]), CellPos::new(3, 3));
    }

    #[test]
    #[traced_test]
    fn placement_logs_committing_strategy() {
        let (mut grid, ids) = grid(4, 4, &[(1, 1, 1, 1), (2, 1, 1, 1)]);
        grid.place_item(ids[0], CellPos::new(2, 1)).expect("known id");
        assert!(logs_contain("placement committed"));
        assert!(logs_contain("Push"));
    }
}

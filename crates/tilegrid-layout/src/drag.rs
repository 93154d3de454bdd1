//! Pointer-to-cell quantization and the drag lifecycle.
//!
//! [`compute_drag_target`] is a pure function of the drag-start state and the
//! current pointer. [`DragController`] wraps it in an explicit state machine:
//!
//! ```text
//! Idle --begin--> Dragging --pointer_moved--> Dragging
//!   ^                 |
//!   +--release/cancel-+
//! ```
//!
//! # Quantization
//!
//! Each axis converts independently. Non-negative deltas round down and
//! negative deltas round up, so the item only crosses into a neighbouring
//! cell after the pointer travels a full cell pitch in that direction.

use serde::{Deserialize, Serialize};
use tilegrid_core::{CellPos, PointerPosition, Span};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::model::{Grid, ItemId};
use crate::placement::PlacementOutcome;

/// Everything the calculator needs about one drag sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragInput {
    pub start_pointer: PointerPosition,
    /// The mover's anchor when the drag began.
    pub start_cell: CellPos,
    pub current_pointer: PointerPosition,
    pub span: Span,
}

/// Quantized drag result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DragTarget {
    /// Raw cell under the pointer, clamped to the grid. For highlighting only.
    pub hover: CellPos,
    /// Legal anchor for the mover's span; what gets passed to placement.
    pub drop: CellPos,
}

/// Convert a pixel delta into whole cells, rounding toward zero.
///
/// Truncating division is floor for non-negative deltas and ceiling for
/// negative ones. A zero pitch yields zero.
#[must_use]
pub fn quantize_axis(delta: i32, pitch: u32) -> i32 {
    match i32::try_from(pitch) {
        Ok(0) => 0,
        Ok(pitch) => delta / pitch,
        Err(_) => 0,
    }
}

/// Map a pointer displacement to hover and drop cells.
///
/// Returns `None` while both axis deltas stay strictly inside the dead zone.
#[must_use]
pub fn compute_drag_target(config: &GridConfig, input: &DragInput) -> Option<DragTarget> {
    let (delta_x, delta_y) = input.current_pointer.delta_from(input.start_pointer);
    let dead_zone = u32::from(config.drag.dead_zone);
    if delta_x.unsigned_abs() < dead_zone && delta_y.unsigned_abs() < dead_zone {
        return None;
    }

    let pitch = config.cell_pitch();
    let hover = input.start_cell.offset_clamped(
        quantize_axis(delta_x, pitch),
        quantize_axis(delta_y, pitch),
        config.last_cell(),
    );
    let drop = hover.clamp_to(config.max_anchor(input.span));
    Some(DragTarget { hover, drop })
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: ItemId,
        start_pointer: PointerPosition,
        start_cell: CellPos,
        /// Latest quantized target; `None` while inside the dead zone.
        target: Option<DragTarget>,
    },
}

impl DragState {
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Item being dragged, if any.
    #[must_use]
    pub const fn item(&self) -> Option<ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { item, .. } => Some(*item),
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<DragTarget> {
        match self {
            Self::Idle => None,
            Self::Dragging { target, .. } => *target,
        }
    }
}

/// Drives one drag at a time against a grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Start dragging `item` from `pointer`. A drag already in progress is
    /// abandoned without touching the grid.
    pub fn begin<P>(
        &mut self,
        grid: &Grid<P>,
        item: ItemId,
        pointer: PointerPosition,
    ) -> Result<(), GridError> {
        let start_cell = grid
            .item(item)
            .map(|found| found.anchor())
            .ok_or(GridError::UnknownItem { id: item })?;
        if let Some(previous) = self.state.item() {
            tracing::debug!(item = previous.get(), "drag replaced before release");
        }
        self.state = DragState::Dragging {
            item,
            start_pointer: pointer,
            start_cell,
            target: None,
        };
        Ok(())
    }

    /// Feed a pointer sample. Returns the new target, if any.
    ///
    /// If the dragged item has disappeared from the grid the drag is
    /// cancelled.
    pub fn pointer_moved<P>(&mut self, grid: &Grid<P>, pointer: PointerPosition) -> Option<DragTarget> {
        let DragState::Dragging {
            item,
            start_pointer,
            start_cell,
            ..
        } = self.state
        else {
            return None;
        };
        let Some(span) = grid.item(item).map(|found| found.span()) else {
            self.state = DragState::Idle;
            return None;
        };

        let target = compute_drag_target(
            grid.config(),
            &DragInput {
                start_pointer,
                start_cell,
                current_pointer: pointer,
                span,
            },
        );
        self.state = DragState::Dragging {
            item,
            start_pointer,
            start_cell,
            target,
        };
        target
    }

    /// Finish the drag, placing the item at the last drop cell.
    ///
    /// Without a target (idle, or never left the dead zone) this is
    /// [`PlacementOutcome::NoMovement`]. The controller is idle afterwards
    /// whatever the outcome.
    pub fn release<P>(&mut self, grid: &mut Grid<P>) -> Result<PlacementOutcome, GridError> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                item,
                target: Some(target),
                ..
            } => grid.place_item(item, target.drop),
            _ => Ok(PlacementOutcome::NoMovement),
        }
    }

    /// Abandon the drag. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(&mut self.state).is_dragging()
    }
}

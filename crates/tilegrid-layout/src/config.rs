//! Grid configuration.
//!
//! [`GridConfig`] is the one value a host hands to [`Grid::new`](crate::Grid::new).
//! It deserializes with defaults for every missing field so hosts can keep
//! partial settings files.

use serde::{Deserialize, Serialize};
use tilegrid_core::{CellPos, Span};

use crate::error::GridError;

/// Default number of grid columns.
pub const GRID_DEFAULT_COLUMNS: u16 = 12;

/// Default number of grid rows.
pub const GRID_DEFAULT_ROWS: u16 = 8;

/// Default rendered cell size in pixels.
pub const GRID_DEFAULT_CELL_SIZE: u16 = 60;

/// Default gap between rendered cells in pixels.
pub const GRID_DEFAULT_GAP: u16 = 5;

/// Pointer travel (pixels, per axis) below which a drag yields no target.
pub const DRAG_DEFAULT_DEAD_ZONE: u16 = 8;

/// Pointer-to-cell quantization tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragTuning {
    /// A drag produces no candidate while both axis deltas stay strictly
    /// below this many pixels.
    pub dead_zone: u16,
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            dead_zone: DRAG_DEFAULT_DEAD_ZONE,
        }
    }
}

/// Grid dimensions and cell pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u16,
    pub rows: u16,
    /// Rendered cell size in pixels.
    pub cell_size: u16,
    /// Gap between cells in pixels.
    pub gap: u16,
    pub drag: DragTuning,
}

impl GridConfig {
    /// Create a config with the given dimensions and default pitch.
    #[must_use]
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Set the rendered cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: u16) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Set the gap between cells.
    #[must_use]
    pub fn with_gap(mut self, gap: u16) -> Self {
        self.gap = gap;
        self
    }

    /// Set the drag tuning.
    #[must_use]
    pub fn with_drag(mut self, drag: DragTuning) -> Self {
        self.drag = drag;
        self
    }

    /// Cell size plus gap: the pixel distance between neighbouring anchors.
    #[must_use]
    pub const fn cell_pitch(&self) -> u32 {
        self.cell_size as u32 + self.gap as u32
    }

    /// Largest legal anchor for an item of the given span.
    ///
    /// Spans wider than the grid saturate to anchor 1 on that axis.
    #[must_use]
    pub fn max_anchor(&self, span: Span) -> CellPos {
        CellPos::new(
            self.columns.saturating_sub(span.cols).saturating_add(1),
            self.rows.saturating_sub(span.rows).saturating_add(1),
        )
    }

    /// Bottom-right cell of the grid.
    #[must_use]
    pub const fn last_cell(&self) -> CellPos {
        CellPos::new(self.columns, self.rows)
    }

    /// Reject zero dimensions and a zero pitch.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.columns == 0 {
            return Err(GridError::ZeroDimension { axis: "column" });
        }
        if self.rows == 0 {
            return Err(GridError::ZeroDimension { axis: "row" });
        }
        if self.cell_pitch() == 0 {
            return Err(GridError::ZeroCellPitch {
                cell_size: self.cell_size,
                gap: self.gap,
            });
        }
        Ok(())
    }

    /// Reject spans that are empty or larger than the grid.
    pub fn validate_span(&self, span: Span) -> Result<(), GridError> {
        if span.is_empty() {
            return Err(GridError::ZeroSpan { id: None, span });
        }
        if span.cols > self.columns || span.rows > self.rows {
            return Err(GridError::SpanExceedsGrid {
                span,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: GRID_DEFAULT_COLUMNS,
            rows: GRID_DEFAULT_ROWS,
            cell_size: GRID_DEFAULT_CELL_SIZE,
            gap: GRID_DEFAULT_GAP,
            drag: DragTuning::default(),
        }
    }
}

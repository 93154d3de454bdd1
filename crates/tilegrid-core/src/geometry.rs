#![forbid(unsafe_code)]

//! Geometric primitives for 1-based cell grids.
//!
//! Grid coordinates are 1-based: the top-left cell of a grid is `(1, 1)`.
//! A footprint is described by its anchor (top-left occupied cell) and a
//! span. Right and bottom edges are exclusive, so an item anchored at column
//! 2 with a column span of 3 occupies columns 2, 3 and 4 and its
//! [`CellRect::right`] is 5.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid (1-based).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct CellPos {
    /// Column, starting at 1.
    pub col: u16,
    /// Row, starting at 1.
    pub row: u16,
}

impl CellPos {
    /// Create a new cell coordinate.
    #[inline]
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Offset by a signed delta, returning `None` if the result leaves the
    /// representable 1-based range.
    #[must_use]
    pub fn offset(self, delta_col: i32, delta_row: i32) -> Option<Self> {
        let col = i32::from(self.col).checked_add(delta_col)?;
        let row = i32::from(self.row).checked_add(delta_row)?;
        if col < 1 || row < 1 {
            return None;
        }
        Some(Self {
            col: u16::try_from(col).ok()?,
            row: u16::try_from(row).ok()?,
        })
    }

    /// Offset by a signed delta and clamp each axis into `[1, max]`.
    #[must_use]
    pub fn offset_clamped(self, delta_col: i32, delta_row: i32, max: CellPos) -> Self {
        Self {
            col: clamp_axis(i32::from(self.col).saturating_add(delta_col), max.col),
            row: clamp_axis(i32::from(self.row).saturating_add(delta_row), max.row),
        }
    }

    /// Clamp each axis into `[1, max]`.
    #[must_use]
    pub fn clamp_to(self, max: CellPos) -> Self {
        Self {
            col: self.col.clamp(1, max.col.max(1)),
            row: self.row.clamp(1, max.row.max(1)),
        }
    }
}

impl From<(u16, u16)> for CellPos {
    fn from((col, row): (u16, u16)) -> Self {
        Self::new(col, row)
    }
}

/// Clamp a signed coordinate into `[1, max]`.
#[inline]
pub fn clamp_axis(value: i32, max: u16) -> u16 {
    let max = i32::from(max.max(1));
    value.clamp(1, max) as u16
}

/// How many columns and rows an item covers from its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Column extent.
    pub cols: u16,
    /// Row extent.
    pub rows: u16,
}

impl Span {
    /// A single cell.
    pub const UNIT: Self = Self { cols: 1, rows: 1 };

    /// Create a new span.
    #[inline]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Whether either extent is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// The footprint rectangle of an item at a given anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    /// Anchor column (inclusive).
    pub col: u16,
    /// Anchor row (inclusive).
    pub row: u16,
    /// Column extent.
    pub cols: u16,
    /// Row extent.
    pub rows: u16,
}

impl CellRect {
    /// Create a new footprint rectangle.
    #[inline]
    pub const fn new(col: u16, row: u16, cols: u16, rows: u16) -> Self {
        Self {
            col,
            row,
            cols,
            rows,
        }
    }

    /// Build a footprint from an anchor and a span.
    #[inline]
    pub const fn at(anchor: CellPos, span: Span) -> Self {
        Self::new(anchor.col, anchor.row, span.cols, span.rows)
    }

    /// Anchor cell.
    #[inline]
    pub const fn anchor(&self) -> CellPos {
        CellPos::new(self.col, self.row)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.col as u32 + self.cols as u32
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.row as u32 + self.rows as u32
    }

    /// Check if the footprint covers a cell.
    #[inline]
    pub const fn contains(&self, cell: CellPos) -> bool {
        cell.col >= self.col
            && (cell.col as u32) < self.right()
            && cell.row >= self.row
            && (cell.row as u32) < self.bottom()
    }

    /// Interval overlap on both axes.
    #[inline]
    pub const fn intersects(&self, other: &CellRect) -> bool {
        (self.col as u32) < other.right()
            && self.right() > other.col as u32
            && (self.row as u32) < other.bottom()
            && self.bottom() > other.row as u32
    }

    /// Whether the footprint lies fully inside a `columns × rows` grid.
    #[inline]
    pub const fn fits_within(&self, columns: u16, rows: u16) -> bool {
        self.col >= 1
            && self.row >= 1
            && self.right() <= columns as u32 + 1
            && self.bottom() <= rows as u32 + 1
    }

    /// Enumerate covered cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + use<> {
        let Self {
            col,
            row,
            cols,
            rows,
        } = *self;
        (0..rows).flat_map(move |dr| (0..cols).map(move |dc| CellPos::new(col + dc, row + dr)))
    }
}

/// A pointer position in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    /// Create a new pointer position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Displacement from `origin` to `self`, saturating on overflow.
    #[inline]
    pub const fn delta_from(self, origin: PointerPosition) -> (i32, i32) {
        (
            self.x.saturating_sub(origin.x),
            self.y.saturating_sub(origin.y),
        )
    }
}

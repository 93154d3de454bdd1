//! Container operations: adding, inserting, removing, resizing and resetting
//! items.
//!
//! Every operation either commits a layout that satisfies the at-rest
//! invariants or leaves the grid untouched.

use tilegrid_core::{CellPos, CellRect, Span};

use crate::error::GridError;
use crate::model::{Grid, GridItem, ItemDescriptor, ItemId, ItemShape};
use crate::placement::PlacementOutcome;

/// Axis selector for span edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Column,
    Row,
}

impl<P> Grid<P> {
    /// Add an item at the first row-major anchor where `span` fits.
    ///
    /// If no anchor fits the full span, the item is shrunk to 1×1 and the scan
    /// repeats. Returns [`GridError::GridFull`] when not even a single cell is
    /// free.
    pub fn add_item(&mut self, span: Span, payload: P) -> Result<ItemId, GridError> {
        self.config.validate_span(span)?;

        let (anchor, span) = match self.first_fit(span) {
            Some(anchor) => (anchor, span),
            None => {
                let anchor = self.first_fit(Span::UNIT).ok_or(GridError::GridFull)?;
                tracing::debug!(
                    requested_cols = span.cols,
                    requested_rows = span.rows,
                    "no room for requested span, adding as 1x1"
                );
                (anchor, Span::UNIT)
            }
        };

        let id = self.allocate_id()?;
        self.items.push(GridItem::new(id, anchor, span, payload));
        tracing::debug!(item = id.get(), col = anchor.col, row = anchor.row, "item added");
        Ok(id)
    }

    /// Insert a pre-positioned item.
    ///
    /// The descriptor must name a valid span, lie fully inside the grid and
    /// overlap nothing. A missing id is allocated; an explicit id must be
    /// unused.
    pub fn insert(&mut self, descriptor: ItemDescriptor<P>) -> Result<ItemId, GridError> {
        let ItemDescriptor {
            id,
            anchor,
            span,
            payload,
        } = descriptor;

        if span.is_empty() {
            return Err(GridError::ZeroSpan { id, span });
        }
        self.config.validate_span(span)?;

        let id = match id {
            Some(id) if self.contains(id) => return Err(GridError::DuplicateItemId { id }),
            Some(id) => id,
            None => self.peek_id()?,
        };

        let shape = ItemShape { id, span };
        let view = self.collisions();
        if !view.in_bounds(shape, anchor) {
            return Err(GridError::OutOfBounds {
                id,
                anchor,
                span,
                columns: self.config.columns,
                rows: self.config.rows,
            });
        }
        if let Some(other) = view.collisions_at(shape, anchor).first() {
            return Err(GridError::Overlap {
                first: other.id(),
                second: id,
            });
        }

        self.reserve_id(id);
        self.items.push(GridItem::new(id, anchor, span, payload));
        Ok(id)
    }

    /// Drop an item, handing back its record.
    pub fn remove_item(&mut self, id: ItemId) -> Option<GridItem<P>> {
        let index = self.index_of(id)?;
        Some(self.items.remove(index))
    }

    /// Grow or shrink an item's column span by `delta`.
    ///
    /// The new span is clamped to `[1, columns]`. The edit is rejected with
    /// [`PlacementOutcome::Failed`] if the far edge would leave the grid or
    /// the new footprint overlaps another item.
    pub fn resize_column_span(&mut self, id: ItemId, delta: i32) -> Result<PlacementOutcome, GridError> {
        self.resize_span(id, Axis::Column, delta)
    }

    /// Grow or shrink an item's row span by `delta`. See
    /// [`resize_column_span`](Self::resize_column_span).
    pub fn resize_row_span(&mut self, id: ItemId, delta: i32) -> Result<PlacementOutcome, GridError> {
        self.resize_span(id, Axis::Row, delta)
    }

    /// Move an item by a cell delta, resolving collisions like
    /// [`place_item`](Self::place_item).
    pub fn move_by(
        &mut self,
        id: ItemId,
        delta_col: i32,
        delta_row: i32,
    ) -> Result<PlacementOutcome, GridError> {
        let index = self.require_index(id)?;
        let item = &self.items[index];
        let target = item.anchor.offset_clamped(
            delta_col,
            delta_row,
            self.config.max_anchor(item.span),
        );
        self.place_item(id, target)
    }

    /// Remove every item. Ids are not reused afterwards.
    pub fn reset(&mut self) {
        self.items.clear();
    }

    /// First row-major anchor where `span` fits without collision.
    fn first_fit(&self, span: Span) -> Option<CellPos> {
        let max = self.config.max_anchor(span);
        (1..=max.row)
            .flat_map(|row| (1..=max.col).map(move |col| CellPos::new(col, row)))
            .find(|&anchor| {
                let footprint = CellRect::at(anchor, span);
                !self
                    .items
                    .iter()
                    .any(|item| item.footprint().intersects(&footprint))
            })
    }

    fn resize_span(&mut self, id: ItemId, axis: Axis, delta: i32) -> Result<PlacementOutcome, GridError> {
        let index = self.require_index(id)?;
        let item = &self.items[index];
        let (current, limit) = match axis {
            Axis::Column => (item.span.cols, self.config.columns),
            Axis::Row => (item.span.rows, self.config.rows),
        };
        let requested = i32::from(current).saturating_add(delta);
        let next = u16::try_from(requested.clamp(1, i32::from(limit))).unwrap_or(limit);
        if next == current {
            return Ok(PlacementOutcome::NoMovement);
        }

        let span = match axis {
            Axis::Column => Span::new(next, item.span.rows),
            Axis::Row => Span::new(item.span.cols, next),
        };
        let shape = ItemShape { id, span };
        if self.collisions().has_collision(shape, item.anchor, &[]) {
            tracing::debug!(item = id.get(), ?axis, span = next, "resize rejected");
            return Ok(PlacementOutcome::Failed);
        }

        self.items[index].span = span;
        tracing::debug!(item = id.get(), ?axis, span = next, "item resized");
        Ok(PlacementOutcome::Success)
    }
}

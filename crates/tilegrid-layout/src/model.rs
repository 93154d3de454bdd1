//! Grid data model: the container and its item records.
//!
//! Items are stored by value in a `Vec`, addressed by a stable [`ItemId`].
//! Footprints are never cached; they are derived from anchor and span on
//! demand, so dropping an item needs no cleanup beyond removing the record.
//!
//! # Invariants (at rest)
//!
//! 1. Every footprint lies inside `[1, columns] × [1, rows]`.
//! 2. No two footprints intersect.
//! 3. Every span is at least 1×1.
//!
//! These may be broken transiently inside a placement attempt, never between
//! public calls.

use serde::{Deserialize, Serialize};
use tilegrid_core::{CellPos, CellRect, Span};

use crate::collision::Collisions;
use crate::config::GridConfig;
use crate::error::GridError;

/// Stable identifier for grid items.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// Lowest valid item ID.
    pub const MIN: Self = Self(1);

    /// Create a new item ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, GridError> {
        if raw == 0 {
            return Err(GridError::ZeroItemId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Return the next ID, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, GridError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(GridError::IdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::MIN
    }
}

/// Identity and span of an item: all a collision query needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemShape {
    pub id: ItemId,
    pub span: Span,
}

/// One widget on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridItem<P> {
    id: ItemId,
    pub(crate) anchor: CellPos,
    pub(crate) span: Span,
    payload: P,
}

impl<P> GridItem<P> {
    pub(crate) fn new(id: ItemId, anchor: CellPos, span: Span, payload: P) -> Self {
        Self {
            id,
            anchor,
            span,
            payload,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// Top-left occupied cell.
    #[must_use]
    pub const fn anchor(&self) -> CellPos {
        self.anchor
    }

    #[must_use]
    pub const fn column(&self) -> u16 {
        self.anchor.col
    }

    #[must_use]
    pub const fn row(&self) -> u16 {
        self.anchor.row
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub const fn column_span(&self) -> u16 {
        self.span.cols
    }

    #[must_use]
    pub const fn row_span(&self) -> u16 {
        self.span.rows
    }

    /// Current footprint rectangle.
    #[must_use]
    pub const fn footprint(&self) -> CellRect {
        CellRect::at(self.anchor, self.span)
    }

    #[must_use]
    pub const fn shape(&self) -> ItemShape {
        ItemShape {
            id: self.id,
            span: self.span,
        }
    }

    /// Caller-owned data; never interpreted by the grid.
    #[must_use]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }
}

/// A pre-positioned item handed to [`Grid::insert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDescriptor<P> {
    /// Explicit id, or `None` to allocate the next free one.
    #[serde(default)]
    pub id: Option<ItemId>,
    pub anchor: CellPos,
    pub span: Span,
    pub payload: P,
}

impl<P> ItemDescriptor<P> {
    #[must_use]
    pub fn new(anchor: CellPos, span: Span, payload: P) -> Self {
        Self {
            id: None,
            anchor,
            span,
            payload,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// A fixed-size cell grid holding non-overlapping items.
///
/// Iteration order is insertion order and is stable for the duration of a
/// placement attempt, which keeps resolution deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<P> {
    pub(crate) config: GridConfig,
    pub(crate) items: Vec<GridItem<P>>,
    pub(crate) next_id: ItemId,
}

impl<P> Grid<P> {
    /// Create an empty grid after validating the configuration.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self {
            config,
            items: Vec::new(),
            next_id: ItemId::MIN,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub const fn columns(&self) -> u16 {
        self.config.columns
    }

    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.config.rows
    }

    /// Items in stable iteration order.
    #[must_use]
    pub fn items(&self) -> &[GridItem<P>] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&GridItem<P>> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// Mutable access to an item's payload. Geometry stays grid-owned.
    pub fn payload_mut(&mut self, id: ItemId) -> Option<&mut P> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(GridItem::payload_mut)
    }

    /// `(id, anchor)` pairs in iteration order.
    pub fn anchors(&self) -> impl Iterator<Item = (ItemId, CellPos)> + '_ {
        self.items.iter().map(|item| (item.id, item.anchor))
    }

    /// Stateless geometric queries over the current layout.
    #[must_use]
    pub fn collisions(&self) -> Collisions<'_, P> {
        Collisions::new(&self.config, &self.items)
    }

    pub(crate) fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub(crate) fn require_index(&self, id: ItemId) -> Result<usize, GridError> {
        self.index_of(id).ok_or(GridError::UnknownItem { id })
    }

    /// Next unused id, without advancing the allocator.
    pub(crate) fn peek_id(&self) -> Result<ItemId, GridError> {
        let mut id = self.next_id;
        while self.contains(id) {
            id = id.checked_next()?;
        }
        Ok(id)
    }

    /// Hand out the next unused id.
    pub(crate) fn allocate_id(&mut self) -> Result<ItemId, GridError> {
        let id = self.peek_id()?;
        self.reserve_id(id);
        Ok(id)
    }

    /// Keep the allocator ahead of an explicitly chosen id.
    pub(crate) fn reserve_id(&mut self, id: ItemId) {
        if id >= self.next_id {
            self.next_id = id.checked_next().unwrap_or(id);
        }
    }
}

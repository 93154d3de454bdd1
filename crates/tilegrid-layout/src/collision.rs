//! Stateless geometric queries over a borrowed layout.
//!
//! Every query is a linear scan over the items; no spatial index is kept.
//! The working set is tens of items, so the scan beats index upkeep.
//!
//! Out-of-bounds placement counts as a collision in [`Collisions::has_collision`]
//! so call sites need a single check.

use std::collections::BTreeSet;

use tilegrid_core::{CellPos, CellRect};

use crate::config::GridConfig;
use crate::model::{GridItem, ItemId, ItemShape};

/// True iff `shape` anchored at `at` intersects `other`'s current footprint.
#[inline]
#[must_use]
pub fn overlaps<P>(shape: ItemShape, at: CellPos, other: &GridItem<P>) -> bool {
    CellRect::at(at, shape.span).intersects(&other.footprint())
}

/// Borrowed view answering collision queries.
#[derive(Debug)]
pub struct Collisions<'a, P> {
    config: &'a GridConfig,
    items: &'a [GridItem<P>],
}

impl<P> Clone for Collisions<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Collisions<'_, P> {}

impl<'a, P> Collisions<'a, P> {
    pub(crate) fn new(config: &'a GridConfig, items: &'a [GridItem<P>]) -> Self {
        Self { config, items }
    }

    /// Whether `shape` anchored at `at` lies fully inside the grid.
    #[must_use]
    pub fn in_bounds(&self, shape: ItemShape, at: CellPos) -> bool {
        CellRect::at(at, shape.span).fits_within(self.config.columns, self.config.rows)
    }

    /// True if the placement leaves the grid, or overlaps any item other than
    /// `shape` itself and the ids in `ignore`.
    #[must_use]
    pub fn has_collision(&self, shape: ItemShape, at: CellPos, ignore: &[ItemId]) -> bool {
        if !self.in_bounds(shape, at) {
            return true;
        }
        self.items.iter().any(|other| {
            other.id() != shape.id && !ignore.contains(&other.id()) && overlaps(shape, at, other)
        })
    }

    /// All other items that `shape` anchored at `at` would overlap.
    ///
    /// No bounds filtering: an out-of-grid anchor simply overlaps nothing there.
    #[must_use]
    pub fn collisions_at(&self, shape: ItemShape, at: CellPos) -> Vec<&'a GridItem<P>> {
        self.items
            .iter()
            .filter(|other| other.id() != shape.id && overlaps(shape, at, other))
            .collect()
    }

    /// Ids of [`collisions_at`](Self::collisions_at), in iteration order.
    #[must_use]
    pub fn collision_ids_at(&self, shape: ItemShape, at: CellPos) -> Vec<ItemId> {
        self.collisions_at(shape, at)
            .into_iter()
            .map(GridItem::id)
            .collect()
    }

    /// First item whose footprint covers `cell`.
    #[must_use]
    pub fn item_at(&self, cell: CellPos) -> Option<&'a GridItem<P>> {
        self.items.iter().find(|item| item.footprint().contains(cell))
    }

    /// Cells covered by `item`, optionally at a hypothetical anchor.
    #[must_use]
    pub fn footprint_cells(&self, item: &GridItem<P>, at: Option<CellPos>) -> BTreeSet<CellPos> {
        CellRect::at(at.unwrap_or(item.anchor()), item.span())
            .cells()
            .collect()
    }

    /// Union of all current footprints.
    #[must_use]
    pub fn occupied_cells(&self) -> BTreeSet<CellPos> {
        self.items
            .iter()
            .flat_map(|item| item.footprint().cells())
            .collect()
    }

    /// First pair of items whose current footprints intersect, if any.
    #[must_use]
    pub fn first_overlap(&self) -> Option<(ItemId, ItemId)> {
        self.items.iter().enumerate().find_map(|(i, a)| {
            self.items[i + 1..]
                .iter()
                .find(|b| a.footprint().intersects(&b.footprint()))
                .map(|b| (a.id(), b.id()))
        })
    }

    /// Whether every item is in bounds and nothing overlaps.
    #[must_use]
    pub fn layout_is_valid(&self) -> bool {
        self.items
            .iter()
            .all(|item| self.in_bounds(item.shape(), item.anchor()))
            && self.first_overlap().is_none()
    }
}

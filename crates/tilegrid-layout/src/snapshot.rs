//! Serializable grid snapshots, deterministic state hashes and invariant
//! reports.
//!
//! A [`GridSnapshot`] is plain data: the grid config, the allocator position
//! and one [`ItemRecord`] per item. [`Grid::from_snapshot`] re-validates every
//! record, so a hand-edited or corrupted snapshot cannot produce a grid that
//! violates the at-rest invariants.
//!
//! # Invariants checked by [`InvariantReport`]
//!
//! | Code | Meaning |
//! |------|---------|
//! | `zero_span` | An item spans no columns or no rows |
//! | `out_of_bounds` | A footprint leaves `[1, columns] × [1, rows]` |
//! | `overlap` | Two footprints intersect |
//! | `duplicate_id` | Two records share an id |

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};
use tilegrid_core::{CellPos, CellRect, Span};

use crate::config::GridConfig;
use crate::error::GridError;
use crate::model::{Grid, ItemDescriptor, ItemId};

/// Current snapshot schema version.
pub const GRID_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

fn default_snapshot_version() -> u16 {
    GRID_SNAPSHOT_SCHEMA_VERSION
}

/// One persisted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord<P> {
    pub id: ItemId,
    pub anchor: CellPos,
    pub span: Span,
    pub payload: P,
}

/// Persisted grid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot<P> {
    /// Schema version for migration detection.
    #[serde(default = "default_snapshot_version")]
    pub schema_version: u16,
    #[serde(default)]
    pub config: GridConfig,
    /// Allocator position, so restored grids never reuse a removed id.
    #[serde(default)]
    pub next_id: ItemId,
    #[serde(default)]
    pub items: Vec<ItemRecord<P>>,
}

impl<P> GridSnapshot<P> {
    /// Deterministic hash of config and geometry. Payloads are not hashed.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        layout_hash(
            &self.config,
            self.items
                .iter()
                .map(|record| (record.id, record.anchor, record.span)),
        )
    }

    /// Every violated invariant, without failing fast.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let geometry: Vec<_> = self
            .items
            .iter()
            .map(|record| (record.id, record.anchor, record.span))
            .collect();
        build_invariant_report(&self.config, &geometry, self.state_hash())
    }
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    ZeroSpan,
    OutOfBounds,
    Overlap,
    DuplicateId,
}

/// A single invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub item: ItemId,
    pub related: Option<ItemId>,
    pub message: String,
}

/// Structured invariant report over a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantReport {
    pub state_hash: u64,
    pub issues: Vec<InvariantIssue>,
}

impl InvariantReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether any finding carries `code`.
    #[must_use]
    pub fn has(&self, code: InvariantCode) -> bool {
        self.issues.iter().any(|issue| issue.code == code)
    }
}

impl<P: Clone> Grid<P> {
    /// Capture the current layout, payloads included.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot<P> {
        GridSnapshot {
            schema_version: GRID_SNAPSHOT_SCHEMA_VERSION,
            config: self.config,
            next_id: self.next_id,
            items: self
                .items
                .iter()
                .map(|item| ItemRecord {
                    id: item.id(),
                    anchor: item.anchor(),
                    span: item.span(),
                    payload: item.payload().clone(),
                })
                .collect(),
        }
    }
}

impl<P> Grid<P> {
    /// Rebuild a grid from a snapshot, validating every record.
    pub fn from_snapshot(snapshot: GridSnapshot<P>) -> Result<Self, GridError> {
        if snapshot.schema_version != GRID_SNAPSHOT_SCHEMA_VERSION {
            return Err(GridError::UnsupportedSchemaVersion {
                version: snapshot.schema_version,
                expected: GRID_SNAPSHOT_SCHEMA_VERSION,
            });
        }

        let mut grid = Self::new(snapshot.config)?;
        for record in snapshot.items {
            grid.insert(
                ItemDescriptor::new(record.anchor, record.span, record.payload).with_id(record.id),
            )?;
        }
        grid.next_id = grid.next_id.max(snapshot.next_id);
        tracing::debug!(
            items = grid.len(),
            state_hash = grid.state_hash(),
            "grid restored from snapshot"
        );
        Ok(grid)
    }

    /// Deterministic hash of config and geometry. Payloads are not hashed.
    ///
    /// Equal to the hash of [`snapshot`](Self::snapshot) for the same state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        layout_hash(
            &self.config,
            self.items
                .iter()
                .map(|item| (item.id(), item.anchor(), item.span())),
        )
    }

    /// Every violated invariant. Clean for any grid observed between public
    /// calls.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let geometry: Vec<_> = self
            .items
            .iter()
            .map(|item| (item.id(), item.anchor(), item.span()))
            .collect();
        build_invariant_report(&self.config, &geometry, self.state_hash())
    }
}

fn layout_hash(config: &GridConfig, items: impl Iterator<Item = (ItemId, CellPos, Span)>) -> u64 {
    let mut hasher = FxHasher::default();
    GRID_SNAPSHOT_SCHEMA_VERSION.hash(&mut hasher);
    config.columns.hash(&mut hasher);
    config.rows.hash(&mut hasher);
    config.cell_size.hash(&mut hasher);
    config.gap.hash(&mut hasher);
    config.drag.dead_zone.hash(&mut hasher);
    for (id, anchor, span) in items {
        id.hash(&mut hasher);
        anchor.hash(&mut hasher);
        span.hash(&mut hasher);
    }
    hasher.finish()
}

fn build_invariant_report(
    config: &GridConfig,
    items: &[(ItemId, CellPos, Span)],
    state_hash: u64,
) -> InvariantReport {
    let mut issues = Vec::new();
    let mut seen = FxHashSet::default();

    for &(id, anchor, span) in items {
        if !seen.insert(id) {
            issues.push(InvariantIssue {
                code: InvariantCode::DuplicateId,
                item: id,
                related: None,
                message: format!("item id {} appears more than once", id.get()),
            });
        }
        if span.is_empty() {
            issues.push(InvariantIssue {
                code: InvariantCode::ZeroSpan,
                item: id,
                related: None,
                message: format!("span {}x{} is empty", span.cols, span.rows),
            });
            continue;
        }
        if anchor.col == 0
            || anchor.row == 0
            || !CellRect::at(anchor, span).fits_within(config.columns, config.rows)
        {
            issues.push(InvariantIssue {
                code: InvariantCode::OutOfBounds,
                item: id,
                related: None,
                message: format!(
                    "footprint at ({}, {}) span {}x{} leaves the {}x{} grid",
                    anchor.col, anchor.row, span.cols, span.rows, config.columns, config.rows
                ),
            });
        }
    }

    for (i, &(id, anchor, span)) in items.iter().enumerate() {
        let footprint = CellRect::at(anchor, span);
        for &(other, other_anchor, other_span) in &items[i + 1..] {
            if footprint.intersects(&CellRect::at(other_anchor, other_span)) {
                issues.push(InvariantIssue {
                    code: InvariantCode::Overlap,
                    item: id,
                    related: Some(other),
                    message: format!("items {} and {} overlap", id.get(), other.get()),
                });
            }
        }
    }

    InvariantReport { state_hash, issues }
}

//! Error types for grid construction and item bookkeeping.
//!
//! Rejected placements are not errors: they surface as
//! [`PlacementOutcome::Failed`](crate::PlacementOutcome::Failed). The variants
//! here cover programming errors (bad dimensions, bad spans, unknown ids) and
//! malformed layouts handed to the grid from outside.

use tilegrid_core::{CellPos, Span};

use crate::model::ItemId;

/// Errors raised when a grid, item or snapshot violates a precondition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid must have at least one {axis}")]
    ZeroDimension { axis: &'static str },

    #[error("cell pitch must be positive (cell_size={cell_size}, gap={gap})")]
    ZeroCellPitch { cell_size: u16, gap: u16 },

    #[error("item id 0 is reserved")]
    ZeroItemId,

    #[error("item id space exhausted after {current:?}")]
    IdOverflow { current: ItemId },

    #[error("item {id:?} has an empty span {span:?}")]
    ZeroSpan { id: Option<ItemId>, span: Span },

    #[error("span {span:?} does not fit a {columns}x{rows} grid")]
    SpanExceedsGrid { span: Span, columns: u16, rows: u16 },

    #[error("item {id:?} at {anchor:?} with span {span:?} leaves the {columns}x{rows} grid")]
    OutOfBounds {
        id: ItemId,
        anchor: CellPos,
        span: Span,
        columns: u16,
        rows: u16,
    },

    #[error("items {first:?} and {second:?} overlap")]
    Overlap { first: ItemId, second: ItemId },

    #[error("item id {id:?} is already in use")]
    DuplicateItemId { id: ItemId },

    #[error("no item with id {id:?}")]
    UnknownItem { id: ItemId },

    #[error("no free cell can host a new item")]
    GridFull,

    #[error("unsupported snapshot schema version {version} (expected {expected})")]
    UnsupportedSchemaVersion { version: u16, expected: u16 },
}

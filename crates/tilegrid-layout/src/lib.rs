#![forbid(unsafe_code)]

//! Widget placement and collision resolution for fixed-size cell grids.
//!
//! A [`Grid`] holds rectangular items at 1-based anchors. Moves go through
//! [`Grid::place_item`], which either commits a non-overlapping layout
//! (pushing, swapping or relocating neighbours as needed) or leaves the grid
//! exactly as it was. Pointer drags are quantized into target cells by
//! [`compute_drag_target`] and driven end to end by [`DragController`].
//!
//! ```
//! use tilegrid_layout::{CellPos, Grid, GridConfig, PlacementOutcome, Span};
//!
//! let mut grid = Grid::new(GridConfig::new(4, 4))?;
//! let a = grid.add_item(Span::UNIT, "a")?;
//! let b = grid.add_item(Span::UNIT, "b")?;
//!
//! assert_eq!(grid.place_item(a, CellPos::new(2, 1))?, PlacementOutcome::Success);
//! assert_eq!(grid.item(b).map(|item| item.anchor()), Some(CellPos::new(3, 1)));
//! # Ok::<(), tilegrid_layout::GridError>(())
//! ```

pub mod collision;
pub mod config;
pub mod container;
pub mod drag;
pub mod error;
pub mod model;
pub mod placement;
pub mod snapshot;

pub use collision::{Collisions, overlaps};
pub use config::{
    DRAG_DEFAULT_DEAD_ZONE, DragTuning, GRID_DEFAULT_CELL_SIZE, GRID_DEFAULT_COLUMNS,
    GRID_DEFAULT_GAP, GRID_DEFAULT_ROWS, GridConfig,
};
pub use drag::{DragController, DragInput, DragState, DragTarget, compute_drag_target, quantize_axis};
pub use error::GridError;
pub use model::{Grid, GridItem, ItemDescriptor, ItemId, ItemShape};
pub use placement::{Checkpoint, PlacementOutcome, PlacementReport, ResolutionStrategy};
pub use snapshot::{
    GRID_SNAPSHOT_SCHEMA_VERSION, GridSnapshot, InvariantCode, InvariantIssue, InvariantReport,
    ItemRecord,
};
pub use tilegrid_core::{CellPos, CellRect, PointerPosition, Span};

#![forbid(unsafe_code)]

//! Core: geometry shared by the tilegrid engine and its hosts.
//!
//! # Role in tilegrid
//! `tilegrid-core` holds the plain-data vocabulary every other crate speaks:
//! 1-based cell coordinates, spans, footprint rectangles and host pointer
//! positions. It carries no grid state of its own.

pub mod geometry;

pub use geometry::{CellPos, CellRect, PointerPosition, Span};

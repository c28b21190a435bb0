//! glyphdeck-core — grid primitives and the surface/entity data model.
//!
//! This crate holds everything the compositor in `glyphdeck-render` reads:
//! integer geometry, RGBA color, glyph cells, font metrics, surfaces and the
//! entity overlay layer. It contains no per-frame logic of its own.

pub mod cell;
pub mod color;
pub mod entity;
pub mod font;
pub mod geometry;
pub mod surface;

// Re-export the types nearly every consumer needs.
pub use cell::Cell;
pub use color::Rgba;
pub use entity::{Entity, EntityId, EntityLayer, EntityPosition};
pub use font::FontMetrics;
pub use geometry::{Point, Rect};
pub use surface::Surface;

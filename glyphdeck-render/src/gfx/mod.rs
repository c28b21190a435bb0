//! Graphics backend abstraction.
//!
//! The compositor never talks to a GPU directly; it issues the four
//! primitive operations every backend of interest can provide — render to
//! offscreen target, clear, draw glyph, draw textured quad — through the
//! `RenderBackend` trait. `HeadlessBackend` is the bundled reference
//! implementation used by the tests and by headless hosts.

pub mod backend;
pub mod headless;

pub use backend::{DrawCall, RenderBackend, TextureHandle};
pub use headless::{DrawOp, HeadlessBackend};

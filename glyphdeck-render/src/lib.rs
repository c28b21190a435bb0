//! glyphdeck-render — the compositing and mouse-routing core.
//!
//! One frame tick drives, in strict order: input sampling
//! (`MouseTracker::update`) → routing (`MouseTracker::process`) → render-step
//! pre-start → refresh → render-start → backend present
//! (`CompositeRenderer::render`). Everything is synchronous and
//! single-threaded; no callback suspends.

pub mod config;
pub mod error;
pub mod gfx;
pub mod input;
pub mod pipeline;

pub use config::MouseConfig;
pub use error::StepError;
pub use gfx::{DrawCall, HeadlessBackend, RenderBackend, TextureHandle};
pub use input::{
    ConsoleId, ConsoleTree, MouseConsoleState, MouseState, MouseTarget, MouseTracker,
    PointerDevice, RawPointerState,
};
pub use pipeline::{CompositeRenderer, EntityRenderStep, RenderStep, ScreenRenderer};

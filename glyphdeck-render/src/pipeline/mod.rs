//! The per-frame render pipeline.
//!
//! A surface's renderer drives an ordered list of render steps through a
//! fixed lifecycle each frame:
//!
//!   pre_start (resize check) → refresh (repaint if stale) →
//!   render_start (draw-call enqueue) → render_end → present
//!
//! Steps own their cached offscreen textures and nothing else; the renderer
//! and surface are handed to each callback rather than stored, which keeps
//! ownership acyclic.

pub mod composite;
pub mod entity_step;

use std::any::Any;

use glyphdeck_core::{Rgba, Surface};

use crate::error::StepError;
use crate::gfx::RenderBackend;

pub use composite::CompositeRenderer;
pub use entity_step::EntityRenderStep;

/// The host a render step is attached to.
///
/// `as_any` exists so steps can verify at attach time that the host is the
/// compositing kind they were written for — binding to anything else is a
/// caller setup error, reported fail-fast.
pub trait ScreenRenderer {
    fn as_any(&self) -> &dyn Any;

    /// Final composited tint the host applies to its output.
    fn composite_tint(&self) -> Rgba;

    /// True when the host demands a repaint regardless of dirty state.
    fn is_force_redraw(&self) -> bool;
}

/// A pluggable stage in a surface's render pipeline.
///
/// Lifecycle callbacks are invoked by the host in the fixed order described
/// in the module docs. Detach and surface-null paths must be idempotent and
/// safe on a partially initialized step.
pub trait RenderStep {
    /// Compositing order among sibling steps; lower paints first.
    fn sort_order(&self) -> i32;

    /// Bind to a host and target surface. Delegates to
    /// [`RenderStep::on_surface_changed`] to resolve the data source.
    fn on_attach(
        &mut self,
        renderer: &dyn ScreenRenderer,
        backend: &mut dyn RenderBackend,
        surface: &Surface,
    ) -> Result<(), StepError>;

    /// The target surface was replaced. `None` means detachment: release
    /// the cached texture and clear bindings. `Some` re-resolves the data
    /// source; texture sizing is deferred to `pre_start`.
    fn on_surface_changed(
        &mut self,
        renderer: &dyn ScreenRenderer,
        backend: &mut dyn RenderBackend,
        surface: Option<&Surface>,
    ) -> Result<(), StepError>;

    /// Per-frame geometry check. Returns true iff the cached texture was
    /// (re)allocated and the host needs to recomposite.
    fn pre_start(&mut self, backend: &mut dyn RenderBackend, surface: &Surface) -> bool;

    /// Enqueue this step's contribution to the screen, when the surface is
    /// not composited through the host's own opaque fast path.
    fn render_start(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: &Surface,
        renderer: &dyn ScreenRenderer,
    );

    /// Repaint the cached texture if the data source is stale.
    fn refresh(&mut self, backend: &mut dyn RenderBackend, surface: &mut Surface, force_redraw: bool);

    /// End-of-frame hook. Present stays with the host.
    fn render_end(&mut self, _backend: &mut dyn RenderBackend, _surface: &Surface) {}

    /// Unbind and release the cached texture. Idempotent.
    fn on_detach(&mut self, backend: &mut dyn RenderBackend);
}

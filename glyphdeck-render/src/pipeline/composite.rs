//! The compositing render host.
//!
//! Owns the ordered step list for one surface and drives the frame. The
//! broader framework's full-surface opaque fast path (where the host itself
//! draws one texture covering every layer) is outside this excerpt; this
//! host composites whatever its steps enqueue and presents.

use std::any::Any;

use glyphdeck_core::{Rgba, Surface};

use crate::error::StepError;
use crate::gfx::RenderBackend;

use super::{RenderStep, ScreenRenderer};

pub struct CompositeRenderer {
    steps: Vec<Box<dyn RenderStep>>,
    /// One-shot repaint demand; cleared after the frame that honors it.
    force_redraw: bool,
    /// Tint applied on top of each surface's own tint at composite time.
    pub tint: Rgba,
}

impl Default for CompositeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeRenderer {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            force_redraw: false,
            tint: Rgba::WHITE,
        }
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn request_redraw(&mut self) {
        self.force_redraw = true;
    }

    /// Attach a step and insert it in sort order. Attach errors propagate
    /// without the step being added.
    pub fn add_step(
        &mut self,
        mut step: Box<dyn RenderStep>,
        backend: &mut dyn RenderBackend,
        surface: &Surface,
    ) -> Result<(), StepError> {
        step.on_attach(self, backend, surface)?;
        let order = step.sort_order();
        let at = self
            .steps
            .partition_point(|s| s.sort_order() <= order);
        self.steps.insert(at, step);
        tracing::info!(order, total = self.steps.len(), "render step attached");
        Ok(())
    }

    /// Detach and drop the step at `index`. Releases its cached texture.
    pub fn remove_step(&mut self, index: usize, backend: &mut dyn RenderBackend) {
        if index >= self.steps.len() {
            return;
        }
        let mut step = self.steps.remove(index);
        step.on_detach(backend);
        tracing::info!(index, total = self.steps.len(), "render step detached");
    }

    /// Detach every step. Used when the owning surface goes away.
    pub fn clear_steps(&mut self, backend: &mut dyn RenderBackend) {
        for step in &mut self.steps {
            step.on_detach(backend);
        }
        self.steps.clear();
    }

    /// Drive one frame in the fixed lifecycle order, then present.
    pub fn render(&mut self, backend: &mut dyn RenderBackend, surface: &mut Surface) {
        // Steps are moved out for the duration of the frame so they can be
        // handed `&self` as the renderer.
        let mut steps = std::mem::take(&mut self.steps);

        let mut needs_composite = false;
        for step in steps.iter_mut() {
            needs_composite |= step.pre_start(backend, surface);
        }

        // A reallocated texture is blank; it must be repainted this frame.
        let force = self.force_redraw || needs_composite;
        for step in steps.iter_mut() {
            step.refresh(backend, surface, force);
        }

        for step in steps.iter_mut() {
            step.render_start(backend, surface, &*self);
        }

        for step in steps.iter_mut() {
            step.render_end(backend, surface);
        }

        backend.present();

        self.steps = steps;
        self.force_redraw = false;
    }
}

impl ScreenRenderer for CompositeRenderer {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn composite_tint(&self) -> Rgba {
        self.tint
    }

    fn is_force_redraw(&self) -> bool {
        self.force_redraw
    }
}

//! Render step for a surface's entity overlay layer.
//!
//! Keeps a cached offscreen texture sized to the surface's pixel area and
//! repaints it only when the layer reports changes (or the host forces a
//! redraw). The layer's dirty flag is cleared here and nowhere else.

use glyphdeck_core::{EntityPosition, Rect, Surface};

use crate::error::StepError;
use crate::gfx::{RenderBackend, TextureHandle};

use super::{CompositeRenderer, RenderStep, ScreenRenderer};

pub struct EntityRenderStep {
    target: Option<TextureHandle>,
    target_size: (u32, u32),
    bound: bool,
    sort_order: i32,
}

impl EntityRenderStep {
    /// Entities composite above the surface's own cell layer.
    pub const DEFAULT_SORT_ORDER: i32 = 50;

    pub fn new() -> Self {
        Self::with_sort_order(Self::DEFAULT_SORT_ORDER)
    }

    pub fn with_sort_order(sort_order: i32) -> Self {
        Self {
            target: None,
            target_size: (0, 0),
            bound: false,
            sort_order,
        }
    }

    /// The cached texture, if one has been allocated.
    pub fn target(&self) -> Option<TextureHandle> {
        self.target
    }

    fn release_target(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(target) = self.target.take() {
            backend.release_texture(target);
            self.target_size = (0, 0);
        }
    }
}

impl Default for EntityRenderStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStep for EntityRenderStep {
    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn on_attach(
        &mut self,
        renderer: &dyn ScreenRenderer,
        backend: &mut dyn RenderBackend,
        surface: &Surface,
    ) -> Result<(), StepError> {
        renderer
            .as_any()
            .downcast_ref::<CompositeRenderer>()
            .ok_or(StepError::IncompatibleRenderer {
                expected: "composite",
            })?;
        self.on_surface_changed(renderer, backend, Some(surface))
    }

    fn on_surface_changed(
        &mut self,
        _renderer: &dyn ScreenRenderer,
        backend: &mut dyn RenderBackend,
        surface: Option<&Surface>,
    ) -> Result<(), StepError> {
        let Some(surface) = surface else {
            self.release_target(backend);
            self.bound = false;
            return Ok(());
        };

        // Resolve the data source now; sizing waits for pre_start.
        if surface.entity_layer().is_none() {
            self.bound = false;
            return Err(StepError::MissingEntityLayer);
        }
        self.bound = true;
        Ok(())
    }

    fn pre_start(&mut self, backend: &mut dyn RenderBackend, surface: &Surface) -> bool {
        let area = surface.pixel_area();
        if self.target.is_some() && self.target_size == area {
            return false;
        }
        self.release_target(backend);
        let handle = backend.create_texture(area.0, area.1);
        tracing::debug!(width = area.0, height = area.1, "entity target reallocated");
        self.target = Some(handle);
        self.target_size = area;
        true
    }

    fn render_start(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: &Surface,
        renderer: &dyn ScreenRenderer,
    ) {
        // The opaque path is composited by the host's full-surface draw;
        // this step only contributes when the surface tint says otherwise.
        if surface.tint.is_opaque() {
            return;
        }
        if let Some(target) = self.target {
            let tint = surface.tint.modulate(renderer.composite_tint());
            backend.draw_texture(target, surface.position, tint);
        }
    }

    fn refresh(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: &mut Surface,
        force_redraw: bool,
    ) {
        let Some(target) = self.target else {
            return;
        };

        let font = surface.font();
        let Some(layer) = surface.entity_layer_mut() else {
            // Capability vanished after binding; nothing to paint from.
            return;
        };

        if !force_redraw && !layer.is_dirty() {
            tracing::trace!("entity refresh skipped, layer clean");
            return;
        }

        backend.begin_offscreen(target);
        backend.clear(glyphdeck_core::Rgba::TRANSPARENT);

        let mut painted = 0usize;
        for entity in layer.visible_entities_mut() {
            let dest = match entity.position {
                EntityPosition::Grid(p) => font.grid_rect(p.x, p.y),
                EntityPosition::Pixels(p) => Rect::new(
                    p.x,
                    p.y,
                    font.cell_width as i32,
                    font.cell_height as i32,
                ),
            };
            backend.draw_glyph(
                entity.appearance.glyph,
                dest,
                entity.appearance.foreground,
                entity.appearance.background,
            );
            entity.appearance.dirty = false;
            painted += 1;
        }

        backend.end_offscreen();

        // Single authoritative reset of the layer's change signal.
        layer.clear_dirty();
        tracing::trace!(painted, "entity layer repainted");
    }

    fn on_detach(&mut self, backend: &mut dyn RenderBackend) {
        self.release_target(backend);
        self.bound = false;
    }
}

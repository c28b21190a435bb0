//! A surface: a rectangular grid of glyph cells composited as a unit.
//!
//! Surfaces carry their own absolute screen position, an overall tint, and
//! optional attached capabilities. The only capability this excerpt of the
//! framework knows about is the entity layer; render steps resolve it at
//! bind time and fail fast when it is missing.

use crate::cell::Cell;
use crate::color::Rgba;
use crate::entity::EntityLayer;
use crate::font::FontMetrics;
use crate::geometry::Point;

#[derive(Debug)]
pub struct Surface {
    cols: u32,
    rows: u32,
    font: FontMetrics,
    /// Absolute screen position, in pixels.
    pub position: Point,
    /// Overall tint/opacity applied when the surface is composited.
    pub tint: Rgba,
    cells: Vec<Cell>,
    entities: Option<EntityLayer>,
}

impl Surface {
    pub fn new(cols: u32, rows: u32, font: FontMetrics) -> Self {
        Self {
            cols,
            rows,
            font,
            position: Point::ZERO,
            tint: Rgba::WHITE,
            cells: vec![Cell::blank(); (cols * rows) as usize],
            entities: None,
        }
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn font(&self) -> FontMetrics {
        self.font
    }

    /// Current pixel area of the whole grid.
    pub fn pixel_area(&self) -> (u32, u32) {
        self.font.pixel_area(self.cols, self.rows)
    }

    /// Change the grid dimensions. Cell contents are reset; render steps
    /// pick the new geometry up lazily on their next pre-start check.
    pub fn resize(&mut self, cols: u32, rows: u32) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        tracing::debug!(cols, rows, "surface resized");
        self.cols = cols;
        self.rows = rows;
        self.cells = vec![Cell::blank(); (cols * rows) as usize];
        if let Some(layer) = &mut self.entities {
            layer.mark_dirty();
        }
    }

    pub fn cell_at(&self, col: u32, row: u32) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    pub fn cell_at_mut(&mut self, col: u32, row: u32) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get_mut((row * self.cols + col) as usize)
    }

    pub fn set_glyph(&mut self, col: u32, row: u32, glyph: u32, fg: Rgba, bg: Rgba) {
        if let Some(cell) = self.cell_at_mut(col, row) {
            cell.set_glyph(glyph);
            cell.set_colors(fg, bg);
        }
    }

    // ── Capabilities ─────────────────────────────────────────────────

    /// Attach an entity layer. Replaces any existing one.
    pub fn attach_entity_layer(&mut self, layer: EntityLayer) {
        self.entities = Some(layer);
    }

    pub fn detach_entity_layer(&mut self) -> Option<EntityLayer> {
        self.entities.take()
    }

    pub fn entity_layer(&self) -> Option<&EntityLayer> {
        self.entities.as_ref()
    }

    pub fn entity_layer_mut(&mut self) -> Option<&mut EntityLayer> {
        self.entities.as_mut()
    }
}

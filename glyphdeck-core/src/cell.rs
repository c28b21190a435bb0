//! The glyph cell — the unit of everything drawn on a surface.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// One colored glyph. `glyph` is an index into whatever font atlas the
/// backend uses; this crate never rasterizes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: u32,
    pub foreground: Rgba,
    pub background: Rgba,
    /// Set by whoever mutates the cell; cleared when the cell is painted.
    #[serde(skip)]
    pub dirty: bool,
}

impl Cell {
    pub fn new(glyph: u32, foreground: Rgba, background: Rgba) -> Self {
        Self {
            glyph,
            foreground,
            background,
            dirty: true,
        }
    }

    /// A blank cell: glyph 0, white on transparent.
    pub fn blank() -> Self {
        Self::new(0, Rgba::WHITE, Rgba::TRANSPARENT)
    }

    pub fn set_glyph(&mut self, glyph: u32) {
        if self.glyph != glyph {
            self.glyph = glyph;
            self.dirty = true;
        }
    }

    pub fn set_colors(&mut self, foreground: Rgba, background: Rgba) {
        if self.foreground != foreground || self.background != background {
            self.foreground = foreground;
            self.background = background;
            self.dirty = true;
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

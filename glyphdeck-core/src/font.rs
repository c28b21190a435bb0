//! Grid ↔ pixel geometry.
//!
//! The compositor only ever needs the cell box size; glyph rasterization is
//! the backend's problem.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Pixel dimensions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
}

impl FontMetrics {
    pub fn new(cell_width: u32, cell_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Pixel rectangle covered by the cell at `(col, row)`, relative to the
    /// surface origin.
    pub fn grid_rect(&self, col: i32, row: i32) -> Rect {
        Rect::new(
            col * self.cell_width as i32,
            row * self.cell_height as i32,
            self.cell_width as i32,
            self.cell_height as i32,
        )
    }

    /// Pixel area of a `cols × rows` grid.
    pub fn pixel_area(&self, cols: u32, rows: u32) -> (u32, u32) {
        (cols * self.cell_width, rows * self.cell_height)
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        // Classic 8×16 terminal cell.
        Self::new(8, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rect_scales_by_cell_size() {
        let f = FontMetrics::new(10, 20);
        assert_eq!(f.grid_rect(3, 2), Rect::new(30, 40, 10, 20));
    }

    #[test]
    fn pixel_area() {
        let f = FontMetrics::new(8, 16);
        assert_eq!(f.pixel_area(80, 25), (640, 400));
    }
}

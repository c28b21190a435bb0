//! The `RenderBackend` trait — the compositor's only view of the GPU.

use glyphdeck_core::{Point, Rect, Rgba};

/// Opaque handle to a backend-owned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// A composited draw submitted to the screen (outside any offscreen pass).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub texture: TextureHandle,
    pub position: Point,
    pub tint: Rgba,
}

/// External graphics collaborator.
///
/// Call discipline per frame: any number of offscreen passes
/// (`begin_offscreen` … `end_offscreen`), then screen-level `draw_texture`
/// calls, then `present`. All methods are infallible from the caller's point
/// of view — a backend that loses its device surfaces that through its own
/// channels, not through this trait.
pub trait RenderBackend {
    /// Allocate an offscreen texture of the given pixel size.
    fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle;

    /// Release a texture. Idempotent: releasing an unknown or already
    /// released handle is a no-op.
    fn release_texture(&mut self, handle: TextureHandle);

    /// Pixel size of a live texture, `None` once released.
    fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)>;

    /// Direct subsequent clear/draw calls into `target`.
    fn begin_offscreen(&mut self, target: TextureHandle);

    /// Fill the current target with `color`, discarding prior contents.
    fn clear(&mut self, color: Rgba);

    /// Draw one glyph cell into the current target at `dest`.
    fn draw_glyph(&mut self, glyph: u32, dest: Rect, fg: Rgba, bg: Rgba);

    /// End the current offscreen pass.
    fn end_offscreen(&mut self);

    /// Draw a textured quad to the screen at `position`, modulated by `tint`.
    fn draw_texture(&mut self, handle: TextureHandle, position: Point, tint: Rgba);

    /// Flip the frame.
    fn present(&mut self);
}

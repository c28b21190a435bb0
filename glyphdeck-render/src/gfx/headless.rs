//! Recording backend for tests and headless hosts.
//!
//! Textures keep their draw-op list and a content version; the version only
//! moves when an op actually lands in the texture, which is what lets tests
//! assert "refresh without dirty work left the buffer untouched".

use std::collections::HashMap;

use glyphdeck_core::{Point, Rect, Rgba};

use super::backend::{DrawCall, RenderBackend, TextureHandle};

/// One recorded offscreen operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Clear { color: Rgba },
    Glyph { glyph: u32, dest: Rect, fg: Rgba, bg: Rgba },
}

#[derive(Debug, Default)]
struct TextureEntry {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    version: u64,
}

/// In-memory `RenderBackend` that records everything.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    textures: HashMap<u64, TextureEntry>,
    next_handle: u64,
    current_target: Option<TextureHandle>,
    screen: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames_presented: u64,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content version of a texture; bumps on every op drawn into it.
    pub fn texture_version(&self, handle: TextureHandle) -> Option<u64> {
        self.textures.get(&handle.0).map(|t| t.version)
    }

    /// Recorded offscreen ops currently held by the texture.
    pub fn texture_ops(&self, handle: TextureHandle) -> Option<&[DrawOp]> {
        self.textures.get(&handle.0).map(|t| t.ops.as_slice())
    }

    /// Number of live textures.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Screen draw calls queued since the last present.
    pub fn pending_screen_calls(&self) -> &[DrawCall] {
        &self.screen
    }

    /// Screen draw calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    fn current_entry(&mut self) -> Option<&mut TextureEntry> {
        let target = self.current_target?;
        let entry = self.textures.get_mut(&target.0);
        if entry.is_none() {
            tracing::warn!(handle = target.0, "draw into released texture ignored");
        }
        entry
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle {
        self.next_handle += 1;
        let handle = TextureHandle(self.next_handle);
        self.textures.insert(
            handle.0,
            TextureEntry {
                width,
                height,
                ops: Vec::new(),
                version: 0,
            },
        );
        tracing::debug!(handle = handle.0, width, height, "texture created");
        handle
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle.0).is_some() {
            tracing::debug!(handle = handle.0, "texture released");
        }
        if self.current_target == Some(handle) {
            self.current_target = None;
        }
    }

    fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle.0).map(|t| (t.width, t.height))
    }

    fn begin_offscreen(&mut self, target: TextureHandle) {
        if !self.textures.contains_key(&target.0) {
            tracing::warn!(handle = target.0, "begin_offscreen on unknown texture");
            return;
        }
        self.current_target = Some(target);
    }

    fn clear(&mut self, color: Rgba) {
        if let Some(entry) = self.current_entry() {
            entry.ops.clear();
            entry.ops.push(DrawOp::Clear { color });
            entry.version += 1;
        }
    }

    fn draw_glyph(&mut self, glyph: u32, dest: Rect, fg: Rgba, bg: Rgba) {
        if let Some(entry) = self.current_entry() {
            entry.ops.push(DrawOp::Glyph { glyph, dest, fg, bg });
            entry.version += 1;
        }
    }

    fn end_offscreen(&mut self) {
        self.current_target = None;
    }

    fn draw_texture(&mut self, handle: TextureHandle, position: Point, tint: Rgba) {
        if !self.textures.contains_key(&handle.0) {
            tracing::warn!(handle = handle.0, "draw_texture with released handle ignored");
            return;
        }
        self.screen.push(DrawCall {
            texture: handle,
            position,
            tint,
        });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.screen);
        self.frames_presented += 1;
    }
}

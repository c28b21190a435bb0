//! Linear RGBA color with straight-alpha compositing.

use serde::{Deserialize, Serialize};

/// A color with components in `0.0..=1.0`. Alpha is straight (not
/// premultiplied); `over` does the premultiply internally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };
    pub const WHITE: Rgba = Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha = 1.0).
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Source-over compositing: `self` drawn on top of `dst`.
    pub fn over(&self, dst: Rgba) -> Rgba {
        let sa = self.a.clamp(0.0, 1.0);
        let da = dst.a.clamp(0.0, 1.0);
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let blend = |s: f32, d: f32| (s * sa + d * da * (1.0 - sa)) / out_a;
        Rgba {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: out_a,
        }
    }

    /// Component-wise modulation, used for tinting textures.
    pub fn modulate(&self, tint: Rgba) -> Rgba {
        Rgba {
            r: self.r * tint.r,
            g: self.g * tint.g,
            b: self.b * tint.b,
            a: self.a * tint.a,
        }
    }

    /// Convert to 8-bit sRGB-ish bytes, clamped.
    pub fn to_srgb8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

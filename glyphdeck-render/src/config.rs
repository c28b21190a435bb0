//! Runtime configuration for the mouse tracker.

use serde::{Deserialize, Serialize};

/// Tunables for click derivation and device→screen mapping.
///
/// The double-click window defaults to 500 ms. Device coordinates are mapped
/// into the logical render surface as `raw * render_scale - offset * render_scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfig {
    /// Maximum time between two click transitions for the second one to
    /// count as a double-click, in milliseconds.
    pub double_click_window_ms: u64,
    /// Scale factor from raw device pixels to logical render pixels.
    pub render_scale: f32,
    /// Render-area offset in raw device pixels, subtracted after scaling.
    pub render_offset: (f32, f32),
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            double_click_window_ms: 500,
            render_scale: 1.0,
            render_offset: (0.0, 0.0),
        }
    }
}

impl MouseConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let cfg = serde_json::from_str(json)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_half_second() {
        assert_eq!(MouseConfig::default().double_click_window_ms, 500);
    }

    #[test]
    fn from_json_partial_fills_defaults() {
        let cfg = MouseConfig::from_json(r#"{"double_click_window_ms": 250}"#).unwrap();
        assert_eq!(cfg.double_click_window_ms, 250);
        assert_eq!(cfg.render_scale, 1.0);
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(MouseConfig::from_json("not json").is_err());
    }
}

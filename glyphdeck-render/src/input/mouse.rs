//! Mouse state sampling and click derivation.
//!
//! `update` runs once per frame before routing. Clicks are detected on
//! release: a button that was down last frame and is up this frame produces
//! `clicked = true` for exactly one frame. A double-click is a click whose
//! per-button time-since-previous-click is inside the configured window.

use std::time::Duration;

use glyphdeck_core::Point;

use crate::config::MouseConfig;
use crate::input::routing::ConsoleId;

/// Raw device state, sampled exactly once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPointerState {
    /// Device pixel position.
    pub position: (f32, f32),
    pub left_down: bool,
    pub middle_down: bool,
    pub right_down: bool,
    /// Cumulative scroll value as reported by the device.
    pub scroll_value: i32,
}

/// The injected raw input source.
pub trait PointerDevice {
    fn sample(&mut self) -> RawPointerState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub is_down: bool,
    /// Down last frame, up this frame. One-frame pulse.
    pub clicked: bool,
    /// Click with the previous click inside the time window. One-frame pulse.
    pub double_clicked: bool,
}

/// Derived mouse state for one frame. `Clone` produces the immutable
/// snapshot handed to consoles during routing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseState {
    /// Logical screen pixel position.
    pub position: Point,
    pub left: ButtonState,
    pub middle: ButtonState,
    pub right: ButtonState,
    pub scroll_value: i32,
    pub scroll_delta: i32,
}

impl MouseState {
    /// Reset everything to defaults. Does not touch the routing lock,
    /// which lives on the tracker.
    pub fn clear(&mut self) {
        *self = MouseState::default();
    }
}

/// Polls a `PointerDevice` once per frame and derives semantic button state.
#[derive(Debug)]
pub struct MouseTracker {
    config: MouseConfig,
    state: MouseState,
    since_left_click: Duration,
    since_middle_click: Duration,
    since_right_click: Duration,
    /// The console currently owning mouse delivery. See `routing`.
    pub(crate) lock: Option<ConsoleId>,
}

impl MouseTracker {
    pub fn new(config: MouseConfig) -> Self {
        // Start the accumulators saturated so the very first click can
        // never gate as a double-click.
        let far = Duration::from_secs(u64::MAX / 2);
        Self {
            config,
            state: MouseState::default(),
            since_left_click: far,
            since_middle_click: far,
            since_right_click: far,
            lock: None,
        }
    }

    pub fn state(&self) -> &MouseState {
        &self.state
    }

    pub fn config(&self) -> &MouseConfig {
        &self.config
    }

    /// Current lock holder, if any.
    pub fn lock_holder(&self) -> Option<ConsoleId> {
        self.lock
    }

    /// Reset button/click/scroll/position state. The lock holder is left
    /// alone; use `clear_lock` for that.
    pub fn clear_state(&mut self) {
        self.state.clear();
    }

    /// Sample the device and derive this frame's state. `elapsed` is the
    /// frame delta supplied by the caller; the tracker owns no clock.
    pub fn update(&mut self, device: &mut dyn PointerDevice, elapsed: Duration) {
        let raw = device.sample();
        let prev = self.state;

        let window = Duration::from_millis(self.config.double_click_window_ms);
        self.since_left_click = self.since_left_click.saturating_add(elapsed);
        self.since_middle_click = self.since_middle_click.saturating_add(elapsed);
        self.since_right_click = self.since_right_click.saturating_add(elapsed);

        // Device pixels → logical render surface.
        let scale = self.config.render_scale;
        let (ox, oy) = self.config.render_offset;
        self.state.position = Point::new(
            (raw.position.0 * scale - ox * scale) as i32,
            (raw.position.1 * scale - oy * scale) as i32,
        );

        // Scroll delta is previous cumulative minus new cumulative.
        self.state.scroll_delta = prev.scroll_value - raw.scroll_value;
        self.state.scroll_value = raw.scroll_value;

        self.state.left = derive_button(prev.left, raw.left_down, &mut self.since_left_click, window);
        self.state.middle =
            derive_button(prev.middle, raw.middle_down, &mut self.since_middle_click, window);
        self.state.right =
            derive_button(prev.right, raw.right_down, &mut self.since_right_click, window);
    }
}

impl Default for MouseTracker {
    fn default() -> Self {
        Self::new(MouseConfig::default())
    }
}

/// One button's transition for this frame. Resets the per-button click
/// accumulator whenever a click lands.
fn derive_button(
    prev: ButtonState,
    now_down: bool,
    since_click: &mut Duration,
    window: Duration,
) -> ButtonState {
    let clicked = prev.is_down && !now_down;
    let mut double_clicked = false;
    if clicked {
        double_clicked = *since_click < window;
        *since_click = Duration::ZERO;
    }
    ButtonState {
        is_down: now_down,
        clicked,
        double_clicked,
    }
}

//! Mouse input: per-frame state derivation and hit-test routing.

pub mod mouse;
pub mod routing;

pub use mouse::{ButtonState, MouseState, MouseTracker, PointerDevice, RawPointerState};
pub use routing::{ConsoleId, ConsoleTree, MouseConsoleState, MouseTarget};

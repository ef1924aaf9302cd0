//! Pointer and keyboard event types fed to the interaction controller.

use crate::scene::{ItemId, ItemRef};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Default window for double activation, in milliseconds.
pub const DOUBLE_ACTIVATION_MS: u64 = 320;

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Zone resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResizeHandle {
    /// Right edge, resizes width only.
    Right,
    /// Bottom edge, resizes height only.
    Bottom,
    /// Bottom-right corner, resizes both.
    Corner,
}

impl ResizeHandle {
    /// Which axes the handle drives, as `(x, y)`.
    pub fn axes(self) -> (bool, bool) {
        match self {
            ResizeHandle::Right => (true, false),
            ResizeHandle::Bottom => (false, true),
            ResizeHandle::Corner => (true, true),
        }
    }
}

/// What a pointer press landed on, as resolved by the renderer's hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty canvas.
    Canvas,
    Item(ItemRef),
    ZoneHandle(ItemId, ResizeHandle),
}

/// Pointer event in local canvas pixels (content origin, scroll applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        pointer_id: u64,
        position: Point,
        target: PointerTarget,
        modifiers: Modifiers,
        /// Milliseconds on any monotonic clock.
        timestamp_ms: u64,
    },
    Move {
        pointer_id: u64,
        position: Point,
    },
    Up {
        pointer_id: u64,
        position: Point,
    },
}

impl PointerEvent {
    pub fn pointer_id(&self) -> u64 {
        match self {
            PointerEvent::Down { pointer_id, .. }
            | PointerEvent::Move { pointer_id, .. }
            | PointerEvent::Up { pointer_id, .. } => *pointer_id,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => *position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Enter,
    Other(String),
}

impl Key {
    /// Map a DOM/winit style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "Escape" | "Esc" => Key::Escape,
            "Enter" | "Return" => Key::Enter,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Wheel event in device pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

/// Detects a second activation of the same item within a time window.
#[derive(Debug, Clone)]
pub struct ActivationTracker {
    window_ms: u64,
    last: Option<(ItemId, u64)>,
}

impl Default for ActivationTracker {
    fn default() -> Self {
        Self::new(DOUBLE_ACTIVATION_MS)
    }
}

impl ActivationTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last: None,
        }
    }

    /// Record an activation and report whether it completes a double activation.
    pub fn activate(&mut self, id: ItemId, timestamp_ms: u64) -> bool {
        let repeat = self.last.is_some_and(|(last_id, last_ms)| {
            last_id == id && timestamp_ms.saturating_sub(last_ms) <= self.window_ms
        });
        if repeat {
            // A third press starts a new sequence
            self.last = None;
            return true;
        }
        self.last = Some((id, timestamp_ms));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_double_activation_detection() {
        let id = Uuid::new_v4();
        let mut tracker = ActivationTracker::default();

        assert!(!tracker.activate(id, 1_000));
        assert!(tracker.activate(id, 1_200));
        // Third press is a fresh first activation
        assert!(!tracker.activate(id, 1_300));
        assert!(tracker.activate(id, 1_620));
    }

    #[test]
    fn test_double_activation_too_slow() {
        let id = Uuid::new_v4();
        let mut tracker = ActivationTracker::default();

        assert!(!tracker.activate(id, 0));
        assert!(!tracker.activate(id, 321));
        assert!(tracker.activate(id, 500));
    }

    #[test]
    fn test_double_activation_other_item() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut tracker = ActivationTracker::default();

        assert!(!tracker.activate(a, 0));
        assert!(!tracker.activate(b, 100));
        assert!(!tracker.activate(a, 200));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("Delete"), Key::Delete);
        assert_eq!(Key::from_name("Return"), Key::Enter);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_command_modifier() {
        assert!(!Modifiers::NONE.command());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.command());
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.command());
        assert!(!Modifiers { shift: true, ..Modifiers::NONE }.command());
    }
}

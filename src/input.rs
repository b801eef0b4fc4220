//! Input model: raw 3D pointer events and the 2D mouse events synthesized from them.
//!
//! A [`RawPointerEvent`] is what the host scene delivers: an event type, the
//! world-space hit point reported by the ray-casting service (if any), and the
//! button/modifier state. A [`MouseEvent`] carries the same state re-expressed
//! in the text engine's client coordinates, with exactly the fields the
//! engine's native mouse handlers read.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;

use glam::Vec3;
use uuid::Uuid;

use crate::geometry::Point;

/// Identity of a text engine container element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(Uuid);

impl ContainerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mouse event type, named the way the text engine names them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MouseEventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    Wheel,
    DblClick,
    Click,
    /// Any other type; forwarded through the engine's generic emit path.
    Other(String),
}

impl MouseEventKind {
    /// Parse a platform event type. `mousewheel` is folded into [`Self::Wheel`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "wheel" | "mousewheel" => Self::Wheel,
            "dblclick" => Self::DblClick,
            "click" => Self::Click,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::Wheel => "wheel",
            Self::DblClick => "dblclick",
            Self::Click => "click",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for MouseEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Mouse button that changed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Button {
    /// Left button, trigger, or single-finger tap.
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Bitmask of held buttons, in the platform's layout.
pub const BUTTONS_PRIMARY: u8 = 1;
pub const BUTTONS_SECONDARY: u8 = 2;
pub const BUTTONS_MIDDLE: u8 = 4;

/// Wheel / thumbstick scroll delta in pixels (positive `dy` scrolls down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// A pointer event as delivered by the host scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent {
    pub kind: MouseEventKind,
    /// World-space hit on the editor mesh, if the ray hit it.
    pub hit: Option<Vec3>,
    /// Container the platform delivered the event to.
    pub target: ContainerId,
    pub button: Button,
    pub buttons: u8,
    pub modifiers: Modifiers,
    pub wheel: WheelDelta,
    /// Platform timestamp in milliseconds.
    pub time_ms: f64,
}

impl RawPointerEvent {
    /// A primary-button event with no modifiers or wheel delta.
    #[must_use]
    pub fn new(kind: MouseEventKind, target: ContainerId, hit: Option<Vec3>, time_ms: f64) -> Self {
        let buttons = match kind {
            MouseEventKind::MouseDown => BUTTONS_PRIMARY,
            _ => 0,
        };
        Self {
            kind,
            hit,
            target,
            button: Button::Primary,
            buttons,
            modifiers: Modifiers::default(),
            wheel: WheelDelta::default(),
            time_ms,
        }
    }

    #[must_use]
    pub fn with_wheel(mut self, dx: f64, dy: f64) -> Self {
        self.wheel = WheelDelta { dx, dy };
        self
    }

    #[must_use]
    pub fn with_buttons(mut self, buttons: u8) -> Self {
        self.buttons = buttons;
        self
    }
}

/// A mouse event in the text engine's client coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub target: ContainerId,
    pub client_x: f64,
    pub client_y: f64,
    pub button: Button,
    pub buttons: u8,
    pub modifiers: Modifiers,
    pub wheel: WheelDelta,
    pub time_ms: f64,
}

impl MouseEvent {
    /// Re-express `raw` at `client` coordinates, keeping every other field.
    #[must_use]
    pub fn from_raw(raw: &RawPointerEvent, client: Point) -> Self {
        Self {
            kind: raw.kind.clone(),
            target: raw.target,
            client_x: client.x,
            client_y: client.y,
            button: raw.button,
            buttons: raw.buttons,
            modifiers: raw.modifiers,
            wheel: raw.wheel,
            time_ms: raw.time_ms,
        }
    }

    /// Same event with a different type (used for the synthetic double click).
    #[must_use]
    pub fn retyped(&self, kind: MouseEventKind) -> Self {
        Self { kind, ..self.clone() }
    }

    #[must_use]
    pub fn client(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

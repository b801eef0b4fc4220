//! Event synthesis and dispatch into the text engine's mouse handler.
//!
//! DESIGN
//! ======
//! Mapped events are handed to the engine the way its native listeners would:
//!
//! | Type | Route |
//! |------|-------|
//! | `mousedown` | optional synthetic `dblclick`, then the press handler, then focus |
//! | `mousemove` | move handler, always |
//! | `wheel` | wheel handler, only while the engine is focused |
//! | anything else | generic emit |
//!
//! Double clicks are detected by timestamp comparison against the previous
//! press; no timer is involved.
//!
//! ERROR HANDLING
//! ==============
//! Dispatch is best-effort. A failing engine handler is logged and the rest of
//! the sequence still runs; nothing propagates to the caller.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use tracing::{trace, warn};

use crate::consts::DOUBLE_CLICK_MS;
use crate::engine::{EngineError, MouseResponse, TextEngine};
use crate::geometry::Rect;
use crate::input::{MouseEvent, MouseEventKind};

/// Where a scrollbar drag started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarAnchor {
    /// Surface y of the press.
    pub surface_y: f64,
    /// Engine scroll position at the press.
    pub scroll_top: f64,
}

/// Per-mesh click/interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickState {
    pub last_click_ms: Option<f64>,
    pub double_click_ms: f64,
    pub scrollbar_anchor: Option<ScrollbarAnchor>,
}

impl Default for ClickState {
    fn default() -> Self {
        Self { last_click_ms: None, double_click_ms: DOUBLE_CLICK_MS, scrollbar_anchor: None }
    }
}

/// What happened while dispatching one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatched {
    /// A synthetic `dblclick` went out before the press.
    pub double_click: bool,
    /// The press handler asked for a capture session.
    pub begin_capture: bool,
    /// A captured release ended the gesture.
    pub released: bool,
}

/// Feeds mapped events into one engine and owns its click state.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    state: ClickState,
}

impl Dispatcher {
    #[must_use]
    pub fn new(double_click_ms: f64) -> Self {
        Self { state: ClickState { double_click_ms, ..ClickState::default() } }
    }

    #[must_use]
    pub fn state(&self) -> &ClickState {
        &self.state
    }

    /// Dispatch an event outside any capture session.
    pub fn dispatch(&mut self, engine: &mut dyn TextEngine, event: &MouseEvent) -> Dispatched {
        trace!(kind = %event.kind, x = event.client_x, y = event.client_y, "dispatch");
        match &event.kind {
            MouseEventKind::MouseDown => self.press(engine, event),
            MouseEventKind::MouseMove => {
                log_failure("mousemove", engine.on_mouse_move(event));
                Dispatched::default()
            }
            MouseEventKind::Wheel => {
                if engine.is_focused() {
                    log_failure("wheel", engine.on_mouse_wheel(event));
                }
                Dispatched::default()
            }
            other => {
                log_failure(other.as_str(), engine.emit(other.as_str(), event));
                Dispatched::default()
            }
        }
    }

    /// Dispatch an event delivered during this engine's own capture session.
    ///
    /// Moves go to the move handler and `mouseup` to the press handler, which
    /// ends the gesture. Everything else takes the normal route.
    pub fn dispatch_captured(&mut self, engine: &mut dyn TextEngine, event: &MouseEvent) -> Dispatched {
        match &event.kind {
            MouseEventKind::MouseMove => {
                log_failure("mousemove", engine.on_mouse_move(event));
                Dispatched::default()
            }
            MouseEventKind::MouseUp => {
                log_failure("mouseup", engine.on_mouse_event(&MouseEventKind::MouseUp, event));
                Dispatched { released: true, ..Dispatched::default() }
            }
            _ => self.dispatch(engine, event),
        }
    }

    fn press(&mut self, engine: &mut dyn TextEngine, event: &MouseEvent) -> Dispatched {
        let double_click = self.is_double_click(event.time_ms);
        if double_click {
            let dbl = event.retyped(MouseEventKind::DblClick);
            log_failure("dblclick", engine.emit(dbl.kind.as_str(), &dbl));
        }
        self.state.last_click_ms = Some(event.time_ms);

        let begin_capture = match engine.on_mouse_event(&MouseEventKind::MouseDown, event) {
            Ok(response) => response == MouseResponse::BeginCapture,
            Err(e) => {
                warn!(handler = "mousedown", error = %e, "dispatch: engine handler failed");
                false
            }
        };

        if !engine.is_focused() {
            engine.focus();
            engine.move_text_input(event.client());
        }

        Dispatched { double_click, begin_capture, released: false }
    }

    fn is_double_click(&self, now_ms: f64) -> bool {
        self.state
            .last_click_ms
            .is_some_and(|last| (0.0..=self.state.double_click_ms).contains(&(now_ms - last)))
    }

    // --- Scrollbar drags ---

    /// Start a scrollbar drag at `surface_y` from the engine's current scroll position.
    pub fn press_scrollbar(&mut self, engine: &dyn TextEngine, surface_y: f64) {
        self.state.scrollbar_anchor =
            Some(ScrollbarAnchor { surface_y, scroll_top: engine.scroll_metrics().scroll_top });
    }

    /// Scroll proportionally to the drag distance along `track`.
    ///
    /// Returns `false` when no drag is active.
    pub fn drag_scrollbar(&mut self, engine: &mut dyn TextEngine, surface_y: f64, track: Rect) -> bool {
        let Some(anchor) = self.state.scrollbar_anchor else {
            return false;
        };
        if track.height <= 0.0 {
            return true;
        }
        let metrics = engine.scroll_metrics();
        let content_per_track_px = metrics.scroll_height / track.height;
        engine.set_scroll_top(anchor.scroll_top + (surface_y - anchor.surface_y) * content_per_track_px);
        true
    }

    /// End a scrollbar drag. Returns whether one was active.
    pub fn release_scrollbar(&mut self) -> bool {
        self.state.scrollbar_anchor.take().is_some()
    }
}

fn log_failure<T>(handler: &str, result: Result<T, EngineError>) {
    if let Err(e) = result {
        warn!(handler, error = %e, "dispatch: engine handler failed");
    }
}

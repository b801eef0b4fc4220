//! Binding to the embedded text-editing engine.
//!
//! DESIGN
//! ======
//! The engine itself (highlighting, completion, undo, keybindings) is an
//! external collaborator expressed as the [`TextEngine`] trait. The mesh only
//! needs to feed it mouse events, read and write its buffer and options, and
//! subscribe to its renderer notifications.
//!
//! [`EngineAdapter`] owns one engine instance plus its capture registration:
//! the coordinate transform is handed over at construction and registered with
//! the shared [`CaptureHub`], so captured events are mapped before the engine
//! sees them without touching the engine's own capture code.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capture::{CaptureHub, EventTransform};
use crate::emitter::Emitter;
use crate::geometry::Point;
use crate::input::{ContainerId, MouseEvent, MouseEventKind};
use crate::surface::Surface;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine handler failed: {0}")]
    Handler(String),
    #[error("unknown option: {0}")]
    UnknownOption(String),
    #[error("invalid value for option {name}: {reason}")]
    InvalidOption { name: String, reason: String },
    #[error("engine creation failed: {0}")]
    Create(String),
    #[error("paint failed: {0}")]
    Paint(String),
}

// =============================================================================
// OPTIONS
// =============================================================================

/// A single engine option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Options forwarded to the engine at creation and on attribute changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Language mode, e.g. `javascript`.
    pub mode: String,
    pub theme: String,
    pub font_size: i64,
    pub tab_size: i64,
    pub read_only: bool,
    pub show_gutter: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: "javascript".into(),
            theme: "monokai".into(),
            font_size: 14,
            tab_size: 2,
            read_only: false,
            show_gutter: true,
        }
    }
}

impl EngineOptions {
    /// Option name/value pairs in the engine's naming.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, OptionValue)> {
        vec![
            ("mode", OptionValue::Str(self.mode.clone())),
            ("theme", OptionValue::Str(self.theme.clone())),
            ("fontSize", OptionValue::Int(self.font_size)),
            ("tabSize", OptionValue::Int(self.tab_size)),
            ("readOnly", OptionValue::Bool(self.read_only)),
            ("showGutter", OptionValue::Bool(self.show_gutter)),
        ]
    }

    /// Pairs whose value differs from `previous`.
    #[must_use]
    pub fn changed_since(&self, previous: &Self) -> Vec<(&'static str, OptionValue)> {
        let before = previous.to_pairs();
        self.to_pairs()
            .into_iter()
            .zip(before)
            .filter(|((_, now), (_, was))| now != was)
            .map(|(pair, _)| pair)
            .collect()
    }
}

// =============================================================================
// RENDERER NOTIFICATIONS
// =============================================================================

pub const AFTER_RENDER: &str = "afterRender";
pub const THEME_CHANGE: &str = "themeChange";
pub const RESIZE: &str = "resize";
pub const AUTOSIZE: &str = "autosize";

/// Payload of a renderer notification.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    AfterRender,
    ThemeChange { theme: String },
    Resize { width: u32, height: u32 },
    Autosize,
}

impl RendererEvent {
    /// The notification name listeners subscribe to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AfterRender => AFTER_RENDER,
            Self::ThemeChange { .. } => THEME_CHANGE,
            Self::Resize { .. } => RESIZE,
            Self::Autosize => AUTOSIZE,
        }
    }
}

/// Vertical scroll state of the engine's view, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    /// Total content height.
    pub scroll_height: f64,
    /// Visible height.
    pub viewport_height: f64,
}

impl ScrollMetrics {
    #[must_use]
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.viewport_height).max(0.0)
    }
}

/// What the press handler asks of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseResponse {
    Handled,
    /// The engine started a drag and wants every following event until release.
    BeginCapture,
}

// =============================================================================
// ENGINE TRAIT
// =============================================================================

/// Interface the embedded text engine exposes to the mesh.
pub trait TextEngine {
    fn container(&self) -> ContainerId;

    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);

    fn set_option(&mut self, name: &str, value: OptionValue) -> Result<(), EngineError>;

    /// Apply several options; stops at the first failure.
    fn set_options(&mut self, options: &[(&str, OptionValue)]) -> Result<(), EngineError> {
        for (name, value) in options {
            self.set_option(name, value.clone())?;
        }
        Ok(())
    }

    /// Resize the engine's container, in pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Press/release handler of the mouse handler object.
    fn on_mouse_event(&mut self, kind: &MouseEventKind, event: &MouseEvent) -> Result<MouseResponse, EngineError>;
    fn on_mouse_move(&mut self, event: &MouseEvent) -> Result<(), EngineError>;
    fn on_mouse_wheel(&mut self, event: &MouseEvent) -> Result<(), EngineError>;
    /// Generic event emission path.
    fn emit(&mut self, kind: &str, event: &MouseEvent) -> Result<(), EngineError>;

    fn is_focused(&self) -> bool;
    fn focus(&mut self);
    /// Reposition the hidden text-input caret.
    fn move_text_input(&mut self, at: Point);

    fn scroll_metrics(&self) -> ScrollMetrics;
    fn set_scroll_top(&mut self, scroll_top: f64);

    /// Renderer notifications: `afterRender`, `themeChange`, `resize`, `autosize`.
    fn renderer(&mut self) -> &mut Emitter<RendererEvent>;

    /// Draw the current view into `surface`.
    fn paint(&mut self, surface: &mut Surface) -> Result<(), EngineError>;

    fn destroy(&mut self);
}

/// Creates engine instances from canvas-creation parameters.
pub trait EngineFactory {
    fn create(
        &self,
        container: ContainerId,
        options: &EngineOptions,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn TextEngine>, EngineError>;
}

// =============================================================================
// ADAPTER
// =============================================================================

/// Capture registration handed to the adapter at construction.
pub struct CaptureBinding {
    pub hub: Rc<RefCell<CaptureHub>>,
    pub transform: Rc<dyn EventTransform>,
}

/// One engine instance and its capture registration.
pub struct EngineAdapter {
    engine: Box<dyn TextEngine>,
    hub: Rc<RefCell<CaptureHub>>,
}

impl EngineAdapter {
    /// Wrap an existing engine and register its coordinate transform.
    #[must_use]
    pub fn new(engine: Box<dyn TextEngine>, binding: CaptureBinding) -> Self {
        let container = engine.container();
        let registered = binding.hub.borrow_mut().register(container, binding.transform);
        debug!(%container, registered, "engine: capture transform bound");
        Self { engine, hub: binding.hub }
    }

    /// Create a fresh engine through `factory`, then bind it.
    ///
    /// # Errors
    ///
    /// Returns the factory's error when creation fails, or the first option
    /// the new engine rejects.
    pub fn create(
        factory: &dyn EngineFactory,
        container: ContainerId,
        options: &EngineOptions,
        width: u32,
        height: u32,
        binding: CaptureBinding,
    ) -> Result<Self, EngineError> {
        let mut engine = factory.create(container, options, width, height)?;
        engine.set_options(&options.to_pairs())?;
        Ok(Self::new(engine, binding))
    }

    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.engine.container()
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.engine.value()
    }

    pub fn set_value(&mut self, value: &str) {
        self.engine.set_value(value);
    }

    /// Apply options, logging (not propagating) any the engine rejects.
    pub fn apply_options(&mut self, options: &[(&str, OptionValue)]) {
        for (name, value) in options {
            if let Err(e) = self.engine.set_option(name, value.clone()) {
                warn!(option = name, error = %e, "engine: option rejected");
            }
        }
    }

    #[must_use]
    pub fn engine(&self) -> &dyn TextEngine {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> &mut dyn TextEngine {
        self.engine.as_mut()
    }

    /// Unregister the capture transform and tear the engine down.
    pub fn destroy(mut self) {
        let container = self.engine.container();
        self.hub.borrow_mut().unregister(container);
        self.engine.renderer().clear();
        self.engine.destroy();
        debug!(%container, "engine: destroyed");
    }
}

//! In-memory text engine.
//!
//! Implements [`TextEngine`] without a browser: it keeps the buffer, options,
//! focus and scroll state, paints a coarse line-bar preview into the surface,
//! and appends every handler call to a shared [`Journal`]. The demo binary and
//! the test suites drive meshes through it.

#[cfg(test)]
#[path = "headless_test.rs"]
mod headless_test;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::engine::{
    EngineError, EngineFactory, EngineOptions, MouseResponse, OptionValue, RendererEvent, ScrollMetrics, TextEngine,
};
use crate::geometry::Point;
use crate::input::{ContainerId, MouseEvent, MouseEventKind};
use crate::surface::Surface;

/// Height of one text line in client pixels.
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// Width of one character in client pixels.
pub const CHAR_WIDTH_PX: f64 = 8.0;

const KNOWN_OPTIONS: [&str; 6] = ["mode", "theme", "fontSize", "tabSize", "readOnly", "showGutter"];

/// One observed engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Mouse { kind: String, x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Wheel { dy: f64 },
    Emit { kind: String, x: f64, y: f64 },
    Focus,
    MoveTextInput { x: f64, y: f64 },
    ScrollTop(f64),
    Resize { width: u32, height: u32 },
    Paint,
    Destroy,
}

#[derive(Debug, Default)]
struct JournalInner {
    calls: Vec<(ContainerId, EngineCall)>,
    failing: HashSet<&'static str>,
}

/// Shared record of engine calls, plus switches to make handlers fail.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<JournalInner>>);

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, container: ContainerId, call: EngineCall) {
        self.0.borrow_mut().calls.push((container, call));
    }

    /// Every call, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    /// Calls made on one container's engine, in order.
    #[must_use]
    pub fn calls_for(&self, container: ContainerId) -> Vec<EngineCall> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter(|(c, _)| *c == container)
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().calls.clear();
    }

    /// Make a handler (`mouse`, `move`, `wheel`, `emit`, `paint`) return an error.
    pub fn fail(&self, handler: &'static str) {
        self.0.borrow_mut().failing.insert(handler);
    }

    fn check(&self, handler: &'static str) -> Result<(), EngineError> {
        if !self.0.borrow().failing.contains(handler) {
            return Ok(());
        }
        match handler {
            "paint" => Err(EngineError::Paint("surface unavailable".to_owned())),
            _ => Err(EngineError::Handler(format!("{handler} handler failed"))),
        }
    }
}

/// A text engine that lives entirely in memory.
pub struct HeadlessEngine {
    container: ContainerId,
    value: String,
    options: HashMap<String, OptionValue>,
    focused: bool,
    caret: Point,
    scroll_top: f64,
    width: u32,
    height: u32,
    renderer: Emitter<RendererEvent>,
    journal: Journal,
}

impl HeadlessEngine {
    #[must_use]
    pub fn new(container: ContainerId, width: u32, height: u32, journal: Journal) -> Self {
        Self {
            container,
            value: String::new(),
            options: HashMap::new(),
            focused: false,
            caret: Point::default(),
            scroll_top: 0.0,
            width,
            height,
            renderer: Emitter::new(),
            journal,
        }
    }

    #[must_use]
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn caret(&self) -> Point {
        self.caret
    }

    fn notify(&mut self, event: &RendererEvent) {
        self.renderer.emit(event.name(), event);
    }

    fn content_height(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let lines = self.value.lines().count().max(1) as f64;
        lines * LINE_HEIGHT_PX
    }

    fn background(&self) -> [u8; 4] {
        match self.options.get("theme") {
            Some(OptionValue::Str(theme)) if theme.contains("light") || theme == "github" => [250, 250, 250, 255],
            _ => [39, 40, 34, 255],
        }
    }
}

impl TextEngine for HeadlessEngine {
    fn container(&self) -> ContainerId {
        self.container
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
        self.scroll_top = self.scroll_top.min(self.scroll_metrics().max_scroll());
        self.notify(&RendererEvent::AfterRender);
    }

    fn set_option(&mut self, name: &str, value: OptionValue) -> Result<(), EngineError> {
        if !KNOWN_OPTIONS.contains(&name) {
            return Err(EngineError::UnknownOption(name.to_owned()));
        }
        check_option(name, &value)?;
        let theme_changed = name == "theme" && self.options.get(name) != Some(&value);
        self.options.insert(name.to_owned(), value.clone());
        if theme_changed && let OptionValue::Str(theme) = value {
            self.notify(&RendererEvent::ThemeChange { theme });
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.journal.record(self.container, EngineCall::Resize { width, height });
        self.notify(&RendererEvent::Resize { width, height });
    }

    fn on_mouse_event(&mut self, kind: &MouseEventKind, event: &MouseEvent) -> Result<MouseResponse, EngineError> {
        self.journal.record(
            self.container,
            EngineCall::Mouse { kind: kind.as_str().to_owned(), x: event.client_x, y: event.client_y },
        );
        self.journal.check("mouse")?;
        match kind {
            MouseEventKind::MouseDown => {
                self.caret = event.client();
                Ok(MouseResponse::BeginCapture)
            }
            _ => Ok(MouseResponse::Handled),
        }
    }

    fn on_mouse_move(&mut self, event: &MouseEvent) -> Result<(), EngineError> {
        self.journal.record(self.container, EngineCall::Move { x: event.client_x, y: event.client_y });
        self.journal.check("move")
    }

    fn on_mouse_wheel(&mut self, event: &MouseEvent) -> Result<(), EngineError> {
        self.journal.record(self.container, EngineCall::Wheel { dy: event.wheel.dy });
        self.journal.check("wheel")?;
        let top = self.scroll_top + event.wheel.dy;
        self.set_scroll_top(top);
        Ok(())
    }

    fn emit(&mut self, kind: &str, event: &MouseEvent) -> Result<(), EngineError> {
        self.journal.record(
            self.container,
            EngineCall::Emit { kind: kind.to_owned(), x: event.client_x, y: event.client_y },
        );
        self.journal.check("emit")
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
        self.journal.record(self.container, EngineCall::Focus);
    }

    fn move_text_input(&mut self, at: Point) {
        self.caret = at;
        self.journal.record(self.container, EngineCall::MoveTextInput { x: at.x, y: at.y });
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_top,
            scroll_height: self.content_height(),
            viewport_height: f64::from(self.height),
        }
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        let clamped = scroll_top.clamp(0.0, self.scroll_metrics().max_scroll());
        self.journal.record(self.container, EngineCall::ScrollTop(clamped));
        if (clamped - self.scroll_top).abs() > f64::EPSILON {
            self.scroll_top = clamped;
            self.notify(&RendererEvent::AfterRender);
        }
    }

    fn renderer(&mut self) -> &mut Emitter<RendererEvent> {
        &mut self.renderer
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn paint(&mut self, surface: &mut Surface) -> Result<(), EngineError> {
        self.journal.record(self.container, EngineCall::Paint);
        self.journal.check("paint")?;
        surface.clear(self.background());

        for (row, line) in self.value.lines().enumerate() {
            let top = row as f64 * LINE_HEIGHT_PX - self.scroll_top;
            if top + LINE_HEIGHT_PX <= 0.0 {
                continue;
            }
            if top >= f64::from(surface.height()) {
                break;
            }
            let width = (line.chars().count() as f64 * CHAR_WIDTH_PX) as u32;
            surface.fill_rect(0, top.max(0.0) as u32, width, (LINE_HEIGHT_PX - 4.0) as u32, [200, 200, 190, 255]);
        }
        Ok(())
    }

    fn destroy(&mut self) {
        self.renderer.clear();
        self.journal.record(self.container, EngineCall::Destroy);
    }
}

/// Creates [`HeadlessEngine`]s that share one journal.
#[derive(Debug, Clone, Default)]
pub struct HeadlessFactory {
    pub journal: Journal,
}

impl EngineFactory for HeadlessFactory {
    fn create(
        &self,
        container: ContainerId,
        _options: &EngineOptions,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn TextEngine>, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::Create(format!("zero-sized container {width}x{height}")));
        }
        Ok(Box::new(HeadlessEngine::new(container, width, height, self.journal.clone())))
    }
}

/// Type and range check for one known option.
fn check_option(name: &str, value: &OptionValue) -> Result<(), EngineError> {
    let reason = match (name, value) {
        ("mode" | "theme", OptionValue::Str(s)) if s.is_empty() => "must not be empty",
        ("mode" | "theme", OptionValue::Str(_))
        | ("readOnly" | "showGutter", OptionValue::Bool(_)) => return Ok(()),
        ("fontSize" | "tabSize", OptionValue::Int(n)) if *n > 0 => return Ok(()),
        ("fontSize" | "tabSize", OptionValue::Int(_)) => "must be positive",
        _ => "wrong type",
    };
    Err(EngineError::InvalidOption { name: name.to_owned(), reason: reason.to_owned() })
}

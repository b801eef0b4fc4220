//! The editor mesh: a text engine rendered onto a quad in the scene.
//!
//! DESIGN
//! ======
//! [`EditorMesh`] is the composition root. It owns the surface, the engine
//! adapter and the render bridge, keeps the live [`MeshTransform`] shared
//! with the capture hub, and routes pointer input:
//!
//! ```text
//! raw event ─▶ own capture session? ─yes─▶ mapped by the hub ─▶ captured dispatch / scrollbar drag
//!                    │ no
//!                    ▼
//!              map hit to client px ─▶ scrollbar thumb? ─yes─▶ low-level capture
//!                    │ no
//!                    ▼
//!               Dispatcher ─▶ engine (may open a mouse capture)
//! ```
//!
//! It does not extend any scene base type. The scene-facing capabilities are
//! the [`Resizable`], [`Alignable`] and [`Destroyable`] traits.
//!
//! LIFECYCLE
//! =========
//! `Uninitialized → Constructing → Active → Destroyed`. [`EditorMesh::new`]
//! validates the options into a `Constructing` mesh, then attaches the
//! surface and engine and turns `Active`. A [`ConfigError`]/[`EngineError`]
//! on the way drops the half-built mesh, so callers never see one. After [`EditorMesh::destroy`] the surface and engine are
//! released and every operation returns [`MeshError::Destroyed`].
//!
//! ERROR HANDLING
//! ==============
//! Input that misses the quad is skipped silently. Engine handler failures
//! are logged by the dispatcher. Construction failures, rejected sizes,
//! auto-alignment without a task set and use after destroy are reported as
//! errors; none of them panic.

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use serde::Serialize;
use tokio::task::LocalSet;
use tracing::{debug, info, trace};

use crate::align::{self, AlignDirection, Alignable, AutoAlignTask, ViewerHandle};
use crate::capture::{CaptureHub, CaptureKind, Routed};
use crate::config::EditorConfig;
use crate::consts::DEFAULT_SURFACE_PX;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::emitter::{Emitter, ListenerError, ListenerId};
use crate::engine::{CaptureBinding, EngineAdapter, EngineError, EngineFactory, EngineOptions, OptionValue, TextEngine};
use crate::geometry::{QuadGeometry, SceneNode, intersect_quad};
use crate::input::{ContainerId, MouseEvent, MouseEventKind, RawPointerEvent};
use crate::mapper::{MeshTransform, SurfaceMapper};
use crate::render_sync::RenderSync;
use crate::surface::{SizeError, Surface};
use crate::viewer::Viewer;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no input binding: supply an event source or a viewer")]
    MissingInput,
    #[error("no text engine: supply an existing engine or a factory")]
    MissingEngine,
    #[error("pixels_per_unit must be positive, got {0}")]
    InvalidDensity(f32),
    #[error("pointer ray-casting needs a viewer binding")]
    NoViewer,
    #[error(transparent)]
    InvalidSize(#[from] SizeError),
    #[error("auto-alignment needs a local task set")]
    NoTaskSet,
}

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("editor mesh used after destroy")]
    Destroyed,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Where the mesh's text engine comes from.
pub enum EngineSource {
    /// An engine the host already created.
    Existing(Box<dyn TextEngine>),
    /// Create one through `factory`.
    Create { factory: Rc<dyn EngineFactory>, options: EngineOptions },
}

/// How pointer input reaches the mesh.
#[derive(Debug, Clone)]
pub enum InputBinding {
    /// The host ray-casts and delivers [`RawPointerEvent`]s with hits.
    EventSource,
    /// The mesh ray-casts pointer positions against this viewer.
    Viewer(ViewerHandle),
}

/// Construction parameters.
pub struct MeshOptions {
    pub engine: Option<EngineSource>,
    pub input: Option<InputBinding>,
    pub width: u32,
    pub height: u32,
    /// Surface pixels above the engine's client origin.
    pub layer_offset_y: f64,
    pub node: SceneNode,
    pub config: EditorConfig,
    pub hub: Rc<RefCell<CaptureHub>>,
    /// Where auto-alignment polls run. Tasks queue here until the host drives it.
    pub tasks: Option<Rc<LocalSet>>,
}

impl MeshOptions {
    /// Default-sized options bound to `hub`, with no engine or input yet.
    #[must_use]
    pub fn new(hub: Rc<RefCell<CaptureHub>>) -> Self {
        Self {
            engine: None,
            input: None,
            width: DEFAULT_SURFACE_PX,
            height: DEFAULT_SURFACE_PX,
            layer_offset_y: 0.0,
            node: SceneNode::default(),
            config: EditorConfig::default(),
            hub,
            tasks: None,
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: EngineSource) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: InputBinding) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_layer_offset(mut self, layer_offset_y: f64) -> Self {
        self.layer_offset_y = layer_offset_y;
        self
    }

    #[must_use]
    pub fn with_node(mut self, node: SceneNode) -> Self {
        self.node = node;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_tasks(mut self, tasks: Rc<LocalSet>) -> Self {
        self.tasks = Some(tasks);
        self
    }
}

// =============================================================================
// EVENTS AND STATE
// =============================================================================

pub const RESIZE_EVENT: &str = "resize";
pub const SAVE_EVENT: &str = "save";

/// Notifications the mesh emits to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MeshEvent {
    Resize { width: u32, height: u32 },
    Save { value: String },
}

impl MeshEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => RESIZE_EVENT,
            Self::Save { .. } => SAVE_EVENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Constructing,
    Active,
    Destroyed,
}

/// What became of one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Not for this mesh, or no usable hit.
    Skipped,
    /// Delivered to the text engine.
    Engine(Dispatched),
    /// Consumed by the scrollbar overlay.
    Scrollbar,
}

/// Resources released on destroy.
struct Attached {
    surface: Surface,
    adapter: EngineAdapter,
    sync: RenderSync,
}

// =============================================================================
// MESH
// =============================================================================

pub struct EditorMesh {
    lifecycle: Lifecycle,
    container: ContainerId,
    attached: Option<Attached>,
    transform: Rc<MeshTransform>,
    hub: Rc<RefCell<CaptureHub>>,
    dispatcher: Dispatcher,
    input: InputBinding,
    config: EditorConfig,
    events: Emitter<MeshEvent>,
    auto_align: Option<AutoAlignTask>,
    tasks: Option<Rc<LocalSet>>,
    resized: bool,
}

impl std::fmt::Debug for EditorMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorMesh")
            .field("lifecycle", &self.lifecycle)
            .field("container", &self.container)
            .field("mapper", &self.transform.snapshot())
            .field("auto_align", &self.auto_align.is_some())
            .finish_non_exhaustive()
    }
}

impl EditorMesh {
    /// Validate `options`, bind the engine and become active.
    ///
    /// # Errors
    ///
    /// [`MeshError::Config`] when the input binding or engine source is
    /// missing, the pixel density is not positive or the size is too large;
    /// [`MeshError::Engine`] when the factory fails or rejects the initial
    /// options.
    pub fn new(options: MeshOptions) -> Result<Self, MeshError> {
        let (mut mesh, source) = Self::prepare(options)?;
        mesh.attach(source)?;
        Ok(mesh)
    }

    /// Check `options` and build the mesh shell in the `Constructing` state.
    fn prepare(options: MeshOptions) -> Result<(Self, EngineSource), MeshError> {
        let input = options.input.ok_or(ConfigError::MissingInput)?;
        let source = options.engine.ok_or(ConfigError::MissingEngine)?;
        let ppu = options.config.pixels_per_unit;
        if ppu <= 0.0 || !ppu.is_finite() {
            return Err(ConfigError::InvalidDensity(ppu).into());
        }

        let (width, height) = (options.width, options.height);
        let quad = QuadGeometry::from_pixels(width, height, ppu);
        let mapper = SurfaceMapper::new(options.node, quad, width, height, options.layer_offset_y);
        let mesh = Self {
            lifecycle: Lifecycle::Constructing,
            container: ContainerId::new(),
            attached: None,
            transform: Rc::new(MeshTransform::new(mapper)),
            hub: options.hub,
            dispatcher: Dispatcher::new(options.config.double_click_ms),
            input,
            config: options.config,
            events: Emitter::new(),
            auto_align: None,
            tasks: options.tasks,
            resized: false,
        };
        trace!(state = ?mesh.lifecycle, width, height, "mesh: constructing");
        Ok((mesh, source))
    }

    /// Allocate the surface, bind the engine and turn `Active`.
    fn attach(&mut self, source: EngineSource) -> Result<(), MeshError> {
        let mapper = self.transform.snapshot();
        let (width, height) = (mapper.width_px, mapper.height_px);
        let surface = Surface::new(width, height).map_err(ConfigError::from)?;

        let shared = Rc::clone(&self.transform);
        let binding = CaptureBinding { hub: Rc::clone(&self.hub), transform: shared };
        let mut adapter = match source {
            EngineSource::Existing(mut engine) => {
                engine.resize(width, height);
                EngineAdapter::new(engine, binding)
            }
            EngineSource::Create { factory, options: engine_options } => {
                EngineAdapter::create(factory.as_ref(), self.container, &engine_options, width, height, binding)?
            }
        };
        self.container = adapter.container();
        let sync = RenderSync::attach(adapter.engine_mut());

        self.attached = Some(Attached { surface, adapter, sync });
        self.lifecycle = Lifecycle::Active;
        info!(container = %self.container, width, height, layer_offset_y = mapper.layer_offset_y, "mesh: active");
        Ok(())
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Click and scrollbar-drag state of this mesh.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Current geometry snapshot.
    #[must_use]
    pub fn mapper(&self) -> SurfaceMapper {
        self.transform.snapshot()
    }

    fn attached(&self) -> Result<&Attached, MeshError> {
        self.attached.as_ref().ok_or(MeshError::Destroyed)
    }

    fn attached_mut(&mut self) -> Result<&mut Attached, MeshError> {
        self.attached.as_mut().ok_or(MeshError::Destroyed)
    }

    // --- Notifications ---

    /// Subscribe to `resize` or `save`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn on<F>(&mut self, event: &str, callback: F) -> Result<ListenerId, MeshError>
    where
        F: FnMut(&MeshEvent) -> Result<(), ListenerError> + 'static,
    {
        self.attached()?;
        Ok(self.events.on(event, callback))
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    fn notify(&mut self, event: &MeshEvent) {
        let delivered = self.events.emit(event.name(), event);
        trace!(event = event.name(), delivered, "mesh: notified");
    }

    // --- Geometry ---

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn size(&self) -> Result<(u32, u32), MeshError> {
        let surface = &self.attached()?.surface;
        Ok((surface.width(), surface.height()))
    }

    /// Resize surface, engine and quad together, then emit `resize`.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy; [`ConfigError::InvalidSize`]
    /// when the surface cannot hold the size, leaving the mesh unchanged.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), MeshError> {
        let ppu = self.config.pixels_per_unit;
        let attached = self.attached_mut()?;
        attached.surface.resize(width, height).map_err(ConfigError::from)?;
        attached.adapter.engine_mut().resize(width, height);
        attached.sync.invalidate_overlay();
        attached.sync.request_repaint();

        let quad = QuadGeometry::from_pixels(width, height, ppu);
        self.transform.update(|m| {
            m.quad = quad;
            m.width_px = width;
            m.height_px = height;
        });
        self.resized = true;
        debug!(container = %self.container, width, height, "mesh: resized");
        self.notify(&MeshEvent::Resize { width, height });
        Ok(())
    }

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn set_layer_offset(&mut self, layer_offset_y: f64) -> Result<(), MeshError> {
        self.attached()?.sync.invalidate_overlay();
        self.transform.update(|m| m.layer_offset_y = layer_offset_y);
        Ok(())
    }

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn node(&self) -> Result<SceneNode, MeshError> {
        self.attached()?;
        Ok(self.transform.snapshot().node)
    }

    /// Move the mesh in the scene.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn set_node(&mut self, node: SceneNode) -> Result<(), MeshError> {
        self.attached()?;
        self.transform.update(|m| m.node = node);
        Ok(())
    }

    /// Nearest hit of a world-space ray on the quad.
    #[must_use]
    pub fn intersect_ray(&self, origin: Vec3, dir: Vec3) -> Option<Vec3> {
        self.attached.as_ref()?;
        let mapper = self.transform.snapshot();
        intersect_quad(origin, dir, &mapper.node, &mapper.quad)
    }

    // --- Buffer and options ---

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn get_value(&self) -> Result<String, MeshError> {
        Ok(self.attached()?.adapter.value())
    }

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn set_value(&mut self, value: &str) -> Result<(), MeshError> {
        self.attached_mut()?.adapter.set_value(value);
        Ok(())
    }

    /// Forward options to the engine; rejected ones are logged and skipped.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn set_options(&mut self, options: &[(&str, OptionValue)]) -> Result<(), MeshError> {
        self.attached_mut()?.adapter.apply_options(options);
        Ok(())
    }

    /// Emit `save` with the current buffer and return it.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn save(&mut self) -> Result<String, MeshError> {
        let value = self.get_value()?;
        info!(container = %self.container, bytes = value.len(), "mesh: save");
        self.notify(&MeshEvent::Save { value: value.clone() });
        Ok(value)
    }

    /// Direct access to the engine for host integrations.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn engine_mut(&mut self) -> Result<&mut dyn TextEngine, MeshError> {
        Ok(self.attached_mut()?.adapter.engine_mut())
    }

    // --- Rendering ---

    /// Per-frame hook: repaint the surface if the engine rendered since last frame.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn frame(&mut self) -> Result<bool, MeshError> {
        let Attached { surface, adapter, sync } = self.attached_mut()?;
        Ok(sync.on_frame(adapter.engine_mut(), surface))
    }

    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn surface(&self) -> Result<&Surface, MeshError> {
        Ok(&self.attached()?.surface)
    }

    /// Whether the texture needs a re-upload; clears the flag.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn take_texture_dirty(&mut self) -> Result<bool, MeshError> {
        Ok(self.attached_mut()?.surface.take_dirty())
    }

    // --- Input ---

    /// Route one host pointer event.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn handle_raw(&mut self, raw: &RawPointerEvent) -> Result<InputOutcome, MeshError> {
        self.attached()?;
        if raw.target != self.container {
            return Ok(InputOutcome::Skipped);
        }
        let routed = self.hub.borrow().route(raw);
        match routed {
            Routed::Mapped { session, event } => self.handle_captured(session.kind, &event),
            Routed::Dropped { .. } => {
                if raw.kind == MouseEventKind::MouseUp {
                    self.dispatcher.release_scrollbar();
                    self.hub.borrow_mut().release_capture(self.container);
                }
                trace!(container = %self.container, kind = %raw.kind, "mesh: captured event off quad");
                Ok(InputOutcome::Skipped)
            }
            Routed::NotCaptured | Routed::Passthrough { .. } => self.handle_direct(raw),
        }
    }

    /// Ray-cast a pointer at normalized device coordinates, then route it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoViewer`] without a viewer binding;
    /// [`MeshError::Destroyed`] after destroy.
    pub fn handle_pointer(
        &mut self,
        kind: MouseEventKind,
        x_ndc: f32,
        y_ndc: f32,
        time_ms: f64,
    ) -> Result<InputOutcome, MeshError> {
        self.attached()?;
        let InputBinding::Viewer(viewer) = &self.input else {
            return Err(ConfigError::NoViewer.into());
        };
        let (origin, dir) = viewer.get().ray_from_ndc(x_ndc, y_ndc);
        let hit = self.intersect_ray(origin, dir);
        self.handle_raw(&RawPointerEvent::new(kind, self.container, hit, time_ms))
    }

    fn handle_direct(&mut self, raw: &RawPointerEvent) -> Result<InputOutcome, MeshError> {
        let mapper = self.transform.snapshot();
        let Some(event) = mapper.map_event(raw) else {
            trace!(container = %self.container, kind = %raw.kind, "mesh: no hit");
            return Ok(InputOutcome::Skipped);
        };
        let Some(Attached { adapter, sync, .. }) = self.attached.as_mut() else {
            return Err(MeshError::Destroyed);
        };

        if raw.kind == MouseEventKind::MouseDown
            && let Some(hit) = raw.hit
            && let Some(thumb) =
                sync.scrollbar_thumb(adapter.engine(), mapper.width_px, mapper.height_px, mapper.layer_offset_y)
            && mapper.hits_overlay(hit, thumb)
        {
            let surface_y = mapper.client_to_surface(event.client()).y;
            self.dispatcher.press_scrollbar(adapter.engine(), surface_y);
            self.hub.borrow_mut().install_capture(self.container);
            return Ok(InputOutcome::Scrollbar);
        }

        let dispatched = self.dispatcher.dispatch(adapter.engine_mut(), &event);
        if dispatched.begin_capture {
            self.hub.borrow_mut().begin_mouse_capture(self.container);
        }
        Ok(InputOutcome::Engine(dispatched))
    }

    fn handle_captured(&mut self, kind: CaptureKind, event: &MouseEvent) -> Result<InputOutcome, MeshError> {
        let mapper = self.transform.snapshot();
        let Some(Attached { adapter, sync, .. }) = self.attached.as_mut() else {
            return Err(MeshError::Destroyed);
        };
        match kind {
            CaptureKind::Mouse => {
                let dispatched = self.dispatcher.dispatch_captured(adapter.engine_mut(), event);
                if dispatched.released {
                    self.hub.borrow_mut().release_capture(self.container);
                }
                Ok(InputOutcome::Engine(dispatched))
            }
            CaptureKind::Raw => {
                match event.kind {
                    MouseEventKind::MouseMove => {
                        if let Some(track) = sync.scrollbar_track(mapper.width_px, mapper.height_px, mapper.layer_offset_y)
                        {
                            let surface_y = mapper.client_to_surface(event.client()).y;
                            self.dispatcher.drag_scrollbar(adapter.engine_mut(), surface_y, track);
                        }
                    }
                    MouseEventKind::MouseUp => {
                        self.dispatcher.release_scrollbar();
                        self.hub.borrow_mut().release_capture(self.container);
                    }
                    _ => {}
                }
                Ok(InputOutcome::Scrollbar)
            }
        }
    }

    // --- Alignment ---

    /// One-shot alignment with `viewer`. Returns the lateral steps taken.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy.
    pub fn align_with_camera(&mut self, direction: AlignDirection, viewer: &Viewer) -> Result<usize, MeshError> {
        self.attached()?;
        let mapper = self.transform.snapshot();
        let mut node = mapper.node;
        let steps = align::align_with_camera(&mut node, &mapper.quad, viewer, direction, &self.config);
        self.transform.update(|m| m.node = node);
        debug!(container = %self.container, ?direction, steps, "mesh: aligned");
        Ok(steps)
    }

    /// Start (or restart) auto-alignment against `viewer`.
    ///
    /// Any running poll is stopped first. The poll is queued on the mesh's
    /// task set and runs while the host drives that set.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] after destroy; [`ConfigError::NoTaskSet`]
    /// when the mesh was built without [`MeshOptions::with_tasks`].
    pub fn auto_align_with_camera(
        this: &Rc<RefCell<Self>>,
        direction: AlignDirection,
        viewer: ViewerHandle,
    ) -> Result<(), MeshError> {
        let mut mesh = this.borrow_mut();
        mesh.attached()?;
        let Some(tasks) = mesh.tasks.clone() else {
            return Err(ConfigError::NoTaskSet.into());
        };
        mesh.stop_auto_align();
        let task = AutoAlignTask::spawn(&tasks, Rc::downgrade(this), viewer, direction, &mesh.config);
        mesh.auto_align = Some(task);
        Ok(())
    }

    /// Stop auto-alignment. Returns whether a poll was running.
    pub fn stop_auto_align(&mut self) -> bool {
        match self.auto_align.take() {
            Some(task) => {
                task.stop();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_auto_aligning(&self) -> bool {
        self.auto_align.as_ref().is_some_and(AutoAlignTask::is_running)
    }

    // --- Lifecycle ---

    /// Release the surface and engine and detach every listener.
    ///
    /// # Errors
    ///
    /// [`MeshError::Destroyed`] when already destroyed.
    pub fn destroy(&mut self) -> Result<(), MeshError> {
        self.attached()?;
        self.teardown();
        Ok(())
    }

    fn teardown(&mut self) {
        self.stop_auto_align();
        if let Some(Attached { mut surface, mut adapter, mut sync }) = self.attached.take() {
            sync.detach(adapter.engine_mut());
            surface.release();
            adapter.destroy();
        }
        self.dispatcher.release_scrollbar();
        self.events.clear();
        self.lifecycle = Lifecycle::Destroyed;
        info!(container = %self.container, "mesh: destroyed");
    }
}

impl Drop for EditorMesh {
    fn drop(&mut self) {
        if self.attached.is_some() {
            self.teardown();
        }
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

pub trait Resizable {
    /// # Errors
    ///
    /// Returns an error when the object can no longer be resized.
    fn set_size(&mut self, width: u32, height: u32) -> Result<(), MeshError>;
}

pub trait Destroyable {
    /// # Errors
    ///
    /// Returns an error when the object was already destroyed.
    fn destroy(&mut self) -> Result<(), MeshError>;
    fn is_destroyed(&self) -> bool;
}

impl Resizable for EditorMesh {
    fn set_size(&mut self, width: u32, height: u32) -> Result<(), MeshError> {
        EditorMesh::set_size(self, width, height)
    }
}

impl Destroyable for EditorMesh {
    fn destroy(&mut self) -> Result<(), MeshError> {
        EditorMesh::destroy(self)
    }

    fn is_destroyed(&self) -> bool {
        self.lifecycle == Lifecycle::Destroyed
    }
}

impl Alignable for EditorMesh {
    type Error = MeshError;

    fn position(&self) -> Result<Vec3, MeshError> {
        Ok(self.node()?.position)
    }

    fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    fn align_with_camera(&mut self, direction: AlignDirection, viewer: &Viewer) -> Result<usize, MeshError> {
        EditorMesh::align_with_camera(self, direction, viewer)
    }
}

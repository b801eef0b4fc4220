//! Host-component glue: typed attributes in, editor mesh out.
//!
//! DESIGN
//! ======
//! The host scene declares the editor as a component with a flat attribute
//! map and calls `init` once and `update` on every attribute change.
//! [`EditorComponent`] deserializes the map into [`EditorAttributes`], diffs
//! it against the last applied set, and forwards only what changed to the
//! mesh. Repeated `update` calls with the same attributes do nothing.
//!
//! A `value` attribute seeds the buffer. Later user edits are kept until the
//! attribute itself changes.
//!
//! `auto_align` needs the host's task set ([`EditorComponent::with_tasks`]).
//! Without one the attribute is reported as an error, never a panic.

#[cfg(test)]
#[path = "component_test.rs"]
mod component_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tokio::task::LocalSet;
use tracing::{debug, info};

use crate::align::{AlignDirection, ViewerHandle};
use crate::capture::CaptureHub;
use crate::config::EditorConfig;
use crate::consts::DEFAULT_SURFACE_PX;
use crate::engine::{EngineFactory, EngineOptions};
use crate::geometry::SceneNode;
use crate::mesh::{EditorMesh, EngineSource, InputBinding, Lifecycle, MeshError, MeshOptions};

#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error("invalid editor attributes: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Attribute schema of the editor component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorAttributes {
    pub width: u32,
    pub height: u32,
    /// Initial buffer contents.
    pub value: String,
    pub mode: String,
    pub theme: String,
    pub font_size: i64,
    pub tab_size: i64,
    pub read_only: bool,
    pub show_gutter: bool,
    pub layer_offset: f64,
    pub auto_align: bool,
    pub align: AlignDirection,
}

impl Default for EditorAttributes {
    fn default() -> Self {
        let engine = EngineOptions::default();
        Self {
            width: DEFAULT_SURFACE_PX,
            height: DEFAULT_SURFACE_PX,
            value: String::new(),
            mode: engine.mode,
            theme: engine.theme,
            font_size: engine.font_size,
            tab_size: engine.tab_size,
            read_only: engine.read_only,
            show_gutter: engine.show_gutter,
            layer_offset: 0.0,
            auto_align: false,
            align: AlignDirection::Center,
        }
    }
}

impl EditorAttributes {
    /// Parse a host attribute map. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Invalid`] when a present key has the wrong type.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, AttributeError> {
        Ok(Self::deserialize(value)?)
    }

    #[must_use]
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            mode: self.mode.clone(),
            theme: self.theme.clone(),
            font_size: self.font_size,
            tab_size: self.tab_size,
            read_only: self.read_only,
            show_gutter: self.show_gutter,
        }
    }
}

/// One editor component instance in the host scene.
pub struct EditorComponent {
    hub: Rc<RefCell<CaptureHub>>,
    factory: Rc<dyn EngineFactory>,
    viewer: ViewerHandle,
    config: EditorConfig,
    node: SceneNode,
    tasks: Option<Rc<LocalSet>>,
    applied: Option<EditorAttributes>,
    mesh: Option<Rc<RefCell<EditorMesh>>>,
}

impl std::fmt::Debug for EditorComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorComponent")
            .field("applied", &self.applied)
            .field("mesh", &self.mesh)
            .finish_non_exhaustive()
    }
}

impl EditorComponent {
    #[must_use]
    pub fn new(
        hub: Rc<RefCell<CaptureHub>>,
        factory: Rc<dyn EngineFactory>,
        viewer: ViewerHandle,
        config: EditorConfig,
    ) -> Self {
        Self { hub, factory, viewer, config, node: SceneNode::default(), tasks: None, applied: None, mesh: None }
    }

    /// Initial placement used when the mesh is built.
    #[must_use]
    pub fn with_node(mut self, node: SceneNode) -> Self {
        self.node = node;
        self
    }

    /// Task set that runs auto-alignment polls.
    #[must_use]
    pub fn with_tasks(mut self, tasks: Rc<LocalSet>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.mesh.as_ref().map_or(Lifecycle::Uninitialized, |m| m.borrow().lifecycle())
    }

    #[must_use]
    pub fn mesh(&self) -> Option<Rc<RefCell<EditorMesh>>> {
        self.mesh.clone()
    }

    #[must_use]
    pub fn attributes(&self) -> Option<&EditorAttributes> {
        self.applied.as_ref()
    }

    /// Build the mesh from `attributes`. On an initialized component this is
    /// the same as [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// [`AttributeError::Invalid`] for a malformed attribute map;
    /// [`AttributeError::Mesh`] when the mesh cannot be built.
    pub fn init(&mut self, attributes: &serde_json::Value) -> Result<(), AttributeError> {
        let attrs = EditorAttributes::from_value(attributes)?;
        if self.mesh.is_some() {
            self.apply(attrs)?;
            return Ok(());
        }
        self.build(attrs)
    }

    fn build(&mut self, attrs: EditorAttributes) -> Result<(), AttributeError> {
        let mut options = MeshOptions::new(Rc::clone(&self.hub))
            .with_engine(EngineSource::Create { factory: Rc::clone(&self.factory), options: attrs.engine_options() })
            .with_input(InputBinding::Viewer(Rc::clone(&self.viewer)))
            .with_size(attrs.width, attrs.height)
            .with_layer_offset(attrs.layer_offset)
            .with_node(self.node)
            .with_config(self.config);
        if let Some(tasks) = &self.tasks {
            options = options.with_tasks(Rc::clone(tasks));
        }
        let mesh = Rc::new(RefCell::new(EditorMesh::new(options)?));
        mesh.borrow_mut().set_value(&attrs.value)?;
        if attrs.auto_align {
            EditorMesh::auto_align_with_camera(&mesh, attrs.align, Rc::clone(&self.viewer))?;
        }

        info!(container = %mesh.borrow().container(), width = attrs.width, height = attrs.height, "component: init");
        self.mesh = Some(mesh);
        self.applied = Some(attrs);
        Ok(())
    }

    /// Apply changed attributes. Returns whether anything changed.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Invalid`] for a malformed attribute map;
    /// [`AttributeError::Mesh`] when the mesh was destroyed, cannot be built
    /// or rejects a value.
    pub fn update(&mut self, attributes: &serde_json::Value) -> Result<bool, AttributeError> {
        let attrs = EditorAttributes::from_value(attributes)?;
        if self.mesh.is_none() {
            self.build(attrs)?;
            return Ok(true);
        }
        self.apply(attrs)
    }

    fn apply(&mut self, attrs: EditorAttributes) -> Result<bool, AttributeError> {
        let Some(mesh) = self.mesh.clone() else {
            return Ok(false);
        };
        if mesh.borrow().lifecycle() == Lifecycle::Destroyed {
            return Err(MeshError::Destroyed.into());
        }
        let previous = self.applied.clone().unwrap_or_default();
        if previous == attrs {
            return Ok(false);
        }

        {
            let mut m = mesh.borrow_mut();
            if (attrs.width, attrs.height) != (previous.width, previous.height) {
                m.set_size(attrs.width, attrs.height)?;
            }
            let changed = attrs.engine_options().changed_since(&previous.engine_options());
            if !changed.is_empty() {
                m.set_options(&changed)?;
            }
            if attrs.value != previous.value {
                m.set_value(&attrs.value)?;
            }
            if (attrs.layer_offset - previous.layer_offset).abs() > f64::EPSILON {
                m.set_layer_offset(attrs.layer_offset)?;
            }
        }

        let align_changed = attrs.auto_align != previous.auto_align || attrs.align != previous.align;
        if align_changed {
            if attrs.auto_align {
                EditorMesh::auto_align_with_camera(&mesh, attrs.align, Rc::clone(&self.viewer))?;
            } else {
                mesh.borrow_mut().stop_auto_align();
            }
        }

        debug!(container = %mesh.borrow().container(), "component: updated");
        self.applied = Some(attrs);
        Ok(true)
    }

    /// Destroy the mesh. The component stays in the `Destroyed` state.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Mesh`] when the mesh was already destroyed.
    pub fn remove(&mut self) -> Result<(), AttributeError> {
        if let Some(mesh) = &self.mesh {
            mesh.borrow_mut().destroy()?;
        }
        Ok(())
    }
}

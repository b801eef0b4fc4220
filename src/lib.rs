//! Code editor rendered as a textured quad in a 3D scene.
//!
//! A text engine paints into an off-scene [`surface::Surface`] whose pixels
//! become the texture of a quad. Pointer rays that hit the quad are mapped
//! back into the engine's 2D client coordinates and dispatched as if they
//! were native mouse events, including the drags the engine captures.
//! Engine repaints flow the other way into the surface once per frame.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`mesh`] | Composition root: [`mesh::EditorMesh`] and its lifecycle |
//! | [`component`] | Host-component attribute schema and `init`/`update` glue |
//! | [`mapper`] | World hit to surface pixels to engine client coordinates |
//! | [`dispatch`] | Event synthesis, double clicks, focus, scrollbar drags |
//! | [`capture`] | Shared capture hub that maps events during drags |
//! | [`render_sync`] | Repaint coalescing and the cached scrollbar overlay |
//! | [`align`] | One-shot and debounced automatic viewer alignment |
//! | [`engine`] | Text engine trait, options, and the capture-bound adapter |
//! | [`headless`] | In-memory text engine for the demo and tests |
//! | [`emitter`] | Named publish/subscribe notifications |
//! | [`surface`] | RGBA pixel buffer with a dirty flag |
//! | [`input`] | Raw 3D pointer events and synthesized mouse events |
//! | [`geometry`] | Points, rects, quad geometry, scene transforms, ray casts |
//! | [`viewer`] | Perspective viewer, frustum tests, pointer rays |
//! | [`config`] | Environment-driven tunables |
//! | [`consts`] | Shared numeric constants (thresholds, intervals, sizes) |

pub mod align;
pub mod capture;
pub mod component;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod emitter;
pub mod engine;
pub mod geometry;
pub mod headless;
pub mod input;
pub mod mapper;
pub mod mesh;
pub mod render_sync;
pub mod surface;
pub mod viewer;

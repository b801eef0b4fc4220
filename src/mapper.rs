//! Ray-to-surface coordinate mapping.
//!
//! A world-space hit point on the mesh is taken into the quad's local frame
//! through the inverse world matrix, then scaled into surface pixels (origin
//! top-left, +Y down). Engine client coordinates are surface pixels shifted up
//! by the layer offset (the band above the text layer, e.g. a title strip).
//!
//! Every mapping that can fail returns `None`: points outside the quad and
//! degenerate geometry are "no event", never an error.

#[cfg(test)]
#[path = "mapper_test.rs"]
mod mapper_test;

use std::cell::RefCell;

use glam::{Mat4, Vec3};

use crate::capture::EventTransform;
use crate::geometry::{Point, QuadGeometry, Rect, SceneNode};
use crate::input::{MouseEvent, RawPointerEvent};

/// A rectangle in the quad's local frame (`min` is bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalRect {
    pub min: Vec3,
    pub max: Vec3,
}

impl LocalRect {
    #[must_use]
    pub fn contains(&self, local: Vec3) -> bool {
        local.x >= self.min.x && local.x < self.max.x && local.y > self.min.y && local.y <= self.max.y
    }
}

/// Geometry snapshot needed to map between world, local, surface and client space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapper {
    pub node: SceneNode,
    pub quad: QuadGeometry,
    pub width_px: u32,
    pub height_px: u32,
    /// Surface pixels between the top of the surface and the engine's client origin.
    pub layer_offset_y: f64,
}

impl SurfaceMapper {
    #[must_use]
    pub fn new(node: SceneNode, quad: QuadGeometry, width_px: u32, height_px: u32, layer_offset_y: f64) -> Self {
        Self { node, quad, width_px, height_px, layer_offset_y }
    }

    fn is_degenerate(&self) -> bool {
        self.quad.is_degenerate() || self.width_px == 0 || self.height_px == 0
    }

    fn inverse_world(&self) -> Option<Mat4> {
        let world = self.node.world_matrix();
        if world.determinant().abs() <= f32::EPSILON {
            return None;
        }
        Some(world.inverse())
    }

    #[must_use]
    pub fn world_to_local(&self, world: Vec3) -> Option<Vec3> {
        Some(self.inverse_world()?.transform_point3(world))
    }

    /// Local point to surface pixels; `None` outside the quad.
    #[must_use]
    pub fn local_to_surface(&self, local: Vec3) -> Option<Point> {
        if self.is_degenerate() || !self.quad.contains_local(local) {
            return None;
        }
        let u = f64::from((local.x + self.quad.width * 0.5) / self.quad.width);
        let v = f64::from((self.quad.height * 0.5 - local.y) / self.quad.height);
        Some(Point::new(u * f64::from(self.width_px), v * f64::from(self.height_px)))
    }

    /// World hit point to surface pixels; `None` outside the quad.
    #[must_use]
    pub fn world_to_surface(&self, world: Vec3) -> Option<Point> {
        self.local_to_surface(self.world_to_local(world)?)
    }

    /// Surface pixels back into the quad's local frame.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn surface_to_local(&self, p: Point) -> Option<Vec3> {
        if self.is_degenerate() {
            return None;
        }
        let u = (p.x / f64::from(self.width_px)) as f32;
        let v = (p.y / f64::from(self.height_px)) as f32;
        Some(Vec3::new(
            u * self.quad.width - self.quad.width * 0.5,
            self.quad.height * 0.5 - v * self.quad.height,
            0.0,
        ))
    }

    /// Surface rectangle expressed in the quad's local frame.
    #[must_use]
    pub fn surface_rect_to_local(&self, r: Rect) -> Option<LocalRect> {
        let top_left = self.surface_to_local(Point::new(r.x, r.y))?;
        let bottom_right = self.surface_to_local(Point::new(r.x + r.width, r.y + r.height))?;
        Some(LocalRect {
            min: Vec3::new(top_left.x, bottom_right.y, 0.0),
            max: Vec3::new(bottom_right.x, top_left.y, 0.0),
        })
    }

    /// Whether a world hit lands on an overlay given in surface pixels.
    #[must_use]
    pub fn hits_overlay(&self, world: Vec3, overlay: Rect) -> bool {
        match (self.world_to_local(world), self.surface_rect_to_local(overlay)) {
            (Some(local), Some(rect)) => rect.contains(local),
            _ => false,
        }
    }

    #[must_use]
    pub fn surface_to_client(&self, p: Point) -> Point {
        Point::new(p.x, p.y - self.layer_offset_y)
    }

    #[must_use]
    pub fn client_to_surface(&self, p: Point) -> Point {
        Point::new(p.x, p.y + self.layer_offset_y)
    }

    /// Raw event to client-space mouse event; `None` without a usable hit.
    #[must_use]
    pub fn map_event(&self, raw: &RawPointerEvent) -> Option<MouseEvent> {
        let surface = self.world_to_surface(raw.hit?)?;
        Some(MouseEvent::from_raw(raw, self.surface_to_client(surface)))
    }
}

/// Live mapper shared between a mesh and the capture hub.
#[derive(Debug)]
pub struct MeshTransform {
    mapper: RefCell<SurfaceMapper>,
}

impl MeshTransform {
    #[must_use]
    pub fn new(mapper: SurfaceMapper) -> Self {
        Self { mapper: RefCell::new(mapper) }
    }

    #[must_use]
    pub fn snapshot(&self) -> SurfaceMapper {
        *self.mapper.borrow()
    }

    pub fn update(&self, f: impl FnOnce(&mut SurfaceMapper)) {
        f(&mut self.mapper.borrow_mut());
    }
}

impl EventTransform for MeshTransform {
    fn transform(&self, raw: &RawPointerEvent) -> Option<MouseEvent> {
        self.mapper.borrow().map_event(raw)
    }
}

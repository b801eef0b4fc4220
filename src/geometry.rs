//! Geometry shared by the mapper, alignment and overlay code.
//!
//! The editor quad lives in its local XY plane, centered on the origin, facing
//! +Z. Local X grows to the right and local Y grows upward; surface pixels grow
//! right and downward from the top-left corner.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use glam::{Mat4, Quat, Vec3};

/// A point in surface pixel space (or engine client space).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `x`/`y` is the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open containment: the minimum edges are inside, the maximum edges are not.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Size of the editor quad in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadGeometry {
    pub width: f32,
    pub height: f32,
}

impl QuadGeometry {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A quad sized from surface pixels at the given density.
    #[must_use]
    pub fn from_pixels(width_px: u32, height_px: u32, pixels_per_unit: f32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (width_px as f32, height_px as f32);
        if pixels_per_unit <= 0.0 {
            return Self::default();
        }
        Self { width: w / pixels_per_unit, height: h / pixels_per_unit }
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > f32::EPSILON && self.height > f32::EPSILON)
    }

    /// Local-space corners: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 4] {
        let hw = self.width * 0.5;
        let hh = self.height * 0.5;
        [
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
        ]
    }

    /// Whether a local-space point lies strictly inside the quad (ignoring Z).
    #[must_use]
    pub fn contains_local(&self, local: Vec3) -> bool {
        local.x.abs() < self.width * 0.5 && local.y.abs() < self.height * 0.5
    }
}

/// Position/rotation/scale of the mesh in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self { position: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}

impl SceneNode {
    #[must_use]
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-space corners of `quad` under this node's transform.
    #[must_use]
    pub fn world_corners(&self, quad: &QuadGeometry) -> [Vec3; 4] {
        let m = self.world_matrix();
        quad.corners().map(|c| m.transform_point3(c))
    }
}

/// Nearest intersection of a ray with the quad, in world space.
///
/// Returns `None` for rays parallel to the quad, hits behind the origin, hits
/// outside the quad, or a degenerate quad/transform.
#[must_use]
pub fn intersect_quad(origin: Vec3, dir: Vec3, node: &SceneNode, quad: &QuadGeometry) -> Option<Vec3> {
    if quad.is_degenerate() {
        return None;
    }
    let world = node.world_matrix();
    if world.determinant().abs() <= f32::EPSILON {
        return None;
    }
    let inverse = world.inverse();
    let local_origin = inverse.transform_point3(origin);
    let local_dir = inverse.transform_vector3(dir);
    if local_dir.z.abs() <= f32::EPSILON {
        return None;
    }
    let t = -local_origin.z / local_dir.z;
    if t < 0.0 {
        return None;
    }
    let local_hit = local_origin + local_dir * t;
    if !quad.contains_local(local_hit) {
        return None;
    }
    Some(world.transform_point3(local_hit))
}

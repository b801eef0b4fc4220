//! Viewer (camera) model: orientation, frustum containment, and pointer rays.
//!
//! The viewer looks down its local -Z axis with +Y up, matching the scene
//! convention of the host framework.

#[cfg(test)]
#[path = "viewer_test.rs"]
mod viewer_test;

use glam::{Mat4, Quat, Vec3, Vec4};

/// A perspective viewer in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in degrees, before zoom.
    pub fov_y_deg: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Optical zoom; narrows the effective field of view.
    pub zoom: f32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y_deg: 80.0,
            aspect: 1.0,
            near: 0.005,
            far: 10_000.0,
            zoom: 1.0,
        }
    }
}

impl Viewer {
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Vertical field of view in radians after applying zoom.
    #[must_use]
    pub fn effective_fov_y(&self) -> f32 {
        let half = (self.fov_y_deg.to_radians() * 0.5).tan() / self.zoom.max(f32::EPSILON);
        2.0 * half.atan()
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.effective_fov_y(), self.aspect.max(f32::EPSILON), self.near, self.far)
    }

    /// Whether a world-space point is inside the view frustum.
    #[must_use]
    pub fn contains(&self, world: Vec3) -> bool {
        let clip = self.projection_matrix() * self.view_matrix() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return false;
        }
        clip.x.abs() <= clip.w && clip.y.abs() <= clip.w && clip.z >= 0.0 && clip.z <= clip.w
    }

    /// Distance in front of the viewer at which a `width` x `height` quad fills
    /// `fill` of the frustum along its tighter axis.
    #[must_use]
    pub fn fit_distance(&self, width: f32, height: f32, fill: f32) -> f32 {
        let tan_y = (self.effective_fov_y() * 0.5).tan() * fill;
        let tan_x = tan_y * self.aspect;
        let by_height = (height * 0.5) / tan_y.max(f32::EPSILON);
        let by_width = (width * 0.5) / tan_x.max(f32::EPSILON);
        by_height.max(by_width).max(self.near)
    }

    /// Ray through normalized device coordinates (`-1..1`, +Y up).
    #[must_use]
    pub fn ray_from_ndc(&self, x_ndc: f32, y_ndc: f32) -> (Vec3, Vec3) {
        let half_h = (self.effective_fov_y() * 0.5).tan();
        let half_w = half_h * self.aspect;
        let dir = (self.forward() + self.right() * (x_ndc * half_w) + self.up() * (y_ndc * half_h)).normalize_or_zero();
        (self.position, dir)
    }
}

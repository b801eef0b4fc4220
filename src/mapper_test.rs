#![allow(clippy::float_cmp)]

use std::f32::consts::FRAC_PI_2;

use glam::Quat;

use super::*;
use crate::input::{ContainerId, MouseEventKind};

const EPSILON: f64 = 1e-3;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 1x1 quad at z=-2 rendered into a 400x400 surface.
fn mapper() -> SurfaceMapper {
    let node = SceneNode { position: Vec3::new(0.0, 0.0, -2.0), ..SceneNode::default() };
    SurfaceMapper::new(node, QuadGeometry::new(1.0, 1.0), 400, 400, 0.0)
}

// --- world_to_surface ---

#[test]
fn center_maps_to_surface_center() {
    let p = mapper().world_to_surface(Vec3::new(0.0, 0.0, -2.0)).unwrap();
    assert!(point_approx_eq(p, Point::new(200.0, 200.0)));
}

#[test]
fn top_left_region_maps_near_origin() {
    let p = mapper().world_to_surface(Vec3::new(-0.475, 0.475, -2.0)).unwrap();
    assert!(point_approx_eq(p, Point::new(10.0, 10.0)));
}

#[test]
fn interior_points_stay_within_pixel_bounds() {
    let m = mapper();
    for i in 1..20 {
        for j in 1..20 {
            let x = -0.5 + f32::from(u8::try_from(i).unwrap()) * 0.05;
            let y = -0.5 + f32::from(u8::try_from(j).unwrap()) * 0.05;
            let p = m.world_to_surface(Vec3::new(x, y, -2.0)).unwrap();
            assert!(p.x > 0.0 && p.x < 400.0, "x out of bounds: {p:?}");
            assert!(p.y > 0.0 && p.y < 400.0, "y out of bounds: {p:?}");
        }
    }
}

#[test]
fn outside_points_are_invalid() {
    let m = mapper();
    assert!(m.world_to_surface(Vec3::new(0.6, 0.0, -2.0)).is_none());
    assert!(m.world_to_surface(Vec3::new(0.0, -0.5, -2.0)).is_none());
}

#[test]
fn zero_size_quad_is_invalid() {
    let mut m = mapper();
    m.quad = QuadGeometry::new(0.0, 0.0);
    assert!(m.world_to_surface(Vec3::new(0.0, 0.0, -2.0)).is_none());
    assert!(m.surface_to_local(Point::new(1.0, 1.0)).is_none());
}

#[test]
fn zero_pixel_surface_is_invalid() {
    let mut m = mapper();
    m.width_px = 0;
    assert!(m.world_to_surface(Vec3::new(0.0, 0.0, -2.0)).is_none());
}

#[test]
fn zero_scale_node_is_invalid() {
    let mut m = mapper();
    m.node.scale = Vec3::ZERO;
    assert!(m.world_to_local(Vec3::ZERO).is_none());
    assert!(m.world_to_surface(Vec3::ZERO).is_none());
}

#[test]
fn rotated_mesh_maps_through_inverse_transform() {
    let node = SceneNode {
        position: Vec3::new(-2.0, 0.0, 0.0),
        rotation: Quat::from_rotation_y(FRAC_PI_2),
        ..SceneNode::default()
    };
    let m = SurfaceMapper::new(node, QuadGeometry::new(1.0, 1.0), 400, 400, 0.0);
    // Local +X points to world -Z, so world z=-0.25 is a quarter to the right of center.
    let p = m.world_to_surface(Vec3::new(-2.0, 0.0, -0.25)).unwrap();
    assert!(point_approx_eq(p, Point::new(300.0, 200.0)));
}

// --- inverse direction ---

#[test]
fn surface_to_local_inverts_local_to_surface() {
    let m = mapper();
    let local = Vec3::new(0.2, -0.3, 0.0);
    let surface = m.local_to_surface(local).unwrap();
    let back = m.surface_to_local(surface).unwrap();
    assert!((back - local).length() < 1e-5);
}

#[test]
fn overlay_hit_test_in_local_space() {
    let m = mapper();
    let scrollbar = Rect::new(388.0, 0.0, 12.0, 400.0);
    // x = 0.49 local -> 396 px, inside the strip.
    assert!(m.hits_overlay(Vec3::new(0.49, 0.0, -2.0), scrollbar));
    assert!(!m.hits_overlay(Vec3::new(0.0, 0.0, -2.0), scrollbar));
}

#[test]
fn local_rect_orientation() {
    let m = mapper();
    let r = m.surface_rect_to_local(Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
    assert!((r.min - Vec3::new(-0.5, 0.0, 0.0)).length() < 1e-5);
    assert!((r.max - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-5);
}

// --- client offset ---

#[test]
fn layer_offset_shifts_client_y() {
    let mut m = mapper();
    m.layer_offset_y = 24.0;
    let client = m.surface_to_client(Point::new(10.0, 34.0));
    assert_eq!(client, Point::new(10.0, 10.0));
    assert_eq!(m.client_to_surface(client), Point::new(10.0, 34.0));
}

// --- map_event ---

#[test]
fn map_event_without_hit_is_none() {
    let raw = RawPointerEvent::new(MouseEventKind::MouseMove, ContainerId::new(), None, 0.0);
    assert!(mapper().map_event(&raw).is_none());
}

#[test]
fn map_event_applies_offset() {
    let mut m = mapper();
    m.layer_offset_y = 5.0;
    let raw = RawPointerEvent::new(MouseEventKind::MouseDown, ContainerId::new(), Some(Vec3::new(0.0, 0.0, -2.0)), 1.0);
    let ev = m.map_event(&raw).unwrap();
    assert!(point_approx_eq(ev.client(), Point::new(200.0, 195.0)));
    assert_eq!(ev.kind, MouseEventKind::MouseDown);
}

#[test]
fn mesh_transform_sees_updates() {
    let t = MeshTransform::new(mapper());
    let raw = RawPointerEvent::new(MouseEventKind::MouseMove, ContainerId::new(), Some(Vec3::new(0.0, 0.0, -2.0)), 0.0);
    assert!(t.transform(&raw).is_some());

    t.update(|m| m.node.position.x = 5.0);
    assert!(t.transform(&raw).is_none());
    assert_eq!(t.snapshot().node.position.x, 5.0);
}

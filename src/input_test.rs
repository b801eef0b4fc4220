#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn parse_known_types() {
    assert_eq!(MouseEventKind::parse("mousedown"), MouseEventKind::MouseDown);
    assert_eq!(MouseEventKind::parse("mouseup"), MouseEventKind::MouseUp);
    assert_eq!(MouseEventKind::parse("mousemove"), MouseEventKind::MouseMove);
    assert_eq!(MouseEventKind::parse("dblclick"), MouseEventKind::DblClick);
    assert_eq!(MouseEventKind::parse("click"), MouseEventKind::Click);
}

#[test]
fn parse_folds_mousewheel_into_wheel() {
    assert_eq!(MouseEventKind::parse("wheel"), MouseEventKind::Wheel);
    assert_eq!(MouseEventKind::parse("mousewheel"), MouseEventKind::Wheel);
}

#[test]
fn parse_unknown_is_other() {
    assert_eq!(MouseEventKind::parse("contextmenu"), MouseEventKind::Other("contextmenu".into()));
    assert_eq!(MouseEventKind::parse("contextmenu").as_str(), "contextmenu");
}

#[test]
fn display_matches_engine_names() {
    assert_eq!(MouseEventKind::MouseDown.to_string(), "mousedown");
    assert_eq!(MouseEventKind::Wheel.to_string(), "wheel");
}

#[test]
fn container_ids_are_unique() {
    assert_ne!(ContainerId::new(), ContainerId::new());
}

#[test]
fn raw_mousedown_holds_primary() {
    let raw = RawPointerEvent::new(MouseEventKind::MouseDown, ContainerId::new(), None, 0.0);
    assert_eq!(raw.buttons, BUTTONS_PRIMARY);
    let raw = RawPointerEvent::new(MouseEventKind::MouseMove, ContainerId::new(), None, 0.0);
    assert_eq!(raw.buttons, 0);
}

#[test]
fn from_raw_keeps_every_field_but_position() {
    let target = ContainerId::new();
    let mut raw = RawPointerEvent::new(MouseEventKind::Wheel, target, Some(Vec3::ONE), 42.0)
        .with_wheel(1.0, -3.0)
        .with_buttons(BUTTONS_MIDDLE);
    raw.modifiers.shift = true;
    raw.button = Button::Middle;

    let ev = MouseEvent::from_raw(&raw, Point::new(5.0, 6.0));
    assert_eq!(ev.kind, MouseEventKind::Wheel);
    assert_eq!(ev.target, target);
    assert_eq!(ev.client(), Point::new(5.0, 6.0));
    assert_eq!(ev.button, Button::Middle);
    assert_eq!(ev.buttons, BUTTONS_MIDDLE);
    assert!(ev.modifiers.shift);
    assert_eq!(ev.wheel, WheelDelta { dx: 1.0, dy: -3.0 });
    assert_eq!(ev.time_ms, 42.0);
}

#[test]
fn retyped_changes_only_kind() {
    let raw = RawPointerEvent::new(MouseEventKind::MouseDown, ContainerId::new(), None, 7.0);
    let ev = MouseEvent::from_raw(&raw, Point::new(1.0, 2.0));
    let dbl = ev.retyped(MouseEventKind::DblClick);
    assert_eq!(dbl.kind, MouseEventKind::DblClick);
    assert_eq!(dbl.client(), ev.client());
    assert_eq!(dbl.time_ms, ev.time_ms);
}

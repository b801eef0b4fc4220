#![allow(clippy::float_cmp)]

use std::cell::Cell;

use super::*;
use crate::capture::CaptureSession;
use crate::engine::{AFTER_RENDER, THEME_CHANGE};
use crate::headless::{EngineCall, HeadlessEngine, HeadlessFactory, Journal};

const EPSILON: f64 = 1e-2;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// Helpers
// =============================================================

fn hub() -> Rc<RefCell<CaptureHub>> {
    Rc::new(RefCell::new(CaptureHub::new()))
}

fn node() -> SceneNode {
    SceneNode { position: Vec3::new(0.0, 0.0, -2.0), ..SceneNode::default() }
}

fn options(hub: &Rc<RefCell<CaptureHub>>, journal: &Journal) -> MeshOptions {
    let factory = Rc::new(HeadlessFactory { journal: journal.clone() });
    MeshOptions::new(Rc::clone(hub))
        .with_engine(EngineSource::Create { factory, options: EngineOptions::default() })
        .with_input(InputBinding::EventSource)
        .with_node(node())
}

fn mesh(hub: &Rc<RefCell<CaptureHub>>, journal: &Journal) -> EditorMesh {
    EditorMesh::new(options(hub, journal)).unwrap()
}

/// World hit for a surface pixel of the default 400x400 mesh (1x1 units at z=-2).
#[allow(clippy::cast_possible_truncation)]
fn hit(sx: f64, sy: f64) -> Vec3 {
    Vec3::new((sx / 400.0 - 0.5) as f32, (0.5 - sy / 400.0) as f32, -2.0)
}

fn raw(mesh: &EditorMesh, kind: MouseEventKind, sx: f64, sy: f64, time_ms: f64) -> RawPointerEvent {
    RawPointerEvent::new(kind, mesh.container(), Some(hit(sx, sy)), time_ms)
}

fn mouse_calls(journal: &Journal, container: ContainerId) -> Vec<(String, f64, f64)> {
    journal
        .calls_for(container)
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::Mouse { kind, x, y } => Some((kind, x, y)),
            _ => None,
        })
        .collect()
}

fn recorder(mesh: &mut EditorMesh, event: &str) -> Rc<RefCell<Vec<MeshEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    mesh.on(event, move |ev| {
        sink.borrow_mut().push(ev.clone());
        Ok(())
    })
    .unwrap();
    seen
}

// =============================================================
// Construction
// =============================================================

#[test]
fn construction_requires_input_binding() {
    let journal = Journal::new();
    let mut opts = options(&hub(), &journal);
    opts.input = None;
    assert!(matches!(EditorMesh::new(opts), Err(MeshError::Config(ConfigError::MissingInput))));
}

#[test]
fn construction_requires_engine_source() {
    let journal = Journal::new();
    let mut opts = options(&hub(), &journal);
    opts.engine = None;
    assert!(matches!(EditorMesh::new(opts), Err(MeshError::Config(ConfigError::MissingEngine))));
}

#[test]
fn construction_rejects_non_positive_density() {
    let journal = Journal::new();
    let config = EditorConfig { pixels_per_unit: 0.0, ..EditorConfig::default() };
    let opts = options(&hub(), &journal).with_config(config);
    assert!(matches!(EditorMesh::new(opts), Err(MeshError::Config(ConfigError::InvalidDensity(_)))));
}

#[test]
fn construction_surfaces_factory_failure() {
    let journal = Journal::new();
    let opts = options(&hub(), &journal).with_size(0, 400);
    assert!(matches!(EditorMesh::new(opts), Err(MeshError::Engine(EngineError::Create(_)))));
}

#[test]
fn construction_rejects_oversized_surface() {
    let journal = Journal::new();
    let opts = options(&hub(), &journal).with_size(u32::MAX, u32::MAX);
    assert!(matches!(EditorMesh::new(opts), Err(MeshError::Config(ConfigError::InvalidSize(_)))));
    assert!(journal.calls().is_empty());
}

#[test]
fn prepared_mesh_is_constructing_until_attached() {
    let hub = hub();
    let (mut m, source) = EditorMesh::prepare(options(&hub, &Journal::new())).unwrap();
    assert_eq!(m.lifecycle(), Lifecycle::Constructing);
    assert!(!hub.borrow().is_registered(m.container()));

    m.attach(source).unwrap();
    assert_eq!(m.lifecycle(), Lifecycle::Active);
    assert!(hub.borrow().is_registered(m.container()));
}

#[test]
fn constructed_mesh_is_active_and_registered() {
    let hub = hub();
    let m = mesh(&hub, &Journal::new());
    assert_eq!(m.lifecycle(), Lifecycle::Active);
    assert!(hub.borrow().is_registered(m.container()));
    assert_eq!(m.size().unwrap(), (400, 400));
    let mapper = m.mapper();
    assert!((mapper.quad.width - 1.0).abs() < f32::EPSILON);
}

#[test]
fn existing_engine_is_sized_to_the_mesh() {
    let journal = Journal::new();
    let container = ContainerId::new();
    let engine = HeadlessEngine::new(container, 10, 10, journal.clone());
    let opts = MeshOptions::new(hub())
        .with_engine(EngineSource::Existing(Box::new(engine)))
        .with_input(InputBinding::EventSource)
        .with_size(300, 200);

    let m = EditorMesh::new(opts).unwrap();
    assert_eq!(m.container(), container);
    assert_eq!(journal.calls_for(container), vec![EngineCall::Resize { width: 300, height: 200 }]);
}

// =============================================================
// Input
// =============================================================

#[test]
fn mousedown_reaches_press_handler_with_layer_offset() {
    let journal = Journal::new();
    let mut m = EditorMesh::new(options(&hub(), &journal).with_layer_offset(4.0)).unwrap();
    m.set_value("hello").unwrap();

    let out = m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 10.0, 10.0, 0.0)).unwrap();
    assert!(matches!(out, InputOutcome::Engine(d) if d.begin_capture));

    let calls = mouse_calls(&journal, m.container());
    assert_eq!(calls.len(), 1);
    let (kind, x, y) = &calls[0];
    assert_eq!(kind, "mousedown");
    assert!(approx_eq(*x, 10.0), "x = {x}");
    assert!(approx_eq(*y, 6.0), "y = {y}");
    assert_eq!(m.get_value().unwrap(), "hello");
}

#[test]
fn miss_is_skipped_silently() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let miss = RawPointerEvent::new(MouseEventKind::MouseDown, m.container(), None, 0.0);
    let outside = RawPointerEvent::new(MouseEventKind::MouseDown, m.container(), Some(Vec3::new(3.0, 0.0, -2.0)), 0.0);

    assert_eq!(m.handle_raw(&miss).unwrap(), InputOutcome::Skipped);
    assert_eq!(m.handle_raw(&outside).unwrap(), InputOutcome::Skipped);
    assert!(journal.calls().is_empty());
}

#[test]
fn events_for_other_containers_are_skipped() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let foreign = RawPointerEvent::new(MouseEventKind::MouseDown, ContainerId::new(), Some(hit(10.0, 10.0)), 0.0);
    assert_eq!(m.handle_raw(&foreign).unwrap(), InputOutcome::Skipped);
    assert!(journal.calls().is_empty());
}

#[test]
fn press_opens_capture_and_release_closes_it() {
    let hub = hub();
    let journal = Journal::new();
    let mut m = mesh(&hub, &journal);

    m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 50.0, 50.0, 0.0)).unwrap();
    assert_eq!(hub.borrow().session(), Some(CaptureSession { owner: m.container(), kind: CaptureKind::Mouse }));

    journal.clear();
    m.handle_raw(&raw(&m, MouseEventKind::MouseMove, 80.0, 50.0, 10.0)).unwrap();
    let out = m.handle_raw(&raw(&m, MouseEventKind::MouseUp, 80.0, 50.0, 20.0)).unwrap();

    assert!(matches!(out, InputOutcome::Engine(d) if d.released));
    assert!(hub.borrow().session().is_none());
    let calls = journal.calls();
    assert!(matches!(calls[0], EngineCall::Move { .. }));
    assert!(matches!(&calls[1], EngineCall::Mouse { kind, .. } if kind == "mouseup"));
}

#[test]
fn captured_release_off_quad_still_releases() {
    let hub = hub();
    let mut m = mesh(&hub, &Journal::new());
    m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 50.0, 50.0, 0.0)).unwrap();

    let off = RawPointerEvent::new(MouseEventKind::MouseUp, m.container(), None, 5.0);
    assert_eq!(m.handle_raw(&off).unwrap(), InputOutcome::Skipped);
    assert!(hub.borrow().session().is_none());
}

#[test]
fn double_click_through_mesh() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let first = m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 20.0, 20.0, 1000.0)).unwrap();
    m.handle_raw(&raw(&m, MouseEventKind::MouseUp, 20.0, 20.0, 1050.0)).unwrap();
    let second = m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 20.0, 20.0, 1200.0)).unwrap();

    assert!(matches!(first, InputOutcome::Engine(d) if !d.double_click));
    assert!(matches!(second, InputOutcome::Engine(d) if d.double_click));
    assert_eq!(m.dispatcher().state().last_click_ms, Some(1200.0));
}

#[test]
fn scrollbar_thumb_drag_scrolls_engine() {
    let hub = hub();
    let journal = Journal::new();
    let mut m = mesh(&hub, &journal);
    m.set_value(&"line\n".repeat(100)).unwrap();

    let out = m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 394.0, 10.0, 0.0)).unwrap();
    assert_eq!(out, InputOutcome::Scrollbar);
    assert_eq!(hub.borrow().session().map(|s| s.kind), Some(CaptureKind::Raw));
    assert!(mouse_calls(&journal, m.container()).is_empty(), "thumb press bypasses the engine");

    m.handle_raw(&raw(&m, MouseEventKind::MouseMove, 394.0, 60.0, 10.0)).unwrap();
    let top = m.engine_mut().unwrap().scroll_metrics().scroll_top;
    assert!(approx_eq(top, 200.0), "scroll_top = {top}");

    m.handle_raw(&raw(&m, MouseEventKind::MouseUp, 394.0, 60.0, 20.0)).unwrap();
    assert!(hub.borrow().session().is_none());
    assert!(m.dispatcher().state().scrollbar_anchor.is_none());
}

#[test]
fn press_on_track_without_scrollable_content_goes_to_engine() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let out = m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 394.0, 10.0, 0.0)).unwrap();
    assert!(matches!(out, InputOutcome::Engine(_)));
}

#[test]
fn pointer_ray_cast_needs_viewer_binding() {
    let mut m = mesh(&hub(), &Journal::new());
    let err = m.handle_pointer(MouseEventKind::MouseDown, 0.0, 0.0, 0.0).unwrap_err();
    assert!(matches!(err, MeshError::Config(ConfigError::NoViewer)));
}

#[test]
fn pointer_ray_cast_hits_aligned_mesh() {
    let journal = Journal::new();
    let viewer: ViewerHandle = Rc::new(Cell::new(Viewer::default()));
    let opts = options(&hub(), &journal).with_input(InputBinding::Viewer(Rc::clone(&viewer)));
    let mut m = EditorMesh::new(opts).unwrap();
    m.align_with_camera(AlignDirection::Center, &viewer.get()).unwrap();

    m.handle_pointer(MouseEventKind::MouseDown, 0.0, 0.0, 0.0).unwrap();
    let calls = mouse_calls(&journal, m.container());
    assert_eq!(calls.len(), 1);
    assert!(approx_eq(calls[0].1, 200.0));
    assert!(approx_eq(calls[0].2, 200.0));

    // Far off to the side misses.
    journal.clear();
    assert_eq!(m.handle_pointer(MouseEventKind::MouseMove, 0.99, 0.0, 1.0).unwrap(), InputOutcome::Skipped);
}

// =============================================================
// Resize, render, save
// =============================================================

#[test]
fn set_size_resizes_everything_and_notifies() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let seen = recorder(&mut m, RESIZE_EVENT);
    m.take_texture_dirty().unwrap();

    m.set_size(800, 200).unwrap();

    assert_eq!(m.size().unwrap(), (800, 200));
    assert!(m.take_texture_dirty().unwrap());
    let mapper = m.mapper();
    assert_eq!((mapper.width_px, mapper.height_px), (800, 200));
    assert!((mapper.quad.width - 2.0).abs() < f32::EPSILON);
    assert!((mapper.quad.height - 0.5).abs() < f32::EPSILON);
    assert!(journal.calls_for(m.container()).contains(&EngineCall::Resize { width: 800, height: 200 }));
    assert_eq!(*seen.borrow(), vec![MeshEvent::Resize { width: 800, height: 200 }]);
}

#[test]
fn oversized_set_size_is_rejected_without_side_effects() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    let seen = recorder(&mut m, RESIZE_EVENT);
    let before = m.mapper();
    journal.clear();

    let err = m.set_size(u32::MAX, 400).unwrap_err();
    assert!(matches!(err, MeshError::Config(ConfigError::InvalidSize(_))));
    assert_eq!(m.size().unwrap(), (400, 400));
    assert_eq!(m.mapper(), before);
    assert!(journal.calls().is_empty());
    assert!(seen.borrow().is_empty());
}

#[test]
fn set_size_is_idempotent_but_always_dirty() {
    let mut m = mesh(&hub(), &Journal::new());
    let seen = recorder(&mut m, RESIZE_EVENT);

    m.set_size(500, 300).unwrap();
    let first = (m.size().unwrap(), m.mapper());
    assert!(m.take_texture_dirty().unwrap());

    m.set_size(500, 300).unwrap();
    assert_eq!((m.size().unwrap(), m.mapper()), first);
    assert!(m.take_texture_dirty().unwrap());

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}

#[test]
fn frame_paints_after_edits() {
    let journal = Journal::new();
    let mut m = mesh(&hub(), &journal);
    assert!(m.frame().unwrap(), "initial paint");
    assert!(!m.frame().unwrap());

    m.set_value("fn main() {}").unwrap();
    m.take_texture_dirty().unwrap();
    assert!(m.frame().unwrap());
    assert!(m.take_texture_dirty().unwrap());
    assert_eq!(m.surface().unwrap().pixel(0, 0), Some([200, 200, 190, 255]));
}

#[test]
fn options_reach_the_engine() {
    let mut m = mesh(&hub(), &Journal::new());
    let themes = Rc::new(Cell::new(0));
    let count = Rc::clone(&themes);
    m.engine_mut().unwrap().renderer().on(THEME_CHANGE, move |_| {
        count.set(count.get() + 1);
        Ok(())
    });

    m.set_options(&[("theme", OptionValue::Str("github".into())), ("bogus", OptionValue::Bool(true))])
        .unwrap();
    assert_eq!(themes.get(), 1);
}

#[test]
fn save_emits_value() {
    let mut m = mesh(&hub(), &Journal::new());
    let seen = recorder(&mut m, SAVE_EVENT);
    m.set_value("let x = 1;").unwrap();

    assert_eq!(m.save().unwrap(), "let x = 1;");
    assert_eq!(*seen.borrow(), vec![MeshEvent::Save { value: "let x = 1;".into() }]);
}

#[test]
fn mesh_events_serialize_with_type_tag() {
    let json = serde_json::to_value(MeshEvent::Resize { width: 4, height: 3 }).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "resize", "width": 4, "height": 3 }));
}

// =============================================================
// Alignment
// =============================================================

#[test]
fn align_moves_node_in_front_of_viewer() {
    let mut m = mesh(&hub(), &Journal::new());
    let viewer = Viewer { position: Vec3::new(0.0, 1.0, 0.0), ..Viewer::default() };
    m.align_with_camera(AlignDirection::Center, &viewer).unwrap();

    let node = m.node().unwrap();
    assert!((node.position.y - 1.0).abs() < 1e-4);
    assert!(node.position.z < 0.0);
}

#[test]
fn auto_align_without_task_set_is_an_error() {
    let m = Rc::new(RefCell::new(mesh(&hub(), &Journal::new())));
    let viewer: ViewerHandle = Rc::new(Cell::new(Viewer::default()));
    let err = EditorMesh::auto_align_with_camera(&m, AlignDirection::Center, viewer).unwrap_err();
    assert!(matches!(err, MeshError::Config(ConfigError::NoTaskSet)));
    assert!(!m.borrow().is_auto_aligning());
}

#[test]
fn auto_align_queues_without_running_runtime() {
    let tasks = Rc::new(LocalSet::new());
    let opts = options(&hub(), &Journal::new()).with_tasks(Rc::clone(&tasks));
    let m = Rc::new(RefCell::new(EditorMesh::new(opts).unwrap()));
    let viewer: ViewerHandle = Rc::new(Cell::new(Viewer::default()));

    EditorMesh::auto_align_with_camera(&m, AlignDirection::Left, viewer).unwrap();
    assert!(m.borrow().is_auto_aligning());
    assert!(m.borrow_mut().stop_auto_align());
}

#[tokio::test(start_paused = true)]
async fn auto_align_follows_viewer_and_restarts_cleanly() {
    let local = Rc::new(LocalSet::new());
    local
        .run_until(async {
            let opts = options(&hub(), &Journal::new()).with_tasks(Rc::clone(&local));
            let m = Rc::new(RefCell::new(EditorMesh::new(opts).unwrap()));
            let viewer: ViewerHandle = Rc::new(Cell::new(Viewer::default()));

            EditorMesh::auto_align_with_camera(&m, AlignDirection::Center, Rc::clone(&viewer)).unwrap();
            EditorMesh::auto_align_with_camera(&m, AlignDirection::Center, Rc::clone(&viewer)).unwrap();
            assert!(m.borrow().is_auto_aligning());

            viewer.set(Viewer { position: Vec3::new(0.0, 0.0, 10.0), ..Viewer::default() });
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            let z = m.borrow().node().unwrap().position.z;
            assert!(z < 10.0 && z > 9.0, "z = {z}");

            assert!(m.borrow_mut().stop_auto_align());
            assert!(!m.borrow_mut().stop_auto_align());
            assert!(!m.borrow().is_auto_aligning());
        })
        .await;
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn destroy_releases_everything() {
    let hub = hub();
    let journal = Journal::new();
    let mut m = mesh(&hub, &journal);
    let fired = Rc::new(Cell::new(0));
    let count = Rc::clone(&fired);
    m.on(RESIZE_EVENT, move |_| {
        count.set(count.get() + 1);
        Ok(())
    })
    .unwrap();
    m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 50.0, 50.0, 0.0)).unwrap();

    m.destroy().unwrap();

    assert_eq!(m.lifecycle(), Lifecycle::Destroyed);
    assert!(Destroyable::is_destroyed(&m));
    assert!(!hub.borrow().is_registered(m.container()));
    assert!(hub.borrow().session().is_none());
    assert!(journal.calls_for(m.container()).contains(&EngineCall::Destroy));
    assert!(matches!(m.surface(), Err(MeshError::Destroyed)));
    assert!(matches!(m.get_value(), Err(MeshError::Destroyed)));
    assert!(matches!(m.set_size(10, 10), Err(MeshError::Destroyed)));
    assert!(matches!(m.handle_raw(&raw(&m, MouseEventKind::MouseDown, 1.0, 1.0, 0.0)), Err(MeshError::Destroyed)));
    assert!(matches!(m.destroy(), Err(MeshError::Destroyed)));
    assert!(m.intersect_ray(Vec3::ZERO, Vec3::NEG_Z).is_none());
    assert_eq!(fired.get(), 0);
}

#[test]
fn dropping_mesh_unregisters_it() {
    let hub = hub();
    let container = {
        let m = mesh(&hub, &Journal::new());
        m.container()
    };
    assert!(!hub.borrow().is_registered(container));
}

#[test]
fn capabilities_are_usable_as_trait_objects() {
    let mut m = mesh(&hub(), &Journal::new());
    let resizable: &mut dyn Resizable = &mut m;
    resizable.set_size(100, 100).unwrap();
    assert!(Alignable::take_resized(&mut m));
    assert!(!Alignable::take_resized(&mut m));

    let destroyable: &mut dyn Destroyable = &mut m;
    destroyable.destroy().unwrap();
    assert!(destroyable.is_destroyed());
}

#[test]
fn renderer_listeners_are_gone_after_destroy() {
    let mut m = mesh(&hub(), &Journal::new());
    assert_eq!(m.engine_mut().unwrap().renderer().listener_count(AFTER_RENDER), 1);
    m.destroy().unwrap();
    assert!(m.engine_mut().is_err());
}

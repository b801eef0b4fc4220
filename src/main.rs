//! Headless demo: one editor quad in front of a viewer, driven by pointer rays.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use codemesh::align::{AlignDirection, ViewerHandle};
use codemesh::capture::CaptureHub;
use codemesh::component::EditorComponent;
use codemesh::config::EditorConfig;
use codemesh::headless::{HeadlessFactory, Journal};
use codemesh::input::MouseEventKind;
use codemesh::mesh::{MeshEvent, SAVE_EVENT};
use codemesh::viewer::Viewer;
use glam::Vec3;
use tokio::task::LocalSet;
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    let local = Rc::new(LocalSet::new());
    if let Err(e) = local.run_until(run(Rc::clone(&local))).await {
        warn!(error = %e, "demo failed");
    }
}

async fn run(tasks: Rc<LocalSet>) -> Result<(), Box<dyn std::error::Error>> {
    let config = EditorConfig::from_env();
    info!(?config, "codemesh demo");

    let journal = Journal::new();
    let hub = Rc::new(RefCell::new(CaptureHub::new()));
    let viewer: ViewerHandle = Rc::new(Cell::new(Viewer { position: Vec3::new(0.0, 1.6, 0.0), ..Viewer::default() }));
    let factory = Rc::new(HeadlessFactory { journal: journal.clone() });

    let mut component = EditorComponent::new(hub, factory, Rc::clone(&viewer), config).with_tasks(tasks);
    component.init(&serde_json::json!({
        "width": 400,
        "height": 400,
        "value": "fn main() {\n    let greeting = \"hello\";\n}\n",
        "auto_align": true,
        "align": "center",
    }))?;
    let Some(mesh) = component.mesh() else {
        return Err("component has no mesh".into());
    };

    mesh.borrow_mut().on(SAVE_EVENT, |event| {
        if let MeshEvent::Save { value } = event {
            info!(bytes = value.len(), "saved");
        }
        Ok(())
    })?;
    mesh.borrow_mut().align_with_camera(AlignDirection::Center, &viewer.get())?;

    // Click near the top-left of the text, drag, release.
    {
        let mut m = mesh.borrow_mut();
        for (kind, x, y, t) in [
            (MouseEventKind::MouseDown, -0.4, 0.4, 0.0),
            (MouseEventKind::MouseMove, -0.2, 0.4, 16.0),
            (MouseEventKind::MouseUp, -0.2, 0.4, 32.0),
        ] {
            let outcome = m.handle_pointer(kind.clone(), x, y, t)?;
            info!(%kind, ?outcome, "pointer");
        }
        let painted = m.frame()?;
        info!(painted, dirty = m.take_texture_dirty()?, "frame");
    }

    // Walk the viewer sideways and let auto-alignment follow.
    for step in 1..=5_u8 {
        let mut v = viewer.get();
        v.position.x += 0.2 * f32::from(step);
        viewer.set(v);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    tokio::time::sleep(config.debounce() + config.poll_interval() * 2).await;
    info!(position = ?mesh.borrow().node()?.position, "after auto-align");

    component.update(&serde_json::json!({
        "width": 600,
        "height": 400,
        "value": "fn main() {\n    let greeting = \"hello\";\n}\n",
        "theme": "github",
        "auto_align": false,
    }))?;
    mesh.borrow_mut().set_value("// edited\n")?;
    mesh.borrow_mut().save()?;

    info!(engine_calls = journal.calls().len(), "done");
    component.remove()?;
    Ok(())
}

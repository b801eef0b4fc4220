//! Alignment of an editor quad with the viewer.
//!
//! DESIGN
//! ======
//! One-shot alignment parks the quad straight ahead of the viewer at the
//! distance where it fills [`ALIGN_FILL`] of the frustum, facing the viewer.
//! A left/right bias then walks it sideways one step at a time, re-testing the
//! leading corners after each step. The first step that pushes a corner out of
//! the frustum is undone and the walk stops.
//!
//! Auto-alignment is split in two:
//! - [`AlignmentTracker`] is pure state. It compares viewer and mesh snapshots
//!   across polls and owns the debounce deadline, taking `now` as an argument
//!   so tests drive it without a clock.
//! - [`AutoAlignTask`] is the scheduled part: a task queued on the host's
//!   `LocalSet`, ticking a fixed interval and holding only a weak reference
//!   to its target. Queueing never needs a running runtime; the poll starts
//!   once the host drives the set.
//!
//! INVARIANTS
//! ==========
//! - The lateral walk is capped at `align_max_steps`, so alignment terminates
//!   even when every corner stays visible.
//! - A recompute runs only after the state has been quiet for the debounce
//!   delay; movement during the delay pushes the deadline back.
//! - Dropping or stopping an [`AutoAlignTask`] aborts its interval.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use std::cell::{Cell, RefCell};
use std::rc::Weak;
use std::time::Duration;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tokio::task::{JoinHandle, LocalSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::config::EditorConfig;
use crate::consts::{ALIGN_EPSILON, ALIGN_FILL};
use crate::geometry::{QuadGeometry, SceneNode};
use crate::viewer::Viewer;

/// Shared, host-updated viewer state read by auto-alignment on each tick.
pub type ViewerHandle = std::rc::Rc<Cell<Viewer>>;

/// Horizontal bias applied after centering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignDirection {
    Left,
    Right,
    #[default]
    Center,
}

impl AlignDirection {
    /// Parse an attribute value. Unknown strings mean `Center`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "left" => Self::Left,
            "right" => Self::Right,
            _ => Self::Center,
        }
    }
}

// =============================================================================
// ONE-SHOT ALIGNMENT
// =============================================================================

/// Reposition `node` so `quad` sits inside `viewer`'s frustum, biased toward
/// `direction`. Returns the number of lateral steps taken.
pub fn align_with_camera(
    node: &mut SceneNode,
    quad: &QuadGeometry,
    viewer: &Viewer,
    direction: AlignDirection,
    config: &EditorConfig,
) -> usize {
    let width = quad.width * node.scale.x.abs();
    let height = quad.height * node.scale.y.abs();
    let distance = viewer.fit_distance(width, height, ALIGN_FILL);
    node.rotation = viewer.rotation;
    node.position = viewer.position + viewer.forward() * distance;

    let (lateral, leading) = match direction {
        AlignDirection::Center => return 0,
        AlignDirection::Left => (-viewer.right(), [0, 3]),
        AlignDirection::Right => (viewer.right(), [1, 2]),
    };
    if quad.is_degenerate() || config.align_step <= 0.0 {
        return 0;
    }
    let step = lateral * config.align_step;

    let mut steps = 0;
    while steps < config.align_max_steps {
        node.position += step;
        let corners = node.world_corners(quad);
        if !leading.iter().all(|&i| viewer.contains(corners[i])) {
            node.position -= step;
            break;
        }
        steps += 1;
    }
    trace!(?direction, steps, distance, "align: placed");
    steps
}

// =============================================================================
// CHANGE TRACKING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Snapshot {
    viewer_position: Vec3,
    viewer_rotation: Quat,
    fov_y_deg: f32,
    zoom: f32,
    mesh_position: Vec3,
}

impl Snapshot {
    fn capture(viewer: &Viewer, mesh_position: Vec3) -> Self {
        Self {
            viewer_position: viewer.position,
            viewer_rotation: viewer.rotation,
            fov_y_deg: viewer.fov_y_deg,
            zoom: viewer.zoom,
            mesh_position,
        }
    }

    fn differs(&self, other: &Self) -> bool {
        !self.viewer_position.abs_diff_eq(other.viewer_position, ALIGN_EPSILON)
            || !self.viewer_rotation.abs_diff_eq(other.viewer_rotation, ALIGN_EPSILON)
            || (self.fov_y_deg - other.fov_y_deg).abs() > ALIGN_EPSILON
            || (self.zoom - other.zoom).abs() > ALIGN_EPSILON
            || !self.mesh_position.abs_diff_eq(other.mesh_position, ALIGN_EPSILON)
    }
}

/// Remembers what the viewer and mesh looked like at the last poll and
/// decides when a debounced recompute is due.
#[derive(Debug, Clone)]
pub struct AlignmentTracker {
    last: Option<Snapshot>,
    resized: bool,
    deadline: Option<Instant>,
    debounce: Duration,
}

impl AlignmentTracker {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self { last: None, resized: false, deadline: None, debounce }
    }

    /// Record that the mesh was resized since the last poll.
    pub fn mark_resized(&mut self) {
        self.resized = true;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Compare the current state against the last poll.
    ///
    /// Returns `true` when a recompute should run now: something changed and
    /// nothing has changed again for the debounce delay.
    pub fn poll_at(&mut self, now: Instant, viewer: &Viewer, mesh_position: Vec3) -> bool {
        let current = Snapshot::capture(viewer, mesh_position);
        let resized = std::mem::take(&mut self.resized);
        if resized || self.last.is_none_or(|last| last.differs(&current)) {
            self.last = Some(current);
            self.deadline = Some(now + self.debounce);
            return false;
        }
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Adopt the post-alignment state so the move itself is not seen as a change.
    pub fn remember(&mut self, viewer: &Viewer, mesh_position: Vec3) {
        self.last = Some(Snapshot::capture(viewer, mesh_position));
    }
}

// =============================================================================
// SCHEDULED TASK
// =============================================================================

/// Something auto-alignment can drive.
pub trait Alignable {
    type Error: std::fmt::Display;

    /// Current world position of the aligned object.
    ///
    /// # Errors
    ///
    /// Returns an error when the object can no longer be aligned.
    fn position(&self) -> Result<Vec3, Self::Error>;

    /// Whether the object was resized since the last call; clears the flag.
    fn take_resized(&mut self) -> bool;

    /// One-shot alignment. Returns the number of lateral steps taken.
    ///
    /// # Errors
    ///
    /// Returns an error when the object can no longer be aligned.
    fn align_with_camera(&mut self, direction: AlignDirection, viewer: &Viewer) -> Result<usize, Self::Error>;
}

/// Handle to a running auto-alignment poll. Aborted on [`stop`](Self::stop) or drop.
#[derive(Debug)]
pub struct AutoAlignTask {
    handle: JoinHandle<()>,
}

impl AutoAlignTask {
    /// Queue a poll of `target` against `viewer` every `config.poll_interval()` on `tasks`.
    #[must_use]
    pub fn spawn<T>(
        tasks: &LocalSet,
        target: Weak<RefCell<T>>,
        viewer: ViewerHandle,
        direction: AlignDirection,
        config: &EditorConfig,
    ) -> Self
    where
        T: Alignable + 'static,
    {
        let poll = config.poll_interval();
        let debounce = config.debounce();
        info!(poll_ms = config.align_poll_ms, debounce_ms = config.align_debounce_ms, ?direction, "auto-align: start");

        let handle = tasks.spawn_local(async move {
            let mut tracker = AlignmentTracker::new(debounce);
            let mut ticker = tokio::time::interval(poll);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(target) = target.upgrade() else {
                    debug!("auto-align: target dropped");
                    break;
                };
                let Ok(mut target) = target.try_borrow_mut() else {
                    trace!("auto-align: target busy, skipping tick");
                    continue;
                };
                if !tick(&mut *target, &mut tracker, &viewer.get(), direction) {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            info!("auto-align: stop");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for AutoAlignTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One poll. Returns `false` when the target can no longer be aligned.
fn tick<T: Alignable>(target: &mut T, tracker: &mut AlignmentTracker, viewer: &Viewer, direction: AlignDirection) -> bool {
    let position = match target.position() {
        Ok(position) => position,
        Err(e) => {
            warn!(error = %e, "auto-align: target unavailable");
            return false;
        }
    };
    if target.take_resized() {
        tracker.mark_resized();
    }
    if !tracker.poll_at(Instant::now(), viewer, position) {
        return true;
    }
    match target.align_with_camera(direction, viewer) {
        Ok(steps) => {
            debug!(steps, "auto-align: realigned");
            match target.position() {
                Ok(position) => {
                    tracker.remember(viewer, position);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "auto-align: target unavailable");
                    false
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "auto-align: alignment failed");
            false
        }
    }
}

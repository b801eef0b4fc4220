//! Capture routing: coordinate mapping for events delivered during a drag.
//!
//! DESIGN
//! ======
//! While the user drags (text selection, scrollbar), the text engine enters a
//! capture session and expects every following pointer event until release,
//! wherever it lands. The capture facility is shared by every editor in the
//! scene, so it lives in one [`CaptureHub`] handed to each mesh.
//!
//! Instead of wrapping the engine's capture functions in place, each engine
//! binding registers an [`EventTransform`] for its container when it is
//! constructed. The hub exposes the engine's two capture entry points
//! ([`CaptureHub::begin_mouse_capture`] for gestures, [`CaptureHub::install_capture`]
//! for the low-level drag used by the scrollbar) and routes raw events through
//! the owner's transform before anything reaches an engine handler.
//!
//! INVARIANTS
//! ==========
//! - An event is mapped only when its target container is the session owner;
//!   anything else passes through untouched.
//! - Each container has at most one transform, so an event is mapped at most
//!   once no matter how often registration runs.
//! - Only the owner can release its session.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::input::{ContainerId, MouseEvent, RawPointerEvent};

/// Maps raw pointer events into one engine's client coordinates.
pub trait EventTransform {
    /// Client-space event, or `None` when the event cannot be mapped.
    fn transform(&self, raw: &RawPointerEvent) -> Option<MouseEvent>;
}

/// Which entry point opened the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Engine-level mouse capture (text selection drags).
    Mouse,
    /// Low-level capture installed directly (scrollbar drags).
    Raw,
}

/// The active capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSession {
    pub owner: ContainerId,
    pub kind: CaptureKind,
}

/// Result of routing one raw event.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// No capture is active; normal dispatch applies.
    NotCaptured,
    /// The event belongs to the session owner and has been mapped.
    Mapped { session: CaptureSession, event: MouseEvent },
    /// The event belongs to the session owner but could not be mapped.
    Dropped { session: CaptureSession },
    /// A session is active but the event is not the owner's; left untouched.
    Passthrough { session: CaptureSession },
}

/// Shared capture state and the per-container transform registry.
#[derive(Default)]
pub struct CaptureHub {
    session: Option<CaptureSession>,
    transforms: HashMap<ContainerId, Rc<dyn EventTransform>>,
}

impl std::fmt::Debug for CaptureHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureHub")
            .field("session", &self.session)
            .field("registered", &self.transforms.len())
            .finish()
    }
}

impl CaptureHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transform` for `container`.
    ///
    /// Returns `false` when this exact transform is already registered.
    /// A different transform replaces the previous one.
    pub fn register(&mut self, container: ContainerId, transform: Rc<dyn EventTransform>) -> bool {
        if let Some(existing) = self.transforms.get(&container)
            && Rc::ptr_eq(existing, &transform)
        {
            return false;
        }
        self.transforms.insert(container, transform);
        true
    }

    /// Drop `container`'s transform, releasing its session if it owns one.
    pub fn unregister(&mut self, container: ContainerId) {
        self.transforms.remove(&container);
        self.release_capture(container);
    }

    #[must_use]
    pub fn is_registered(&self, container: ContainerId) -> bool {
        self.transforms.contains_key(&container)
    }

    #[must_use]
    pub fn session(&self) -> Option<CaptureSession> {
        self.session
    }

    #[must_use]
    pub fn is_capturing(&self, container: ContainerId) -> bool {
        self.session.is_some_and(|s| s.owner == container)
    }

    /// Engine-level capture entry point.
    pub fn begin_mouse_capture(&mut self, owner: ContainerId) -> CaptureSession {
        self.open(owner, CaptureKind::Mouse)
    }

    /// Low-level capture entry point.
    pub fn install_capture(&mut self, owner: ContainerId) -> CaptureSession {
        self.open(owner, CaptureKind::Raw)
    }

    fn open(&mut self, owner: ContainerId, kind: CaptureKind) -> CaptureSession {
        if let Some(previous) = self.session
            && previous.owner != owner
        {
            debug!(previous = %previous.owner, %owner, "capture: session taken over");
        }
        let session = CaptureSession { owner, kind };
        self.session = Some(session);
        debug!(%owner, ?kind, "capture: begin");
        session
    }

    /// Release the session if `owner` holds it. Returns whether it did.
    pub fn release_capture(&mut self, owner: ContainerId) -> bool {
        if self.is_capturing(owner) {
            self.session = None;
            debug!(%owner, "capture: release");
            true
        } else {
            false
        }
    }

    /// Route a raw event through the active session.
    #[must_use]
    pub fn route(&self, raw: &RawPointerEvent) -> Routed {
        let Some(session) = self.session else {
            return Routed::NotCaptured;
        };
        if raw.target != session.owner {
            trace!(owner = %session.owner, target = %raw.target, "capture: passthrough");
            return Routed::Passthrough { session };
        }
        let Some(transform) = self.transforms.get(&session.owner) else {
            return Routed::Passthrough { session };
        };
        match transform.transform(raw) {
            Some(event) => Routed::Mapped { session, event },
            None => Routed::Dropped { session },
        }
    }
}

//! Keeps the surface texture in step with the text engine's view.
//!
//! DESIGN
//! ======
//! The bridge subscribes to the engine's renderer notifications. Handlers only
//! flip flags; the work happens in [`RenderSync::on_frame`], which the host
//! calls once per animation frame. Any number of `afterRender` notifications
//! between two frames costs one paint, and the notifying engine never waits on
//! the copy.
//!
//! `themeChange`, `resize` and `autosize` invalidate the cached scrollbar
//! track; it is recomputed on the next access.

#[cfg(test)]
#[path = "render_sync_test.rs"]
mod render_sync_test;

use std::cell::Cell;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::consts::{SCROLLBAR_MIN_THUMB_PX, SCROLLBAR_WIDTH_PX};
use crate::emitter::ListenerId;
use crate::engine::{AFTER_RENDER, AUTOSIZE, RESIZE, TextEngine, THEME_CHANGE};
use crate::geometry::Rect;
use crate::surface::Surface;

#[derive(Debug, Default)]
struct SyncFlags {
    repaint: Cell<bool>,
    overlay_stale: Cell<bool>,
}

/// Per-mesh render bridge state.
#[derive(Debug)]
pub struct RenderSync {
    flags: Rc<SyncFlags>,
    listeners: Vec<ListenerId>,
    track: Option<Rect>,
}

impl RenderSync {
    /// Subscribe to `engine`'s renderer notifications. A first paint is pending.
    pub fn attach(engine: &mut dyn TextEngine) -> Self {
        let flags = Rc::new(SyncFlags::default());
        flags.repaint.set(true);
        let renderer = engine.renderer();

        let mut listeners = Vec::with_capacity(4);
        let repaint = Rc::clone(&flags);
        listeners.push(renderer.on(AFTER_RENDER, move |_| {
            repaint.repaint.set(true);
            Ok(())
        }));
        for name in [THEME_CHANGE, RESIZE, AUTOSIZE] {
            let stale = Rc::clone(&flags);
            listeners.push(renderer.on(name, move |_| {
                stale.overlay_stale.set(true);
                stale.repaint.set(true);
                Ok(())
            }));
        }

        Self { flags, listeners, track: None }
    }

    /// Unsubscribe from `engine`; no handler of this bridge fires afterwards.
    pub fn detach(&mut self, engine: &mut dyn TextEngine) {
        let renderer = engine.renderer();
        for id in self.listeners.drain(..) {
            renderer.off(id);
        }
        self.flags.repaint.set(false);
        self.track = None;
    }

    pub fn request_repaint(&self) {
        self.flags.repaint.set(true);
    }

    pub fn invalidate_overlay(&self) {
        self.flags.overlay_stale.set(true);
    }

    #[must_use]
    pub fn is_repaint_pending(&self) -> bool {
        self.flags.repaint.get()
    }

    #[must_use]
    pub fn has_cached_overlay(&self) -> bool {
        self.track.is_some() && !self.flags.overlay_stale.get()
    }

    /// Paint into `surface` if a repaint is pending. Returns whether it painted.
    pub fn on_frame(&mut self, engine: &mut dyn TextEngine, surface: &mut Surface) -> bool {
        if !self.flags.repaint.replace(false) {
            return false;
        }
        if let Err(e) = engine.paint(surface) {
            warn!(error = %e, "render sync: paint failed");
            return false;
        }
        surface.mark_dirty();
        trace!(width = surface.width(), height = surface.height(), "render sync: painted");
        true
    }

    /// Scrollbar track in surface pixels, recomputed if stale.
    pub fn scrollbar_track(&mut self, width_px: u32, height_px: u32, layer_offset_y: f64) -> Option<Rect> {
        if self.flags.overlay_stale.replace(false) {
            self.track = None;
        }
        if self.track.is_none() {
            self.track = compute_track(width_px, height_px, layer_offset_y);
        }
        self.track
    }

    /// Scrollbar thumb in surface pixels, or `None` when nothing scrolls.
    pub fn scrollbar_thumb(
        &mut self,
        engine: &dyn TextEngine,
        width_px: u32,
        height_px: u32,
        layer_offset_y: f64,
    ) -> Option<Rect> {
        let track = self.scrollbar_track(width_px, height_px, layer_offset_y)?;
        let metrics = engine.scroll_metrics();
        if metrics.scroll_height <= metrics.viewport_height || metrics.scroll_height <= 0.0 {
            return None;
        }
        let height = (track.height * metrics.viewport_height / metrics.scroll_height)
            .clamp(SCROLLBAR_MIN_THUMB_PX.min(track.height), track.height);
        let travel = track.height - height;
        let max_scroll = metrics.max_scroll();
        let y = if max_scroll > 0.0 { track.y + travel * (metrics.scroll_top / max_scroll) } else { track.y };
        Some(Rect::new(track.x, y, track.width, height))
    }
}

fn compute_track(width_px: u32, height_px: u32, layer_offset_y: f64) -> Option<Rect> {
    let width = f64::from(width_px);
    let height = f64::from(height_px) - layer_offset_y;
    if width < SCROLLBAR_WIDTH_PX || height <= 0.0 {
        return None;
    }
    Some(Rect::new(width - SCROLLBAR_WIDTH_PX, layer_offset_y, SCROLLBAR_WIDTH_PX, height))
}

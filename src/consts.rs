//! Shared numeric constants for the editor mesh.

// ── Input ───────────────────────────────────────────────────────

/// Two presses closer together than this (milliseconds) form a double click.
pub const DOUBLE_CLICK_MS: f64 = 500.0;

// ── Surface ─────────────────────────────────────────────────────

/// Bytes per pixel in the backing buffer (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Default surface size in pixels when the host does not specify one.
pub const DEFAULT_SURFACE_PX: u32 = 400;

/// Largest surface side in pixels. Bounds the buffer at 256 MiB.
pub const MAX_SURFACE_PX: u32 = 8192;

/// Surface pixels per world unit along each axis of the quad.
pub const PIXELS_PER_UNIT: f32 = 400.0;

/// Width of the vertical scrollbar track in surface pixels.
pub const SCROLLBAR_WIDTH_PX: f64 = 12.0;

/// Thumbs never shrink below this many surface pixels.
pub const SCROLLBAR_MIN_THUMB_PX: f64 = 16.0;

// ── Alignment ───────────────────────────────────────────────────

/// Fraction of the frustum the quad may occupy after alignment.
pub const ALIGN_FILL: f32 = 0.9;

/// Lateral distance moved per alignment step, in world units.
pub const ALIGN_STEP: f32 = 0.05;

/// Hard cap on alignment iterations.
pub const ALIGN_MAX_STEPS: usize = 200;

/// Auto-alignment poll interval, in milliseconds.
pub const ALIGN_POLL_MS: u64 = 100;

/// Quiet period after the last viewer/mesh change before realigning, in milliseconds.
pub const ALIGN_DEBOUNCE_MS: u64 = 250;

/// Position/rotation deltas below this are not treated as movement.
pub const ALIGN_EPSILON: f32 = 1e-4;

//! Runtime tunables parsed from environment variables.
//!
//! Every knob has a compiled-in default from [`crate::consts`]; unset or
//! unparsable variables fall back to it silently.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts::{
    ALIGN_DEBOUNCE_MS, ALIGN_MAX_STEPS, ALIGN_POLL_MS, ALIGN_STEP, DOUBLE_CLICK_MS, PIXELS_PER_UNIT,
};

/// Tuning knobs shared by every editor mesh in a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Maximum gap between two presses that still counts as a double click.
    pub double_click_ms: f64,
    /// Surface pixels per world unit; converts `set_size` pixels into quad units.
    pub pixels_per_unit: f32,
    /// Lateral step used by one-shot alignment, in world units.
    pub align_step: f32,
    /// Upper bound on alignment iterations.
    pub align_max_steps: usize,
    /// Auto-alignment poll interval.
    pub align_poll_ms: u64,
    /// Debounce delay before an auto-alignment recompute runs.
    pub align_debounce_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            double_click_ms: DOUBLE_CLICK_MS,
            pixels_per_unit: PIXELS_PER_UNIT,
            align_step: ALIGN_STEP,
            align_max_steps: ALIGN_MAX_STEPS,
            align_poll_ms: ALIGN_POLL_MS,
            align_debounce_ms: ALIGN_DEBOUNCE_MS,
        }
    }
}

impl EditorConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `CODEMESH_DOUBLE_CLICK_MS`: default 500
    /// - `CODEMESH_PIXELS_PER_UNIT`: default 400
    /// - `CODEMESH_ALIGN_STEP`: default 0.05
    /// - `CODEMESH_ALIGN_MAX_STEPS`: default 200
    /// - `CODEMESH_ALIGN_POLL_MS`: default 100
    /// - `CODEMESH_ALIGN_DEBOUNCE_MS`: default 250
    #[must_use]
    pub fn from_env() -> Self {
        let pixels_per_unit = env_parse("CODEMESH_PIXELS_PER_UNIT", PIXELS_PER_UNIT);
        Self {
            double_click_ms: env_parse("CODEMESH_DOUBLE_CLICK_MS", DOUBLE_CLICK_MS),
            pixels_per_unit: if pixels_per_unit > 0.0 { pixels_per_unit } else { PIXELS_PER_UNIT },
            align_step: env_parse("CODEMESH_ALIGN_STEP", ALIGN_STEP),
            align_max_steps: env_parse("CODEMESH_ALIGN_MAX_STEPS", ALIGN_MAX_STEPS),
            align_poll_ms: env_parse("CODEMESH_ALIGN_POLL_MS", ALIGN_POLL_MS).max(1),
            align_debounce_ms: env_parse("CODEMESH_ALIGN_DEBOUNCE_MS", ALIGN_DEBOUNCE_MS),
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.align_poll_ms)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.align_debounce_ms)
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

//! Fixed-step scheduler
//!
//! Turns a variable frame delta into whole simulation steps. Consumers scale
//! per-step constants by the fixed `dt`, never by `render_dt`, so gameplay is
//! identical at any display refresh rate.

use crate::consts::{FIXED_STEP, MAX_FRAME_DELTA, MAX_STEPS, MIN_FRAME_DELTA};
use crate::settings::HarnessSettings;

/// Unconsumed wall-clock time, one per render loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedStepState {
    pub accumulator: f32,
}

impl FixedStepState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Result of one scheduler call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    /// Whole steps to simulate this frame (0 = render only)
    pub steps: u32,
    /// Per-step delta; 0 when `steps == 0`
    pub dt: f32,
    /// Clamped frame delta
    pub render_dt: f32,
}

/// Consume a frame delta with the default clamp bounds
pub fn consume_fixed_step(
    state: &mut FixedStepState,
    frame_delta: f32,
    fixed_step: f32,
    max_steps: u32,
) -> FixedStep {
    consume_clamped(
        state,
        frame_delta,
        fixed_step,
        max_steps,
        MIN_FRAME_DELTA,
        MAX_FRAME_DELTA,
    )
}

/// Consume a frame delta using step size and clamp bounds from settings
pub fn consume_with(
    state: &mut FixedStepState,
    frame_delta: f32,
    settings: &HarnessSettings,
) -> FixedStep {
    consume_clamped(
        state,
        frame_delta,
        settings.fixed_step,
        settings.max_steps,
        settings.min_frame_delta,
        settings.max_frame_delta,
    )
}

fn consume_clamped(
    state: &mut FixedStepState,
    frame_delta: f32,
    fixed_step: f32,
    max_steps: u32,
    min_delta: f32,
    max_delta: f32,
) -> FixedStep {
    let fixed_step = if fixed_step > 0.0 { fixed_step } else { FIXED_STEP };
    let max_steps = if max_steps > 0 { max_steps } else { MAX_STEPS };
    let min_delta = if min_delta.is_finite() { min_delta } else { MIN_FRAME_DELTA };
    let max_delta = if max_delta.is_finite() { max_delta } else { MAX_FRAME_DELTA };
    // Inverted bounds are swapped rather than trusted
    let (min_delta, max_delta) = (min_delta.min(max_delta), min_delta.max(max_delta));

    // NaN / inf deltas count as the shortest frame
    let frame_delta = if frame_delta.is_finite() {
        frame_delta
    } else {
        min_delta
    };
    let render_dt = frame_delta.clamp(min_delta, max_delta);

    // Cap backlog so a stall cannot queue unbounded catch-up
    let cap = fixed_step * max_steps as f32;
    state.accumulator = (state.accumulator + render_dt).min(cap);

    let steps = ((state.accumulator / fixed_step).floor() as u32).min(max_steps);
    state.accumulator = (state.accumulator - steps as f32 * fixed_step).max(0.0);

    FixedStep {
        steps,
        dt: if steps > 0 { fixed_step } else { 0.0 },
        render_dt,
    }
}

//! Simulation contract
//!
//! Every game implements this trait identically. The harness owns the run
//! lifecycle and pacing; a game only reacts to `RuntimeTuning` and input.

use super::frame::Frame;
use super::state::{SimBase, SimInput};
use crate::error::ArcadeError;
use crate::games::GameId;

pub trait Simulation {
    fn game(&self) -> GameId;

    /// Reset to a fresh run: new entity collections, RNG seeded from `seed`,
    /// tuning sampled at t = 0 with no chunk selected.
    fn init(&mut self, seed: u64, width: f32, height: f32) -> Result<(), ArcadeError>;

    /// Advance one fixed step. Tuning has already been advanced for this step.
    /// Sets `base.dead` (and `base.note`) when the run is lost.
    fn update(&mut self, dt: f32, input: &SimInput, width: f32, height: f32);

    /// Append this state's primitives. Must not mutate the simulation.
    fn draw(&self, frame: &mut Frame, width: f32, height: f32);

    fn base(&self) -> &SimBase;

    fn base_mut(&mut self) -> &mut SimBase;
}

//! Deterministic simulation module
//!
//! Everything a game needs to advance one run:
//! - Fixed timestep only (see `scheduler`)
//! - Seeded RNG owned by the run, never shared
//! - Runtime tuning resampled every step before `update`
//! - No rendering or platform dependencies; `draw` fills a plain draw list

pub mod collision;
pub mod contract;
pub mod frame;
pub mod scheduler;
pub mod state;

pub use collision::{Aabb, circle_aabb_overlap, circle_circle_overlap};
pub use contract::Simulation;
pub use frame::{DrawCommand, Frame, Paint, Shape};
pub use scheduler::{FixedStep, FixedStepState, consume_fixed_step, consume_with};
pub use state::{ActiveChunk, RuntimeTuning, SimBase, SimInput};

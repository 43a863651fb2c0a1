//! Pulse Arcade - shared pacing engine for one-input endless games
//!
//! Core modules:
//! - `pacing`: Difficulty ramps, onboarding survivability, chunk library and selector
//! - `sim`: Fixed-step scheduling, simulation contract, runtime tuning, draw list
//! - `harness`: Run lifecycle (ready / playing / game over), input buffer, HUD
//! - `games`: Static game table and the four gameplay skins
//! - `persistence`: Key/value storage for best scores and currency
//! - `settings`: Data-driven harness configuration

pub mod error;
pub mod games;
pub mod harness;
pub mod highscores;
pub mod pacing;
pub mod persistence;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::ArcadeError;
pub use games::{ArcadeSim, GameId, GameSpec};
pub use harness::{HarnessEvent, HarnessObserver, HudSnapshot, Key, RuntimeHarness, RunPhase};
pub use highscores::ScoreBook;
pub use settings::HarnessSettings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP: f32 = 1.0 / 60.0;
    /// Maximum steps per frame to prevent spiral of death
    pub const MAX_STEPS: u32 = 5;

    /// Frame delta clamp (seconds). Absorbs tab-backgrounding stalls.
    pub const MIN_FRAME_DELTA: f32 = 0.001;
    pub const MAX_FRAME_DELTA: f32 = 0.05;

    /// Shortest time a chunk stays active before reselection
    pub const MIN_CHUNK_SECONDS: f32 = 0.75;

    /// Highest chunk tier
    pub const MAX_TIER: u8 = 4;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(PI + 0.5) - (0.5 - PI)).abs() < 1e-5);
        assert!((normalize_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert_eq!(normalize_angle(PI), -PI);
    }

    #[test]
    fn test_normalize_angle_long_orbit() {
        // Tens of thousands of turns, as a long spiral run accumulates
        let angle = 0.25 + 40_000.0 * TAU;
        let wrapped = normalize_angle(angle);
        assert!((-PI..PI).contains(&wrapped));
        let expected = angle.rem_euclid(TAU);
        assert!((wrapped - expected).abs() < 0.05);
    }
}

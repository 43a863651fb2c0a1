//! Difficulty ramp model
//!
//! Three knobs evolve independently with elapsed session time. Ramps are
//! static config; only the sample derived from elapsed time changes.

use serde::{Deserialize, Serialize};

use super::curve::{approach_progress, exp_approach};

/// Named ramp profiles. Each game references exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkProfile {
    LaneSwitch,
    LaneDrift,
    Parry,
    Guard,
    WaveRide,
    TideSkim,
    Spiral,
    Vortex,
}

impl ChunkProfile {
    pub const ALL: [ChunkProfile; 8] = [
        ChunkProfile::LaneSwitch,
        ChunkProfile::LaneDrift,
        ChunkProfile::Parry,
        ChunkProfile::Guard,
        ChunkProfile::WaveRide,
        ChunkProfile::TideSkim,
        ChunkProfile::Spiral,
        ChunkProfile::Vortex,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ChunkProfile::LaneSwitch => "lane-switch",
            ChunkProfile::LaneDrift => "lane-drift",
            ChunkProfile::Parry => "parry",
            ChunkProfile::Guard => "guard",
            ChunkProfile::WaveRide => "wave-ride",
            ChunkProfile::TideSkim => "tide-skim",
            ChunkProfile::Spiral => "spiral",
            ChunkProfile::Vortex => "vortex",
        }
    }

    /// Static ramp for this profile
    pub fn ramp(&self) -> &'static DifficultyRamp {
        match self {
            ChunkProfile::LaneSwitch => &LANE_SWITCH,
            ChunkProfile::LaneDrift => &LANE_DRIFT,
            ChunkProfile::Parry => &PARRY,
            ChunkProfile::Guard => &GUARD,
            ChunkProfile::WaveRide => &WAVE_RIDE,
            ChunkProfile::TideSkim => &TIDE_SKIM,
            ChunkProfile::Spiral => &SPIRAL,
            ChunkProfile::Vortex => &VORTEX,
        }
    }
}

/// Start / asymptote pairs plus a time constant per knob
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyRamp {
    pub speed_start: f32,
    pub speed_max: f32,
    pub event_rate_start: f32,
    pub event_rate_max: f32,
    pub decision_window_start_ms: f32,
    pub decision_window_min_ms: f32,
    pub speed_tau_seconds: f32,
    pub event_rate_tau_seconds: f32,
    pub decision_window_tau_seconds: f32,
}

/// Difficulty at one instant of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySample {
    /// World units per second (radians per second for orbit skins)
    pub speed: f32,
    /// Hazard bursts per second
    pub event_rate: f32,
    /// Reaction budget once a hazard becomes actionable
    pub decision_window_ms: f32,
}

impl DifficultyRamp {
    pub fn sample(&self, elapsed_seconds: f32) -> DifficultySample {
        DifficultySample {
            speed: exp_approach(
                self.speed_start,
                self.speed_max,
                elapsed_seconds,
                self.speed_tau_seconds,
            ),
            event_rate: exp_approach(
                self.event_rate_start,
                self.event_rate_max,
                elapsed_seconds,
                self.event_rate_tau_seconds,
            ),
            decision_window_ms: exp_approach(
                self.decision_window_start_ms,
                self.decision_window_min_ms,
                elapsed_seconds,
                self.decision_window_tau_seconds,
            ),
        }
    }

    /// Mean ramp progress of the three knobs, in [0, 1].
    ///
    /// Feeds the chunk selector as its target intensity.
    pub fn intensity_at(&self, elapsed_seconds: f32) -> f32 {
        let progress = approach_progress(elapsed_seconds, self.speed_tau_seconds)
            + approach_progress(elapsed_seconds, self.event_rate_tau_seconds)
            + approach_progress(elapsed_seconds, self.decision_window_tau_seconds);
        (progress / 3.0).clamp(0.0, 1.0)
    }
}

/// Sample a profile's ramp at `elapsed_seconds`
pub fn sample_difficulty(profile: ChunkProfile, elapsed_seconds: f32) -> DifficultySample {
    profile.ramp().sample(elapsed_seconds)
}

const LANE_SWITCH: DifficultyRamp = DifficultyRamp {
    speed_start: 6.5,
    speed_max: 11.5,
    event_rate_start: 0.9,
    event_rate_max: 2.2,
    decision_window_start_ms: 780.0,
    decision_window_min_ms: 360.0,
    speed_tau_seconds: 85.0,
    event_rate_tau_seconds: 110.0,
    decision_window_tau_seconds: 120.0,
};

const LANE_DRIFT: DifficultyRamp = DifficultyRamp {
    speed_start: 5.5,
    speed_max: 10.0,
    event_rate_start: 0.8,
    event_rate_max: 2.0,
    decision_window_start_ms: 820.0,
    decision_window_min_ms: 380.0,
    speed_tau_seconds: 95.0,
    event_rate_tau_seconds: 120.0,
    decision_window_tau_seconds: 130.0,
};

const PARRY: DifficultyRamp = DifficultyRamp {
    speed_start: 4.0,
    speed_max: 8.0,
    event_rate_start: 0.7,
    event_rate_max: 1.8,
    decision_window_start_ms: 520.0,
    decision_window_min_ms: 240.0,
    speed_tau_seconds: 90.0,
    event_rate_tau_seconds: 100.0,
    decision_window_tau_seconds: 110.0,
};

const GUARD: DifficultyRamp = DifficultyRamp {
    speed_start: 3.6,
    speed_max: 7.2,
    event_rate_start: 0.6,
    event_rate_max: 1.6,
    decision_window_start_ms: 560.0,
    decision_window_min_ms: 260.0,
    speed_tau_seconds: 100.0,
    event_rate_tau_seconds: 115.0,
    decision_window_tau_seconds: 125.0,
};

const WAVE_RIDE: DifficultyRamp = DifficultyRamp {
    speed_start: 4.2,
    speed_max: 7.6,
    event_rate_start: 0.5,
    event_rate_max: 1.4,
    decision_window_start_ms: 700.0,
    decision_window_min_ms: 340.0,
    speed_tau_seconds: 80.0,
    event_rate_tau_seconds: 95.0,
    decision_window_tau_seconds: 110.0,
};

const TIDE_SKIM: DifficultyRamp = DifficultyRamp {
    speed_start: 3.8,
    speed_max: 7.0,
    event_rate_start: 0.45,
    event_rate_max: 1.3,
    decision_window_start_ms: 760.0,
    decision_window_min_ms: 360.0,
    speed_tau_seconds: 95.0,
    event_rate_tau_seconds: 105.0,
    decision_window_tau_seconds: 120.0,
};

// Orbit skins: speed is angular (rad/s)
const SPIRAL: DifficultyRamp = DifficultyRamp {
    speed_start: 1.4,
    speed_max: 2.6,
    event_rate_start: 0.8,
    event_rate_max: 2.0,
    decision_window_start_ms: 640.0,
    decision_window_min_ms: 300.0,
    speed_tau_seconds: 75.0,
    event_rate_tau_seconds: 90.0,
    decision_window_tau_seconds: 100.0,
};

const VORTEX: DifficultyRamp = DifficultyRamp {
    speed_start: 1.2,
    speed_max: 2.4,
    event_rate_start: 0.7,
    event_rate_max: 1.8,
    decision_window_start_ms: 680.0,
    decision_window_min_ms: 320.0,
    speed_tau_seconds: 85.0,
    event_rate_tau_seconds: 100.0,
    decision_window_tau_seconds: 110.0,
};

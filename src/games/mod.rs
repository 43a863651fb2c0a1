//! Game table and gameplay skins
//!
//! The arcade is a closed set of game ids. Each id names its input kind, ramp
//! profile, fail condition, onboarding tuning and the skin that plays it.
//! Skins are thin: they spawn hazards/rewards from `RuntimeTuning` and check
//! kinematic collisions. All pacing decisions happen upstream.

pub mod lane;
pub mod parry;
pub mod spiral;
pub mod wave;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use lane::LaneSim;
pub use parry::ParrySim;
pub use spiral::SpiralSim;
pub use wave::WaveSim;

use crate::error::ArcadeError;
use crate::pacing::{ChunkProfile, SurvivabilityProfile};
use crate::sim::{Frame, RuntimeTuning, SimBase, SimInput, Simulation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    LaneDash,
    LaneDrift,
    PulseParry,
    EchoGuard,
    WaveRider,
    TideSkimmer,
    SpiralRun,
    VortexDive,
}

impl GameId {
    pub const ALL: [GameId; 8] = [
        GameId::LaneDash,
        GameId::LaneDrift,
        GameId::PulseParry,
        GameId::EchoGuard,
        GameId::WaveRider,
        GameId::TideSkimmer,
        GameId::SpiralRun,
        GameId::VortexDive,
    ];

    pub fn as_str(&self) -> &'static str {
        self.spec().key
    }

    /// Position in `ALL`
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn spec(&self) -> &'static GameSpec {
        &GAME_SPECS[self.index()]
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameId {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        GAME_SPECS
            .iter()
            .find(|spec| spec.key == key)
            .map(|spec| spec.id)
            .ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }
}

/// How the single input is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Press edges only
    Tap,
    /// Press and release edges, plus the held level
    Hold,
    /// Pointer position
    Drag,
}

/// What ends a run, for HUD copy and analytics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailCondition {
    Collision,
    MissedTiming,
    OutOfBounds,
}

/// Gameplay family that simulates and draws a game id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    Lane,
    Parry,
    Wave,
    Spiral,
}

/// Static per-game configuration
#[derive(Debug, Clone, Serialize)]
pub struct GameSpec {
    pub id: GameId,
    pub key: &'static str,
    pub title: &'static str,
    /// Action word used in chunk pattern names
    pub verb: &'static str,
    pub input: InputKind,
    pub chunk_profile: ChunkProfile,
    pub fail_condition: FailCondition,
    pub skin: Skin,
    pub survivability: SurvivabilityProfile,
}

/// The game table, indexed by `GameId::index`
pub static GAME_SPECS: [GameSpec; 8] = [
    GameSpec {
        id: GameId::LaneDash,
        key: "lane-dash",
        title: "Lane Dash",
        verb: "Dodge",
        input: InputKind::Tap,
        chunk_profile: ChunkProfile::LaneSwitch,
        fail_condition: FailCondition::Collision,
        skin: Skin::Lane,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 18.0,
            early_intensity_scale: 0.6,
            early_tier_offset: 1.5,
            low_tier_weight_boost: 1.8,
            telegraph_boost: 0.4,
            decision_window_boost: 0.35,
            early_hazard_scale: 0.5,
        },
    },
    GameSpec {
        id: GameId::LaneDrift,
        key: "lane-drift",
        title: "Lane Drift",
        verb: "Drift",
        input: InputKind::Drag,
        chunk_profile: ChunkProfile::LaneDrift,
        fail_condition: FailCondition::Collision,
        skin: Skin::Lane,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 20.0,
            early_intensity_scale: 0.65,
            early_tier_offset: 1.2,
            low_tier_weight_boost: 1.6,
            telegraph_boost: 0.35,
            decision_window_boost: 0.3,
            early_hazard_scale: 0.55,
        },
    },
    GameSpec {
        id: GameId::PulseParry,
        key: "pulse-parry",
        title: "Pulse Parry",
        verb: "Parry",
        input: InputKind::Tap,
        chunk_profile: ChunkProfile::Parry,
        fail_condition: FailCondition::MissedTiming,
        skin: Skin::Parry,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 16.0,
            early_intensity_scale: 0.7,
            early_tier_offset: 1.0,
            low_tier_weight_boost: 1.5,
            telegraph_boost: 0.5,
            decision_window_boost: 0.45,
            early_hazard_scale: 0.6,
        },
    },
    GameSpec {
        id: GameId::EchoGuard,
        key: "echo-guard",
        title: "Echo Guard",
        verb: "Guard",
        input: InputKind::Hold,
        chunk_profile: ChunkProfile::Guard,
        fail_condition: FailCondition::MissedTiming,
        skin: Skin::Parry,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 18.0,
            early_intensity_scale: 0.7,
            early_tier_offset: 1.2,
            low_tier_weight_boost: 1.6,
            telegraph_boost: 0.5,
            decision_window_boost: 0.5,
            early_hazard_scale: 0.6,
        },
    },
    GameSpec {
        id: GameId::WaveRider,
        key: "wave-rider",
        title: "Wave Rider",
        verb: "Ride",
        input: InputKind::Hold,
        chunk_profile: ChunkProfile::WaveRide,
        fail_condition: FailCondition::OutOfBounds,
        skin: Skin::Wave,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 22.0,
            early_intensity_scale: 0.6,
            early_tier_offset: 1.5,
            low_tier_weight_boost: 1.7,
            telegraph_boost: 0.3,
            decision_window_boost: 0.4,
            early_hazard_scale: 0.5,
        },
    },
    GameSpec {
        id: GameId::TideSkimmer,
        key: "tide-skimmer",
        title: "Tide Skimmer",
        verb: "Skim",
        input: InputKind::Drag,
        chunk_profile: ChunkProfile::TideSkim,
        fail_condition: FailCondition::Collision,
        skin: Skin::Wave,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 24.0,
            early_intensity_scale: 0.6,
            early_tier_offset: 1.6,
            low_tier_weight_boost: 1.8,
            telegraph_boost: 0.3,
            decision_window_boost: 0.4,
            early_hazard_scale: 0.5,
        },
    },
    GameSpec {
        id: GameId::SpiralRun,
        key: "spiral-run",
        title: "Spiral Run",
        verb: "Spin",
        input: InputKind::Tap,
        chunk_profile: ChunkProfile::Spiral,
        fail_condition: FailCondition::Collision,
        skin: Skin::Spiral,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 18.0,
            early_intensity_scale: 0.65,
            early_tier_offset: 1.3,
            low_tier_weight_boost: 1.6,
            telegraph_boost: 0.45,
            decision_window_boost: 0.35,
            early_hazard_scale: 0.55,
        },
    },
    GameSpec {
        id: GameId::VortexDive,
        key: "vortex-dive",
        title: "Vortex Dive",
        verb: "Dive",
        input: InputKind::Hold,
        chunk_profile: ChunkProfile::Vortex,
        fail_condition: FailCondition::Collision,
        skin: Skin::Spiral,
        survivability: SurvivabilityProfile {
            onboarding_seconds: 20.0,
            early_intensity_scale: 0.65,
            early_tier_offset: 1.4,
            low_tier_weight_boost: 1.7,
            telegraph_boost: 0.45,
            decision_window_boost: 0.4,
            early_hazard_scale: 0.55,
        },
    },
];

/// Delay before the first hazard burst of a run (seconds)
pub(crate) const FIRST_BURST_DELAY: f32 = 1.0;

/// Counts down to the next hazard burst at the tuning's event rate
#[derive(Debug, Clone)]
pub(crate) struct BurstClock {
    timer: f32,
}

impl Default for BurstClock {
    fn default() -> Self {
        Self {
            timer: FIRST_BURST_DELAY,
        }
    }
}

impl BurstClock {
    /// True when a burst is due this step
    pub(crate) fn tick(&mut self, dt: f32, tuning: &RuntimeTuning) -> bool {
        self.timer -= dt;
        if self.timer > 0.0 {
            return false;
        }
        let interval = 1.0 / tuning.effective_event_rate().max(0.05);
        self.timer = (self.timer + interval).max(dt);
        true
    }
}

/// Coin value for a reward placement
pub(crate) const SAFE_COIN_VALUE: u32 = 1;
pub(crate) const RISK_COIN_VALUE: u32 = 2;

/// Closed set of playable simulations
#[derive(Debug, Clone)]
pub enum ArcadeSim {
    Lane(LaneSim),
    Parry(ParrySim),
    Wave(WaveSim),
    Spiral(SpiralSim),
}

impl ArcadeSim {
    /// Build and initialize the skin for a game
    pub fn new(game: GameId, seed: u64, width: f32, height: f32) -> Result<Self, ArcadeError> {
        let mut sim = Self::allocate(game, seed)?;
        sim.init(seed, width, height)?;
        Ok(sim)
    }

    /// Build the skin without running `init`; the owner is expected to call it
    pub fn allocate(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(match game.spec().skin {
            Skin::Lane => ArcadeSim::Lane(LaneSim::new(game, seed)?),
            Skin::Parry => ArcadeSim::Parry(ParrySim::new(game, seed)?),
            Skin::Wave => ArcadeSim::Wave(WaveSim::new(game, seed)?),
            Skin::Spiral => ArcadeSim::Spiral(SpiralSim::new(game, seed)?),
        })
    }
}

macro_rules! each_skin {
    ($self:expr, $sim:ident => $body:expr) => {
        match $self {
            ArcadeSim::Lane($sim) => $body,
            ArcadeSim::Parry($sim) => $body,
            ArcadeSim::Wave($sim) => $body,
            ArcadeSim::Spiral($sim) => $body,
        }
    };
}

impl Simulation for ArcadeSim {
    fn game(&self) -> GameId {
        each_skin!(self, sim => sim.game())
    }

    fn init(&mut self, seed: u64, width: f32, height: f32) -> Result<(), ArcadeError> {
        each_skin!(self, sim => sim.init(seed, width, height))
    }

    fn update(&mut self, dt: f32, input: &SimInput, width: f32, height: f32) {
        each_skin!(self, sim => sim.update(dt, input, width, height))
    }

    fn draw(&self, frame: &mut Frame, width: f32, height: f32) {
        each_skin!(self, sim => sim.draw(frame, width, height))
    }

    fn base(&self) -> &SimBase {
        each_skin!(self, sim => sim.base())
    }

    fn base_mut(&mut self) -> &mut SimBase {
        each_skin!(self, sim => sim.base_mut())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::consts::{FIXED_STEP, MIN_CHUNK_SECONDS};

    /// Drive a simulation the way the harness does while playing
    pub(crate) fn run_steps<S: Simulation>(sim: &mut S, steps: u32, mut input: impl FnMut(u32, &S) -> SimInput) {
        for i in 0..steps {
            if sim.base().dead {
                break;
            }
            let step_input = input(i, sim);
            let base = sim.base_mut();
            base.t += FIXED_STEP;
            base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
            sim.update(FIXED_STEP, &step_input, 800.0, 600.0);
        }
    }
}

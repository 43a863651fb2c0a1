//! Shared run state and runtime tuning
//!
//! `SimBase` holds the fields every game carries. Game-specific entities live
//! in each game's own struct next to an embedded `SimBase`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::ArcadeError;
use crate::games::{GameId, GameSpec};
use crate::pacing::{
    ChunkLibrary, DifficultySample, GameChunkPatternTemplate, RewardMode, SurvivabilitySample,
    chunk_library, pick_pattern_chunk_for_survivability,
};

/// Input snapshot for one simulation step
///
/// `tap` / `release` are edges: true for exactly one step per physical
/// press / release. `down` is level-triggered. `x` / `y` are normalized to
/// the canvas (0..1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SimInput {
    pub tap: bool,
    pub release: bool,
    pub down: bool,
    pub x: f32,
    pub y: f32,
}

impl SimInput {
    /// Same levels, edges cleared
    pub fn without_edges(self) -> Self {
        Self {
            tap: false,
            release: false,
            ..self
        }
    }
}

/// The chunk currently driving content
#[derive(Debug, Clone, Copy)]
pub struct ActiveChunk {
    pub pattern: &'static GameChunkPatternTemplate,
    /// Left/right reflected for this play-through
    pub mirrored: bool,
}

/// Per-session pacing state read by `update`
#[derive(Debug, Clone)]
pub struct RuntimeTuning {
    pub spec: &'static GameSpec,
    pub library: &'static ChunkLibrary,
    /// `None` until the first step selects one
    pub chunk: Option<ActiveChunk>,
    pub chunk_time_left: f32,
    pub difficulty: DifficultySample,
    pub survivability: SurvivabilitySample,
    pub elapsed_seconds: f32,
    pub chunks_played: u32,
}

impl RuntimeTuning {
    /// Initial snapshot: models sampled at t = 0, no chunk selected yet
    pub fn new(game: GameId) -> Result<Self, ArcadeError> {
        Self::with_library(game.spec(), chunk_library(game))
    }

    pub fn with_library(
        spec: &'static GameSpec,
        library: &'static ChunkLibrary,
    ) -> Result<Self, ArcadeError> {
        if library.is_empty() {
            return Err(ArcadeError::EmptyLibrary { game: spec.id });
        }
        Ok(Self {
            spec,
            library,
            chunk: None,
            chunk_time_left: 0.0,
            difficulty: spec.chunk_profile.ramp().sample(0.0),
            survivability: spec.survivability.sample(0.0),
            elapsed_seconds: 0.0,
            chunks_played: 0,
        })
    }

    /// Advance pacing by one step.
    ///
    /// Resamples difficulty and survivability, counts down the active chunk
    /// and picks a new one when it runs out (or none is active yet). Returns
    /// the newly selected pattern, if any.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        min_chunk_seconds: f32,
    ) -> Result<Option<&'static GameChunkPatternTemplate>, ArcadeError> {
        self.elapsed_seconds += dt;
        self.difficulty = self.spec.chunk_profile.ramp().sample(self.elapsed_seconds);
        self.survivability = self.spec.survivability.sample(self.elapsed_seconds);
        self.chunk_time_left -= dt;

        if self.chunk.is_some() && self.chunk_time_left > 0.0 {
            return Ok(None);
        }

        let library: &'static ChunkLibrary = self.library;
        let pattern = pick_pattern_chunk_for_survivability(
            self.spec.id,
            library.patterns(),
            rng,
            self.intensity(),
            self.elapsed_seconds,
        )?;
        let mirrored = pattern.template.mirrorable && rng.random_bool(0.5);

        self.chunk = Some(ActiveChunk { pattern, mirrored });
        self.chunk_time_left = pattern.template.duration_seconds.max(min_chunk_seconds);
        self.chunks_played += 1;

        log::debug!(
            "{}: chunk {} '{}' tier {} (t={:.1}s, onboarding={:.2}, mirrored={})",
            self.spec.id,
            pattern.template.id,
            pattern.pattern_name,
            pattern.tier(),
            self.elapsed_seconds,
            self.survivability.onboarding,
            mirrored
        );

        Ok(Some(pattern))
    }

    /// Selector target intensity at the current elapsed time
    pub fn intensity(&self) -> f32 {
        self.spec.chunk_profile.ramp().intensity_at(self.elapsed_seconds)
    }

    pub fn pattern(&self) -> Option<&'static GameChunkPatternTemplate> {
        self.chunk.map(|c| c.pattern)
    }

    pub fn is_mirrored(&self) -> bool {
        self.chunk.is_some_and(|c| c.mirrored)
    }

    /// Reflect a normalized lateral coordinate when the chunk is mirrored
    pub fn mirror(&self, x: f32) -> f32 {
        if self.is_mirrored() { 1.0 - x } else { x }
    }

    pub fn effective_speed(&self) -> f32 {
        self.difficulty.speed * self.survivability.intensity_scale
    }

    /// Hazard bursts per second
    pub fn effective_event_rate(&self) -> f32 {
        self.difficulty.event_rate * self.survivability.intensity_scale
    }

    pub fn effective_telegraph_seconds(&self) -> f32 {
        let base_ms = match self.pattern() {
            Some(p) => p.template.telegraph_ms,
            None => self.difficulty.decision_window_ms,
        };
        base_ms * self.survivability.telegraph_scale / 1000.0
    }

    pub fn effective_decision_window_seconds(&self) -> f32 {
        let base_ms = match self.pattern() {
            Some(p) => p.template.decision_window_ms.min(self.difficulty.decision_window_ms),
            None => self.difficulty.decision_window_ms,
        };
        base_ms * self.survivability.decision_window_scale / 1000.0
    }

    /// Hazards per burst. Zero only for hazard-free chunks.
    pub fn effective_hazard_count(&self) -> u32 {
        let count = self.pattern().map_or(1, |p| p.template.hazard_count);
        if count == 0 {
            return 0;
        }
        ((count as f32 * self.survivability.hazard_scale).round() as u32).max(1)
    }

    pub fn reward_mode(&self) -> RewardMode {
        self.pattern()
            .map_or(RewardMode::None, |p| p.template.reward_mode)
    }
}

/// Fields shared by every game's run state
#[derive(Debug, Clone)]
pub struct SimBase {
    pub seed: u64,
    pub score: u64,
    /// Sticky once set
    pub dead: bool,
    /// Free-text HUD hint
    pub note: String,
    /// Elapsed sim seconds
    pub t: f32,
    pub rng: Pcg32,
    pub tuning: RuntimeTuning,
    /// Rewards collected this run
    pub coins: u32,
}

impl SimBase {
    pub fn new(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(Self {
            seed,
            score: 0,
            dead: false,
            note: String::new(),
            t: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            tuning: RuntimeTuning::new(game)?,
            coins: 0,
        })
    }

    /// End the run. The first cause wins.
    pub fn kill(&mut self, note: impl Into<String>) {
        if !self.dead {
            self.dead = true;
            self.note = note.into();
        }
    }

    pub fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn penalize(&mut self, points: u64) {
        self.score = self.score.saturating_sub(points);
    }

    pub fn collect_coin(&mut self, value: u32) {
        self.coins = self.coins.saturating_add(value);
    }

    /// Uniform sample in [0, 1)
    pub fn random(&mut self) -> f32 {
        self.rng.random()
    }

    /// Advance pacing by one step using this run's RNG
    pub fn advance_tuning(
        &mut self,
        dt: f32,
        min_chunk_seconds: f32,
    ) -> Result<Option<&'static GameChunkPatternTemplate>, ArcadeError> {
        self.tuning.advance(dt, &mut self.rng, min_chunk_seconds)
    }
}

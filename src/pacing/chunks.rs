//! Chunk templates and per-game pattern libraries
//!
//! A chunk is one timed beat of content: how many hazards, how long they are
//! telegraphed, how long the player has to react. Templates are shared by all
//! games; each game decorates them with its own verb to form its library.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::games::GameId;

/// Reward placement for a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardMode {
    /// No reward spawns
    None,
    /// Reward away from the hazards
    Safe,
    /// Reward next to a hazard, worth more
    Risk,
}

/// Immutable content-shape descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkTemplate {
    pub id: &'static str,
    pub title: &'static str,
    /// 0 (gentlest) to 4 (hardest)
    pub tier: u8,
    pub duration_seconds: f32,
    /// Warning time before a hazard turns lethal
    pub telegraph_ms: f32,
    /// Time the player has to react correctly
    pub decision_window_ms: f32,
    pub hazard_count: u32,
    pub reward_mode: RewardMode,
    /// Left/right reflection is valid
    pub mirrorable: bool,
    /// Breathing-room beat, favoured during onboarding
    pub recovery: bool,
}

#[allow(clippy::too_many_arguments)]
const fn template(
    id: &'static str,
    title: &'static str,
    tier: u8,
    duration_seconds: f32,
    telegraph_ms: f32,
    decision_window_ms: f32,
    hazard_count: u32,
    reward_mode: RewardMode,
    mirrorable: bool,
) -> ChunkTemplate {
    ChunkTemplate {
        id,
        title,
        tier,
        duration_seconds,
        telegraph_ms,
        decision_window_ms,
        hazard_count,
        reward_mode,
        mirrorable,
        recovery: false,
    }
}

/// Shared template table, ascending tier
pub static CHUNK_TEMPLATES: [ChunkTemplate; 12] = [
    template("C01", "Warmup Line", 0, 6.0, 900.0, 800.0, 1, RewardMode::Safe, true),
    template("C02", "Open Drift", 0, 5.5, 850.0, 750.0, 1, RewardMode::Safe, false),
    template("C03", "Single Stagger", 1, 5.0, 750.0, 650.0, 2, RewardMode::Safe, true),
    template("C04", "Double Step", 1, 5.0, 700.0, 600.0, 2, RewardMode::Risk, true),
    template("C05", "Zigzag", 2, 4.5, 600.0, 520.0, 3, RewardMode::Safe, true),
    template("C06", "Crossfire", 2, 4.5, 560.0, 500.0, 3, RewardMode::Risk, true),
    template("C07", "Pinch", 2, 4.0, 540.0, 480.0, 3, RewardMode::None, false),
    template("C08", "Gauntlet", 3, 4.0, 480.0, 420.0, 4, RewardMode::Risk, true),
    template("C09", "Rapid Weave", 3, 3.5, 450.0, 400.0, 4, RewardMode::None, true),
    template("C10", "Storm Wall", 4, 3.5, 400.0, 360.0, 5, RewardMode::Risk, false),
    template("C11", "Endgame Rush", 4, 3.0, 380.0, 340.0, 5, RewardMode::None, true),
    ChunkTemplate {
        recovery: true,
        ..template("C12", "Breather", 0, 4.0, 1000.0, 900.0, 0, RewardMode::Safe, false)
    },
];

/// A shared template decorated for one game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameChunkPatternTemplate {
    pub template: &'static ChunkTemplate,
    pub game: GameId,
    pub verb: &'static str,
    pub pattern_name: String,
}

impl GameChunkPatternTemplate {
    pub fn new(game: GameId, template: &'static ChunkTemplate) -> Self {
        let verb = game.spec().verb;
        Self {
            template,
            game,
            verb,
            pattern_name: format!("{} {}", verb, template.title),
        }
    }

    #[inline]
    pub fn tier(&self) -> u8 {
        self.template.tier
    }
}

/// Ordered, read-only pattern list for one game
#[derive(Debug, Clone)]
pub struct ChunkLibrary {
    game: GameId,
    patterns: Vec<GameChunkPatternTemplate>,
}

impl ChunkLibrary {
    /// Build a game's library from the shared template table
    pub fn build(game: GameId) -> Self {
        Self::from_templates(game, &CHUNK_TEMPLATES)
    }

    pub fn from_templates(game: GameId, templates: &'static [ChunkTemplate]) -> Self {
        Self {
            game,
            patterns: templates
                .iter()
                .map(|t| GameChunkPatternTemplate::new(game, t))
                .collect(),
        }
    }

    pub fn game(&self) -> GameId {
        self.game
    }

    pub fn patterns(&self) -> &[GameChunkPatternTemplate] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

static LIBRARIES: OnceLock<Vec<ChunkLibrary>> = OnceLock::new();

/// Process-wide library for a game, built on first use
pub fn chunk_library(game: GameId) -> &'static ChunkLibrary {
    let libraries = LIBRARIES.get_or_init(|| {
        log::debug!("Building chunk libraries for {} games", GameId::ALL.len());
        GameId::ALL.iter().map(|&g| ChunkLibrary::build(g)).collect()
    });
    &libraries[game.index()]
}

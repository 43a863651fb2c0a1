//! Pacing module
//!
//! Decides how hard the next beat of gameplay is and which content pattern
//! carries it. Everything here is a pure function of static tables, elapsed
//! session time and a caller-owned RNG:
//! - Difficulty ramps evolve speed / event rate / decision window
//! - Survivability damps all of it during onboarding
//! - The selector picks the next chunk pattern by tier-distance weighting

pub mod chunks;
pub mod curve;
pub mod difficulty;
pub mod selector;
pub mod survivability;

pub use chunks::{CHUNK_TEMPLATES, ChunkLibrary, ChunkTemplate, GameChunkPatternTemplate, RewardMode, chunk_library};
pub use curve::{exp_approach, lerp};
pub use difficulty::{ChunkProfile, DifficultyRamp, DifficultySample, sample_difficulty};
pub use selector::{chunk_weight, pick_pattern_chunk_for_survivability, select_weighted, target_tier};
pub use survivability::{SurvivabilityProfile, SurvivabilitySample, sample_survivability};

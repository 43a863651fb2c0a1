//! Survivability / onboarding model
//!
//! Damps difficulty for a fresh session. Every knob resolves to identity once
//! `onboarding_seconds` has elapsed and never re-arms within a session. This
//! is a pure function of elapsed time: resample every step, never cache.

use serde::{Deserialize, Serialize};

use super::curve::lerp;
use crate::games::GameId;

/// Per-game onboarding tuning (static config)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivabilityProfile {
    pub onboarding_seconds: f32,
    /// Multiplier on effective difficulty at t = 0 (< 1 damps)
    pub early_intensity_scale: f32,
    /// Tiers subtracted from the selector target at t = 0
    pub early_tier_offset: f32,
    /// Weight multiplier for tier 0-1 chunks at t = 0
    pub low_tier_weight_boost: f32,
    /// Extra telegraph fraction at t = 0
    pub telegraph_boost: f32,
    /// Extra decision window fraction at t = 0
    pub decision_window_boost: f32,
    /// Hazard count multiplier at t = 0
    pub early_hazard_scale: f32,
}

/// Onboarding adjustments at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurvivabilitySample {
    /// 1.0 at session start, 0.0 once onboarding has elapsed
    pub onboarding: f32,
    pub intensity_scale: f32,
    pub target_tier_offset: f32,
    pub low_tier_weight_boost: f32,
    pub telegraph_scale: f32,
    pub decision_window_scale: f32,
    pub hazard_scale: f32,
}

impl SurvivabilitySample {
    /// Fully onboarded: every knob is identity
    pub const IDENTITY: SurvivabilitySample = SurvivabilitySample {
        onboarding: 0.0,
        intensity_scale: 1.0,
        target_tier_offset: 0.0,
        low_tier_weight_boost: 1.0,
        telegraph_scale: 1.0,
        decision_window_scale: 1.0,
        hazard_scale: 1.0,
    };
}

impl SurvivabilityProfile {
    pub fn sample(&self, elapsed_seconds: f32) -> SurvivabilitySample {
        let t = if self.onboarding_seconds > 0.0 {
            (elapsed_seconds / self.onboarding_seconds).clamp(0.0, 1.0)
        } else {
            1.0
        };
        // NaN elapsed falls back to fully onboarded
        let t = if t.is_nan() { 1.0 } else { t };
        let onboarding = 1.0 - t;

        SurvivabilitySample {
            onboarding,
            intensity_scale: lerp(self.early_intensity_scale, 1.0, t),
            target_tier_offset: self.early_tier_offset * onboarding,
            low_tier_weight_boost: lerp(1.0, self.low_tier_weight_boost, onboarding),
            telegraph_scale: 1.0 + self.telegraph_boost * onboarding,
            decision_window_scale: 1.0 + self.decision_window_boost * onboarding,
            hazard_scale: lerp(self.early_hazard_scale, 1.0, t),
        }
    }
}

/// Sample the onboarding adjustments for a game
pub fn sample_survivability(game: GameId, elapsed_seconds: f32) -> SurvivabilitySample {
    game.spec().survivability.sample(elapsed_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn profile() -> SurvivabilityProfile {
        SurvivabilityProfile {
            onboarding_seconds: 18.0,
            early_intensity_scale: 0.6,
            early_tier_offset: 1.5,
            low_tier_weight_boost: 1.8,
            telegraph_boost: 0.4,
            decision_window_boost: 0.35,
            early_hazard_scale: 0.5,
        }
    }

    #[test]
    fn test_halfway_through_onboarding() {
        let s = profile().sample(9.0);
        assert_eq!(s.onboarding, 0.5);
        assert_eq!(s.intensity_scale, lerp(0.6, 1.0, 0.5));
        assert_eq!(s.target_tier_offset, 0.75);
        assert_eq!(s.hazard_scale, lerp(0.5, 1.0, 0.5));
    }

    #[test]
    fn test_session_start_is_fully_onboarding() {
        let s = profile().sample(0.0);
        assert_eq!(s.onboarding, 1.0);
        assert_eq!(s.intensity_scale, 0.6);
        assert_eq!(s.target_tier_offset, 1.5);
        assert_eq!(s.low_tier_weight_boost, 1.8);
        assert_eq!(s.telegraph_scale, 1.4);
        assert_eq!(s.decision_window_scale, 1.35);
        assert_eq!(s.hazard_scale, 0.5);
    }

    #[test]
    fn test_identity_after_onboarding() {
        assert_eq!(profile().sample(18.0), SurvivabilitySample::IDENTITY);
        assert_eq!(profile().sample(600.0), SurvivabilitySample::IDENTITY);
    }

    #[test]
    fn test_zero_onboarding_window_is_identity() {
        let mut p = profile();
        p.onboarding_seconds = 0.0;
        assert_eq!(p.sample(0.0), SurvivabilitySample::IDENTITY);
    }

    #[test]
    fn test_every_game_starts_onboarding() {
        for game in GameId::ALL {
            let s = sample_survivability(game, 0.0);
            assert_eq!(s.onboarding, 1.0, "{game}");
            assert!(s.telegraph_scale >= 1.0);
            assert!(s.decision_window_scale >= 1.0);
            assert!(s.intensity_scale <= 1.0);
        }
    }

    proptest! {
        #[test]
        fn onboarding_stays_in_bounds(t in 0.0f32..10_000.0, idx in 0usize..8) {
            let game = GameId::ALL[idx];
            let s = sample_survivability(game, t);
            prop_assert!((0.0..=1.0).contains(&s.onboarding));
            prop_assert!(s.telegraph_scale >= 1.0);
            prop_assert!(s.decision_window_scale >= 1.0);
            if t >= game.spec().survivability.onboarding_seconds {
                prop_assert_eq!(s.onboarding, 0.0);
            }
        }
    }
}

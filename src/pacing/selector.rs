//! Weighted chunk selection
//!
//! Not a uniform pick. Weights fall off with tier distance from a target tier,
//! low tiers get boosted during onboarding, and the recovery beat shows up
//! more often early on. The weighting is what keeps difficulty from spiking.

use rand::Rng;

use super::chunks::{ChunkTemplate, GameChunkPatternTemplate};
use super::survivability::{SurvivabilitySample, sample_survivability};
use crate::consts::MAX_TIER;
use crate::error::ArcadeError;
use crate::games::GameId;

/// Weight floor so every chunk stays reachable
pub const MIN_CHUNK_WEIGHT: f32 = 0.08;
/// Weight at zero tier distance
const PEAK_WEIGHT: f32 = 1.95;
/// Weight lost per tier of distance
const TIER_FALLOFF: f32 = 0.5;
/// Onboarding level above which the recovery bonus applies
const RECOVERY_ONBOARDING_THRESHOLD: f32 = 0.1;
const RECOVERY_BONUS: f32 = 0.35;

/// Map intensity in [0, 1] to a tier, pulled down during onboarding
pub fn target_tier(intensity: f32, survivability: &SurvivabilitySample) -> u8 {
    let adjusted = intensity.clamp(0.0, 1.0) * survivability.intensity_scale;
    let max = MAX_TIER as f32;
    let tier = (adjusted * max - survivability.target_tier_offset).clamp(0.0, max);
    // NaN casts to 0
    tier.round() as u8
}

/// Selection weight of one template for a target tier. Always >= the floor
/// times the smallest multiplier, never zero.
pub fn chunk_weight(
    template: &ChunkTemplate,
    target_tier: u8,
    survivability: &SurvivabilitySample,
) -> f32 {
    let distance = (template.tier as f32 - target_tier as f32).abs();
    let mut weight = (PEAK_WEIGHT - distance * TIER_FALLOFF).max(MIN_CHUNK_WEIGHT);

    let boost = survivability.low_tier_weight_boost;
    if template.tier <= 1 {
        weight *= boost;
    } else if template.tier >= 3 {
        weight *= 1.0 / (1.0 + (boost - 1.0) * 0.75);
    }

    if template.recovery && survivability.onboarding > RECOVERY_ONBOARDING_THRESHOLD {
        weight *= 1.0 + survivability.onboarding * RECOVERY_BONUS;
    }

    weight
}

/// Cumulative-weight roulette.
///
/// `draw` is a uniform sample in [0, 1). Returns the first item whose
/// cumulative weight reaches `draw * total`, or the last item when float
/// rounding walks past the end. `None` only for an empty slice.
pub fn select_weighted<'a, T>(items: &'a [T], weights: &[f32], draw: f32) -> Option<&'a T> {
    let total: f32 = weights.iter().sum();
    let pick = draw * total;
    let mut cumulative = 0.0f32;
    for (item, &weight) in items.iter().zip(weights) {
        cumulative += weight;
        if cumulative >= pick {
            return Some(item);
        }
    }
    items.last()
}

/// Pick the next chunk pattern for a game
pub fn pick_pattern_chunk_for_survivability<'a, R: Rng>(
    game: GameId,
    library: &'a [GameChunkPatternTemplate],
    rng: &mut R,
    intensity: f32,
    elapsed_seconds: f32,
) -> Result<&'a GameChunkPatternTemplate, ArcadeError> {
    if library.is_empty() {
        return Err(ArcadeError::EmptyLibrary { game });
    }

    let survivability = sample_survivability(game, elapsed_seconds);
    let tier = target_tier(intensity, &survivability);
    let weights: Vec<f32> = library
        .iter()
        .map(|p| chunk_weight(p.template, tier, &survivability))
        .collect();

    let draw: f32 = rng.random();
    select_weighted(library, &weights, draw).ok_or(ArcadeError::EmptyLibrary { game })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::chunks::{CHUNK_TEMPLATES, ChunkLibrary, chunk_library};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const IDENTITY: SurvivabilitySample = SurvivabilitySample::IDENTITY;

    fn one_per_tier() -> Vec<&'static ChunkTemplate> {
        (0..=MAX_TIER)
            .map(|tier| {
                CHUNK_TEMPLATES
                    .iter()
                    .find(|t| t.tier == tier && !t.recovery)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_target_tier_mapping() {
        assert_eq!(target_tier(0.0, &IDENTITY), 0);
        assert_eq!(target_tier(0.5, &IDENTITY), 2);
        assert_eq!(target_tier(1.0, &IDENTITY), 4);
        assert_eq!(target_tier(7.0, &IDENTITY), 4);
        assert_eq!(target_tier(-1.0, &IDENTITY), 0);
    }

    #[test]
    fn test_onboarding_pulls_target_down() {
        let early = sample_survivability(GameId::LaneDash, 0.0);
        assert!(target_tier(1.0, &early) < target_tier(1.0, &IDENTITY));
    }

    #[test]
    fn test_triangular_peak_at_target() {
        let templates = one_per_tier();
        let weights: Vec<f32> = templates
            .iter()
            .map(|t| chunk_weight(t, 2, &IDENTITY))
            .collect();
        let peak = weights[2];
        for (tier, w) in weights.iter().enumerate() {
            if tier != 2 {
                assert!(peak > *w, "tier {tier} weight {w} >= peak {peak}");
            }
        }
    }

    #[test]
    fn test_far_tiers_hit_the_floor() {
        let tier4 = one_per_tier()[4];
        assert_eq!(chunk_weight(tier4, 0, &IDENTITY), MIN_CHUNK_WEIGHT);
    }

    #[test]
    fn test_onboarding_boosts_low_and_damps_high() {
        let early = sample_survivability(GameId::LaneDash, 0.0);
        let templates = one_per_tier();
        assert!(chunk_weight(templates[0], 2, &early) > chunk_weight(templates[0], 2, &IDENTITY));
        assert!(chunk_weight(templates[4], 2, &early) < chunk_weight(templates[4], 2, &IDENTITY));
        assert!(chunk_weight(templates[4], 2, &early) > 0.0);
    }

    #[test]
    fn test_recovery_bonus_only_while_onboarding() {
        let recovery = CHUNK_TEMPLATES.iter().find(|t| t.recovery).unwrap();
        let plain = &CHUNK_TEMPLATES[0];
        assert_eq!(recovery.tier, plain.tier);

        let early = sample_survivability(GameId::PulseParry, 0.0);
        assert!(chunk_weight(recovery, 0, &early) > chunk_weight(plain, 0, &early));
        assert_eq!(
            chunk_weight(recovery, 0, &IDENTITY),
            chunk_weight(plain, 0, &IDENTITY)
        );
    }

    #[test]
    fn test_recovery_bonus_needs_onboarding_above_threshold() {
        let recovery = CHUNK_TEMPLATES.iter().find(|t| t.recovery).unwrap();
        let plain = CHUNK_TEMPLATES
            .iter()
            .find(|t| t.tier == recovery.tier && !t.recovery)
            .unwrap();
        let at = |onboarding: f32| SurvivabilitySample {
            onboarding,
            ..IDENTITY
        };

        let late = at(0.05);
        assert_eq!(chunk_weight(recovery, 0, &late), chunk_weight(plain, 0, &late));

        let early = at(0.2);
        let bonus = chunk_weight(recovery, 0, &early) / chunk_weight(plain, 0, &early);
        assert!((bonus - (1.0 + 0.2 * RECOVERY_BONUS)).abs() < 1e-5);
    }

    #[test]
    fn test_select_weighted_walks_cumulative() {
        let items = ['a', 'b', 'c'];
        let weights = [1.0, 2.0, 1.0];
        assert_eq!(select_weighted(&items, &weights, 0.0), Some(&'a'));
        assert_eq!(select_weighted(&items, &weights, 0.2), Some(&'a'));
        assert_eq!(select_weighted(&items, &weights, 0.5), Some(&'b'));
        assert_eq!(select_weighted(&items, &weights, 0.9), Some(&'c'));
        // Past the end falls back to the last item
        assert_eq!(select_weighted(&items, &weights, 1.5), Some(&'c'));
        assert_eq!(select_weighted::<char>(&[], &[], 0.5), None);
    }

    #[test]
    fn test_empty_library_fails() {
        let empty = ChunkLibrary::from_templates(GameId::WaveRider, &[]);
        let mut rng = Pcg32::seed_from_u64(1);
        let result = pick_pattern_chunk_for_survivability(
            GameId::WaveRider,
            empty.patterns(),
            &mut rng,
            0.5,
            3.0,
        );
        assert!(matches!(
            result,
            Err(ArcadeError::EmptyLibrary { game: GameId::WaveRider })
        ));
    }

    #[test]
    fn test_low_target_selects_low_tiers_mostly() {
        let game = GameId::LaneDash;
        let library = chunk_library(game);
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        // Past onboarding so only the triangular falloff is in play
        let elapsed = game.spec().survivability.onboarding_seconds + 60.0;

        let draws = 10_000;
        let low = (0..draws)
            .filter(|_| {
                let pattern = pick_pattern_chunk_for_survivability(
                    game,
                    library.patterns(),
                    &mut rng,
                    0.0,
                    elapsed,
                )
                .unwrap();
                pattern.tier() <= 1
            })
            .count();
        assert!(low * 100 > draws * 60, "only {low} of {draws} draws were tier <= 1");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let game = GameId::SpiralRun;
        let library = chunk_library(game);
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for step in 0..200 {
            let t = step as f32 * 0.7;
            let pa = pick_pattern_chunk_for_survivability(game, library.patterns(), &mut a, 0.4, t).unwrap();
            let pb = pick_pattern_chunk_for_survivability(game, library.patterns(), &mut b, 0.4, t).unwrap();
            assert_eq!(pa.template.id, pb.template.id);
        }
    }

    proptest! {
        #[test]
        fn weights_are_always_positive(
            intensity in -1.0f32..2.0,
            elapsed in 0.0f32..400.0,
            idx in 0usize..8,
        ) {
            let game = GameId::ALL[idx];
            let survivability = sample_survivability(game, elapsed);
            let tier = target_tier(intensity, &survivability);
            prop_assert!(tier <= MAX_TIER);
            for template in CHUNK_TEMPLATES.iter() {
                prop_assert!(chunk_weight(template, tier, &survivability) > 0.0);
            }
        }
    }
}

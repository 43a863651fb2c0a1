//! Parry skin (`pulse-parry`, `echo-guard`)
//!
//! Pulses travel in toward a core. Each pulse carries its own time to
//! arrival; the parry action has to land inside the decision window centred
//! on that arrival.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::{BurstClock, GameId, InputKind, RISK_COIN_VALUE, SAFE_COIN_VALUE};
use crate::error::ArcadeError;
use crate::pacing::RewardMode;
use crate::polar_to_cartesian;
use crate::sim::{Frame, Paint, SimBase, SimInput, Simulation};

const CORE_RADIUS: f32 = 1.0;
const PULSE_RADIUS: f32 = 0.35;
/// Drawn arena radius in world units
const ARENA_RADIUS: f32 = 10.0;
/// Gap between pulses of one burst, in decision windows
const PULSE_SPACING: f32 = 1.5;
/// Angular step between pulses of one burst
const PULSE_ARC: f32 = 0.9;
/// Fraction of the window that counts as a perfect parry
const PERFECT_FRACTION: f32 = 1.0 / 6.0;

#[derive(Debug, Clone)]
struct Pulse {
    angle: f32,
    /// Seconds until it reaches the core, negative once past
    tta: f32,
    /// Inward speed captured at spawn
    speed: f32,
    window: f32,
    telegraph: f32,
    age: f32,
    coin: Option<u32>,
    /// Bonus orbs vanish quietly when missed
    harmless: bool,
}

impl Pulse {
    fn in_window(&self) -> bool {
        self.tta.abs() <= self.window * 0.5
    }

    fn missed(&self) -> bool {
        self.tta < -self.window * 0.5
    }

    fn distance(&self) -> f32 {
        CORE_RADIUS + (self.tta * self.speed).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct ParrySim {
    game: GameId,
    base: SimBase,
    pulses: Vec<Pulse>,
    bursts: BurstClock,
    /// Consecutive successful parries
    streak: u32,
}

impl ParrySim {
    pub fn new(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(Self {
            game,
            base: SimBase::new(game, seed)?,
            pulses: Vec::new(),
            bursts: BurstClock::default(),
            streak: 0,
        })
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    fn spawn_burst(&mut self) {
        let tuning = &self.base.tuning;
        let speed = tuning.effective_speed();
        let telegraph = tuning.effective_telegraph_seconds();
        let window = tuning.effective_decision_window_seconds();
        let count = tuning.effective_hazard_count();
        let reward = tuning.reward_mode();
        let mirrored = tuning.is_mirrored();

        let start = self.base.random() * TAU;
        let spawn_angle = |k: u32| {
            let angle = start + k as f32 * PULSE_ARC;
            if mirrored { PI - angle } else { angle }
        };

        for k in 0..count {
            let coin = (reward == RewardMode::Risk && k + 1 == count).then_some(RISK_COIN_VALUE);
            self.pulses.push(Pulse {
                angle: spawn_angle(k),
                tta: telegraph + window * (1.0 + k as f32 * PULSE_SPACING),
                speed,
                window,
                telegraph,
                age: 0.0,
                coin,
                harmless: false,
            });
        }

        // Safe coins ride a bonus orb that trails the burst from the far side
        let orb = reward == RewardMode::Safe || (reward == RewardMode::Risk && count == 0);
        if orb {
            self.pulses.push(Pulse {
                angle: spawn_angle(0) + PI,
                tta: telegraph + window * (1.0 + count as f32 * PULSE_SPACING),
                speed,
                window,
                telegraph,
                age: 0.0,
                coin: Some(SAFE_COIN_VALUE),
                harmless: true,
            });
        }
    }

    fn parry(&mut self) {
        let nearest = self
            .pulses
            .iter()
            .enumerate()
            .filter(|(_, p)| p.in_window())
            // Threats before bonus orbs, then closest to arrival
            .min_by(|(_, a), (_, b)| {
                a.harmless
                    .cmp(&b.harmless)
                    .then(a.tta.abs().total_cmp(&b.tta.abs()))
            })
            .map(|(i, _)| i);

        let Some(index) = nearest else {
            self.base.penalize(1);
            self.streak = 0;
            self.base.note = "Too early".to_string();
            return;
        };

        let pulse = self.pulses.remove(index);
        if let Some(value) = pulse.coin {
            self.base.collect_coin(value);
        }
        if pulse.harmless {
            return;
        }
        let perfect = pulse.tta.abs() <= pulse.window * PERFECT_FRACTION;
        self.base.award(if perfect { 2 } else { 1 });
        self.streak += 1;
        self.base.note = if perfect { "Perfect" } else { "Parried" }.to_string();
    }
}

impl Simulation for ParrySim {
    fn game(&self) -> GameId {
        self.game
    }

    fn init(&mut self, seed: u64, _width: f32, _height: f32) -> Result<(), ArcadeError> {
        *self = Self::new(self.game, seed)?;
        Ok(())
    }

    fn update(&mut self, dt: f32, input: &SimInput, _width: f32, _height: f32) {
        if self.base.dead {
            return;
        }

        if self.bursts.tick(dt, &self.base.tuning) {
            self.spawn_burst();
        }

        for pulse in &mut self.pulses {
            pulse.tta -= dt;
            pulse.age += dt;
        }

        let action = match self.game.spec().input {
            InputKind::Hold => input.release,
            InputKind::Tap | InputKind::Drag => input.tap,
        };
        if action {
            self.parry();
        }

        if self.pulses.iter().any(|p| p.missed() && !p.harmless) {
            self.base.kill("Missed a parry");
            return;
        }
        self.pulses.retain(|p| !p.missed());
    }

    fn draw(&self, frame: &mut Frame, width: f32, height: f32) {
        let center = Vec2::new(width * 0.5, height * 0.5);
        let scale = width.min(height) * 0.5 / ARENA_RADIUS;

        frame.ring(center, ARENA_RADIUS * scale, 2.0, Paint::Track);
        // Pulses inside this ring are parryable
        let window_edge = self
            .pulses
            .iter()
            .map(|p| p.window * 0.5 * p.speed)
            .fold(0.0f32, f32::max);
        frame.ring(center, (CORE_RADIUS + window_edge) * scale, 1.0, Paint::Track);
        frame.circle(center, CORE_RADIUS * scale, Paint::Player);

        for pulse in &self.pulses {
            let pos = center + polar_to_cartesian(pulse.distance() * scale, pulse.angle);
            let paint = if pulse.harmless {
                Paint::Reward
            } else if pulse.age < pulse.telegraph {
                Paint::Telegraph
            } else {
                Paint::Hazard
            };
            frame.circle(pos, PULSE_RADIUS * scale, paint);
            if pulse.coin.is_some() && !pulse.harmless {
                frame.ring(pos, PULSE_RADIUS * scale * 1.6, 2.0, Paint::Reward);
            }
        }
    }

    fn base(&self) -> &SimBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SimBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FIXED_STEP, MIN_CHUNK_SECONDS};
    use crate::games::test_support::run_steps;

    fn tap() -> SimInput {
        SimInput {
            tap: true,
            down: true,
            ..Default::default()
        }
    }

    /// Taps whenever a threat reaches the core this step or already has
    fn on_time(_: u32, sim: &ParrySim) -> SimInput {
        let due = sim
            .pulses
            .iter()
            .any(|p| !p.harmless && p.tta <= FIXED_STEP + 1e-4);
        if due { tap() } else { SimInput::default() }
    }

    #[test]
    fn test_idle_core_misses() {
        let mut sim = ParrySim::new(GameId::PulseParry, 8).unwrap();
        run_steps(&mut sim, 60 * 60, |_, _| SimInput::default());
        assert!(sim.base().dead);
        assert_eq!(sim.base().note, "Missed a parry");
    }

    #[test]
    fn test_empty_parry_costs_a_point() {
        let mut sim = ParrySim::new(GameId::PulseParry, 8).unwrap();
        sim.base.award(3);
        sim.update(FIXED_STEP, &tap(), 800.0, 600.0);
        assert_eq!(sim.base().score, 2);
        assert_eq!(sim.base().note, "Too early");
        assert!(!sim.base().dead);
    }

    #[test]
    fn test_timed_parries_survive() {
        let mut sim = ParrySim::new(GameId::PulseParry, 31).unwrap();
        run_steps(&mut sim, 60 * 30, on_time);
        assert!(!sim.base().dead, "died: {}", sim.base().note);
        assert!(sim.base().score > 0);
        assert!(sim.streak() > 0);
    }

    #[test]
    fn test_guard_parries_on_release() {
        let mut sim = ParrySim::new(GameId::EchoGuard, 5).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        sim.spawn_burst();
        let first = sim.pulses.iter().map(|p| p.tta).fold(f32::MAX, f32::min);
        for pulse in &mut sim.pulses {
            pulse.tta -= first;
        }
        let before = sim.pulses.len();
        // A tap does nothing for a hold game
        sim.update(0.0, &tap(), 800.0, 600.0);
        assert_eq!(sim.pulses.len(), before);
        let release = SimInput {
            release: true,
            ..Default::default()
        };
        sim.update(0.0, &release, 800.0, 600.0);
        assert_eq!(sim.pulses.len(), before - 1);
    }

    #[test]
    fn test_mirrored_burst_reflects_angles() {
        let mut sim = ParrySim::new(GameId::PulseParry, 12).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        let mut mirrored = sim.clone();
        if let Some(chunk) = mirrored.base.tuning.chunk.as_mut() {
            chunk.mirrored = !chunk.mirrored;
        }
        sim.spawn_burst();
        mirrored.spawn_burst();
        assert_eq!(sim.pulses.len(), mirrored.pulses.len());
        for (a, b) in sim.pulses.iter().zip(&mirrored.pulses) {
            assert_eq!(a.tta, b.tta);
            // Reflection across the vertical axis keeps sin, flips cos
            assert!((a.angle.sin() - b.angle.sin()).abs() < 1e-4);
            assert!((a.angle.cos() + b.angle.cos()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = ParrySim::new(GameId::EchoGuard, 90).unwrap();
        let mut b = ParrySim::new(GameId::EchoGuard, 90).unwrap();
        run_steps(&mut a, 2400, |_, _| SimInput::default());
        run_steps(&mut b, 2400, |_, _| SimInput::default());
        assert_eq!(a.base().dead, b.base().dead);
        assert_eq!(a.base().t, b.base().t);
        assert_eq!(a.pulses.len(), b.pulses.len());
    }
}

//! Spiral skin (`spiral-run`, `vortex-dive`)
//!
//! The runner orbits the centre on one of two rings. Comets land on a ring
//! ahead of it and stay put; the runner has to be on the other ring when it
//! sweeps past. Angles are kept unwrapped so "ahead" is a plain comparison.

use glam::Vec2;

use super::{BurstClock, GameId, InputKind, RISK_COIN_VALUE, SAFE_COIN_VALUE};
use crate::error::ArcadeError;
use crate::pacing::RewardMode;
use crate::sim::{Frame, Paint, SimBase, SimInput, Simulation, circle_circle_overlap};
use crate::{normalize_angle, polar_to_cartesian};

const INNER_RADIUS: f32 = 2.0;
const OUTER_RADIUS: f32 = 3.2;
const RUNNER_RADIUS: f32 = 0.3;
const COMET_RADIUS: f32 = 0.35;
const COIN_RADIUS: f32 = 0.25;
/// Radial speed when switching rings (units/s)
const RADIAL_SPEED: f32 = 10.0;
/// Comet spacing in decision windows of travel
const COMET_SPACING: f32 = 0.9;
/// Risk coins sit this far before their comet (radians)
const RISK_ARC: f32 = 0.35;
/// Behind the runner by this much counts as passed
const PASS_ARC: f32 = 0.5;
const ARENA_RADIUS: f32 = 4.5;

fn ring_radius(inner: bool) -> f32 {
    if inner { INNER_RADIUS } else { OUTER_RADIUS }
}

#[derive(Debug, Clone)]
struct Comet {
    angle: f32,
    inner: bool,
    age: f32,
    telegraph: f32,
}

impl Comet {
    fn lethal(&self) -> bool {
        self.age >= self.telegraph
    }

    fn pos(&self) -> Vec2 {
        polar_to_cartesian(ring_radius(self.inner), self.angle)
    }
}

#[derive(Debug, Clone)]
struct Coin {
    angle: f32,
    inner: bool,
    value: u32,
}

#[derive(Debug, Clone)]
pub struct SpiralSim {
    game: GameId,
    base: SimBase,
    /// Unwrapped orbit angle
    theta: f32,
    inner: bool,
    /// Current radius, eases toward the selected ring
    radius: f32,
    comets: Vec<Comet>,
    coins: Vec<Coin>,
    bursts: BurstClock,
}

impl SpiralSim {
    pub fn new(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(Self {
            game,
            base: SimBase::new(game, seed)?,
            theta: 0.0,
            inner: false,
            radius: OUTER_RADIUS,
            comets: Vec::new(),
            coins: Vec::new(),
            bursts: BurstClock::default(),
        })
    }

    pub fn on_inner_ring(&self) -> bool {
        self.inner
    }

    fn runner_pos(&self) -> Vec2 {
        polar_to_cartesian(self.radius, self.theta)
    }

    fn spawn_burst(&mut self) {
        let tuning = &self.base.tuning;
        let omega = tuning.effective_speed();
        let telegraph = tuning.effective_telegraph_seconds();
        let window = tuning.effective_decision_window_seconds();
        let count = tuning.effective_hazard_count();
        let reward = tuning.reward_mode();
        let mirrored = tuning.is_mirrored();

        let lead = self.theta + omega * (telegraph + window);
        let spacing = omega * window * COMET_SPACING;
        // Mirroring reflects across the gap between the rings
        let first_inner = (self.base.random() < 0.5) != mirrored;

        for k in 0..count {
            self.comets.push(Comet {
                angle: lead + k as f32 * spacing,
                inner: first_inner == (k % 2 == 0),
                age: 0.0,
                telegraph,
            });
        }

        let burst = &self.comets[self.comets.len() - count as usize..];
        let coin = match (reward, burst.first(), burst.last()) {
            (RewardMode::None, _, _) => None,
            (RewardMode::Risk, _, Some(last)) => Some(Coin {
                angle: last.angle - RISK_ARC,
                inner: last.inner,
                value: RISK_COIN_VALUE,
            }),
            (_, Some(first), _) => Some(Coin {
                angle: first.angle,
                inner: !first.inner,
                value: SAFE_COIN_VALUE,
            }),
            _ => Some(Coin {
                angle: lead,
                inner: self.inner,
                value: SAFE_COIN_VALUE,
            }),
        };
        self.coins.extend(coin);
    }
}

impl Simulation for SpiralSim {
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

        match self.game.spec().input {
            InputKind::Hold => self.inner = input.down,
            InputKind::Tap | InputKind::Drag => {
                if input.tap {
                    self.inner = !self.inner;
                }
            }
        }
        let target = ring_radius(self.inner);
        let max_step = RADIAL_SPEED * dt;
        self.radius += (target - self.radius).clamp(-max_step, max_step);
        self.theta += self.base.tuning.effective_speed() * dt;

        if self.bursts.tick(dt, &self.base.tuning) {
            self.spawn_burst();
        }

        let runner = self.runner_pos();
        let theta = self.theta;

        for comet in &mut self.comets {
            comet.age += dt;
        }
        if self
            .comets
            .iter()
            .any(|c| c.lethal() && circle_circle_overlap(runner, RUNNER_RADIUS, c.pos(), COMET_RADIUS))
        {
            self.base.kill("Hit a comet");
            return;
        }
        let before = self.comets.len();
        self.comets.retain(|c| theta - c.angle < PASS_ARC);
        self.base.award((before - self.comets.len()) as u64);

        let base = &mut self.base;
        self.coins.retain(|coin| {
            let pos = polar_to_cartesian(ring_radius(coin.inner), coin.angle);
            if circle_circle_overlap(runner, RUNNER_RADIUS, pos, COIN_RADIUS) {
                base.collect_coin(coin.value);
                return false;
            }
            theta - coin.angle < PASS_ARC
        });
    }

    fn draw(&self, frame: &mut Frame, width: f32, height: f32) {
        let center = Vec2::new(width * 0.5, height * 0.5);
        let scale = width.min(height) * 0.5 / ARENA_RADIUS;
        // theta is unwrapped; wrap before trig
        let at = |r: f32, angle: f32| center + polar_to_cartesian(r * scale, normalize_angle(angle));

        frame.ring(center, INNER_RADIUS * scale, 2.0, Paint::Track);
        frame.ring(center, OUTER_RADIUS * scale, 2.0, Paint::Track);

        for comet in &self.comets {
            let paint = if comet.lethal() { Paint::Hazard } else { Paint::Telegraph };
            frame.circle(at(ring_radius(comet.inner), comet.angle), COMET_RADIUS * scale, paint);
        }
        for coin in &self.coins {
            frame.circle(at(ring_radius(coin.inner), coin.angle), COIN_RADIUS * scale, Paint::Reward);
        }
        frame.circle(at(self.radius, self.theta), RUNNER_RADIUS * scale, Paint::Player);
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

    #[test]
    fn test_tap_swaps_rings() {
        let mut sim = SpiralSim::new(GameId::SpiralRun, 1).unwrap();
        let tap = SimInput {
            tap: true,
            down: true,
            ..Default::default()
        };
        assert!(!sim.on_inner_ring());
        sim.update(FIXED_STEP, &tap, 800.0, 600.0);
        assert!(sim.on_inner_ring());
        // Holding without a new press changes nothing
        sim.update(FIXED_STEP, &tap.without_edges(), 800.0, 600.0);
        assert!(sim.on_inner_ring());
        sim.update(FIXED_STEP, &tap, 800.0, 600.0);
        assert!(!sim.on_inner_ring());
    }

    #[test]
    fn test_hold_selects_inner_ring() {
        let mut sim = SpiralSim::new(GameId::VortexDive, 1).unwrap();
        let held = SimInput {
            down: true,
            ..Default::default()
        };
        for _ in 0..30 {
            sim.update(FIXED_STEP, &held, 800.0, 600.0);
        }
        assert!(sim.on_inner_ring());
        assert!((sim.radius - INNER_RADIUS).abs() < 1e-4);
        sim.update(FIXED_STEP, &SimInput::default(), 800.0, 600.0);
        assert!(!sim.on_inner_ring());
    }

    #[test]
    fn test_comets_land_ahead_and_alternate() {
        let mut sim = SpiralSim::new(GameId::SpiralRun, 21).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        sim.spawn_burst();
        assert!(sim.comets.iter().all(|c| c.angle > sim.theta && !c.lethal()));
        for pair in sim.comets.windows(2) {
            assert!(pair[1].angle > pair[0].angle);
            assert_ne!(pair[0].inner, pair[1].inner);
        }
    }

    #[test]
    fn test_mirroring_swaps_rings() {
        let mut sim = SpiralSim::new(GameId::SpiralRun, 21).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        let mut mirrored = sim.clone();
        if let Some(chunk) = mirrored.base.tuning.chunk.as_mut() {
            chunk.mirrored = !chunk.mirrored;
        }
        sim.spawn_burst();
        mirrored.spawn_burst();
        for (a, b) in sim.comets.iter().zip(&mirrored.comets) {
            assert_eq!(a.angle, b.angle);
            assert_ne!(a.inner, b.inner);
        }
    }

    #[test]
    fn test_idle_runner_is_hit() {
        let mut sim = SpiralSim::new(GameId::SpiralRun, 77).unwrap();
        run_steps(&mut sim, 60 * 120, |_, _| SimInput::default());
        assert!(sim.base().dead);
        assert_eq!(sim.base().note, "Hit a comet");
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |i: u32, _: &SpiralSim| SimInput {
            tap: i % 50 == 0,
            down: i % 50 < 10,
            ..Default::default()
        };
        let mut a = SpiralSim::new(GameId::SpiralRun, 5).unwrap();
        let mut b = SpiralSim::new(GameId::SpiralRun, 5).unwrap();
        run_steps(&mut a, 1500, script);
        run_steps(&mut b, 1500, script);
        assert_eq!(a.theta, b.theta);
        assert_eq!(a.base().score, b.base().score);
        assert_eq!(a.comets.len(), b.comets.len());
    }
}

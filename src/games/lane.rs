//! Lane skin (`lane-dash`, `lane-drift`)
//!
//! Three lanes, barriers scroll toward a runner fixed at y = 0. World units:
//! x across the lanes, y is distance ahead of the runner.

use glam::Vec2;

use super::{BurstClock, GameId, InputKind, RISK_COIN_VALUE, SAFE_COIN_VALUE};
use crate::error::ArcadeError;
use crate::pacing::RewardMode;
use crate::sim::{
    Aabb, Frame, Paint, SimBase, SimInput, Simulation, circle_aabb_overlap, circle_circle_overlap,
};

const LANES: usize = 3;
const LANE_WIDTH: f32 = 2.0;
const RUNNER_RADIUS: f32 = 0.45;
const BARRIER_HALF: Vec2 = Vec2::new(0.8, 0.35);
const COIN_RADIUS: f32 = 0.3;
/// Lateral runner speed while changing lanes (units/s)
const LANE_SWITCH_SPEED: f32 = 18.0;
/// Row spacing in decision windows
const ROW_SPACING: f32 = 1.25;
/// Risk coins sit this far in front of their barrier
const RISK_LEAD: f32 = 1.4;
const DESPAWN_Y: f32 = -2.0;
/// Visible track depth when drawing
const VIEW_DEPTH: f32 = 24.0;

fn lane_x(lane: usize) -> f32 {
    (lane as f32 - (LANES as f32 - 1.0) * 0.5) * LANE_WIDTH
}

/// Lane under a normalized canvas x
fn lane_at(x: f32) -> usize {
    let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.5 };
    ((x * LANES as f32) as usize).min(LANES - 1)
}

#[derive(Debug, Clone)]
struct Barrier {
    lane: usize,
    y: f32,
    age: f32,
    telegraph: f32,
    scored: bool,
}

impl Barrier {
    fn lethal(&self) -> bool {
        self.age >= self.telegraph
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_center(Vec2::new(lane_x(self.lane), self.y), BARRIER_HALF)
    }
}

#[derive(Debug, Clone)]
struct Coin {
    lane: usize,
    y: f32,
    value: u32,
}

#[derive(Debug, Clone)]
pub struct LaneSim {
    game: GameId,
    base: SimBase,
    lane: usize,
    /// Tap direction, flips at the outer lanes
    dir: i32,
    /// Runner x, eases toward the current lane
    x: f32,
    barriers: Vec<Barrier>,
    coins: Vec<Coin>,
    bursts: BurstClock,
}

impl LaneSim {
    pub fn new(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(Self {
            game,
            base: SimBase::new(game, seed)?,
            lane: LANES / 2,
            dir: 1,
            x: lane_x(LANES / 2),
            barriers: Vec::new(),
            coins: Vec::new(),
            bursts: BurstClock::default(),
        })
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    fn step_lane(&mut self) {
        let next = self.lane as i32 + self.dir;
        if next < 0 || next >= LANES as i32 {
            self.dir = -self.dir;
        }
        self.lane = (self.lane as i32 + self.dir) as usize;
    }

    fn spawn_burst(&mut self) {
        let tuning = &self.base.tuning;
        let speed = tuning.effective_speed();
        let telegraph = tuning.effective_telegraph_seconds();
        let window = tuning.effective_decision_window_seconds();
        let count = tuning.effective_hazard_count() as usize;
        let reward = tuning.reward_mode();
        // Mirrored chunks zigzag the other way
        let step = if tuning.is_mirrored() { LANES - 1 } else { 1 };

        let start = (self.base.random() * LANES as f32) as usize % LANES;
        let arrival = speed * (telegraph + window);
        let spacing = speed * window * ROW_SPACING;

        for k in 0..count {
            self.barriers.push(Barrier {
                lane: (start + k * step) % LANES,
                y: arrival + k as f32 * spacing,
                age: 0.0,
                telegraph,
                scored: false,
            });
        }

        let coin = match reward {
            RewardMode::None => None,
            RewardMode::Risk if count > 0 => Some(Coin {
                lane: start,
                y: arrival - RISK_LEAD,
                value: RISK_COIN_VALUE,
            }),
            RewardMode::Safe | RewardMode::Risk => Some(Coin {
                lane: (start + LANES - step) % LANES,
                y: arrival,
                value: SAFE_COIN_VALUE,
            }),
        };
        self.coins.extend(coin);
    }
}

impl Simulation for LaneSim {
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
            InputKind::Drag => {
                if input.down {
                    self.lane = lane_at(input.x);
                }
            }
            InputKind::Tap | InputKind::Hold => {
                if input.tap {
                    self.step_lane();
                }
            }
        }

        let target = lane_x(self.lane);
        let max_step = LANE_SWITCH_SPEED * dt;
        self.x += (target - self.x).clamp(-max_step, max_step);

        if self.bursts.tick(dt, &self.base.tuning) {
            self.spawn_burst();
        }

        let travel = self.base.tuning.effective_speed() * dt;
        let runner = Vec2::new(self.x, 0.0);

        for barrier in &mut self.barriers {
            barrier.y -= travel;
            barrier.age += dt;
            if barrier.lethal() && circle_aabb_overlap(runner, RUNNER_RADIUS, &barrier.bounds()) {
                self.base.kill("Hit a barrier");
            }
            if !barrier.scored && barrier.y < -(BARRIER_HALF.y + RUNNER_RADIUS) {
                barrier.scored = true;
                self.base.award(1);
            }
        }
        self.barriers.retain(|b| b.y > DESPAWN_Y);

        let base = &mut self.base;
        self.coins.retain_mut(|coin| {
            coin.y -= travel;
            let pos = Vec2::new(lane_x(coin.lane), coin.y);
            if circle_circle_overlap(runner, RUNNER_RADIUS, pos, COIN_RADIUS) {
                base.collect_coin(coin.value);
                return false;
            }
            coin.y > DESPAWN_Y
        });
    }

    fn draw(&self, frame: &mut Frame, width: f32, height: f32) {
        let track_width = LANES as f32 * LANE_WIDTH;
        let px_per_unit = width / track_width;
        let runner_py = height * 0.85;
        let horizon = height * 0.05;
        let to_px = |x: f32, y: f32| {
            Vec2::new(
                (x / track_width + 0.5) * width,
                runner_py - y / VIEW_DEPTH * (runner_py - horizon),
            )
        };

        let lane_px = width / LANES as f32;
        for i in 0..LANES {
            frame.rect(
                Vec2::new(i as f32 * lane_px + 2.0, 0.0),
                Vec2::new((i + 1) as f32 * lane_px - 2.0, height),
                Paint::Track,
            );
        }

        for barrier in self.barriers.iter().filter(|b| b.y < VIEW_DEPTH) {
            let x = lane_x(barrier.lane);
            let paint = if barrier.lethal() { Paint::Hazard } else { Paint::Telegraph };
            frame.rect(
                to_px(x - BARRIER_HALF.x, barrier.y + BARRIER_HALF.y),
                to_px(x + BARRIER_HALF.x, barrier.y - BARRIER_HALF.y),
                paint,
            );
        }

        for coin in self.coins.iter().filter(|c| c.y < VIEW_DEPTH) {
            frame.circle(to_px(lane_x(coin.lane), coin.y), COIN_RADIUS * px_per_unit, Paint::Reward);
        }

        frame.circle(to_px(self.x, 0.0), RUNNER_RADIUS * px_per_unit, Paint::Player);
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

    #[test]
    fn test_tap_cycles_and_bounces() {
        let mut sim = LaneSim::new(GameId::LaneDash, 1).unwrap();
        let mut lanes = vec![sim.lane()];
        for _ in 0..4 {
            sim.update(FIXED_STEP, &tap(), 800.0, 600.0);
            lanes.push(sim.lane());
        }
        assert_eq!(lanes, vec![1, 2, 1, 0, 1]);
    }

    #[test]
    fn test_drag_picks_lane_under_pointer() {
        let mut sim = LaneSim::new(GameId::LaneDrift, 1).unwrap();
        let at = |x: f32| SimInput {
            down: true,
            x,
            ..Default::default()
        };
        sim.update(FIXED_STEP, &at(0.1), 800.0, 600.0);
        assert_eq!(sim.lane(), 0);
        sim.update(FIXED_STEP, &at(0.95), 800.0, 600.0);
        assert_eq!(sim.lane(), 2);
        // Pointer up keeps the lane
        sim.update(FIXED_STEP, &SimInput::default(), 800.0, 600.0);
        assert_eq!(sim.lane(), 2);
    }

    #[test]
    fn test_burst_matches_effective_count() {
        let mut sim = LaneSim::new(GameId::LaneDash, 9).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        let expected = sim.base.tuning.effective_hazard_count() as usize;
        sim.spawn_burst();
        assert_eq!(sim.barriers.len(), expected);
        assert!(sim.barriers.iter().all(|b| b.y > 0.0 && !b.lethal()));
        match sim.base.tuning.reward_mode() {
            RewardMode::None => assert!(sim.coins.is_empty()),
            _ => assert_eq!(sim.coins.len(), 1),
        }
    }

    #[test]
    fn test_idle_runner_is_eventually_hit() {
        let mut sim = LaneSim::new(GameId::LaneDash, 2024).unwrap();
        run_steps(&mut sim, 60 * 120, |_, _| SimInput::default());
        assert!(sim.base().dead);
        assert_eq!(sim.base().note, "Hit a barrier");
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |i: u32, _: &LaneSim| if i % 45 == 0 { tap() } else { SimInput::default() };
        let mut a = LaneSim::new(GameId::LaneDash, 77).unwrap();
        let mut b = LaneSim::new(GameId::LaneDash, 77).unwrap();
        run_steps(&mut a, 1800, script);
        run_steps(&mut b, 1800, script);
        assert_eq!(a.base().score, b.base().score);
        assert_eq!(a.base().dead, b.base().dead);
        assert_eq!(a.base().t, b.base().t);
        assert_eq!(a.barriers.len(), b.barriers.len());
        assert_eq!(a.x, b.x);
    }

    #[test]
    fn test_init_resets_entities() {
        let mut sim = LaneSim::new(GameId::LaneDash, 3).unwrap();
        run_steps(&mut sim, 600, |_, _| SimInput::default());
        sim.init(4, 800.0, 600.0).unwrap();
        assert!(sim.barriers.is_empty());
        assert!(sim.coins.is_empty());
        assert_eq!(sim.base().seed, 4);
        assert!(sim.base().tuning.chunk.is_none());
    }

    #[test]
    fn test_draw_emits_runner_and_lanes() {
        let sim = LaneSim::new(GameId::LaneDash, 3).unwrap();
        let mut frame = Frame::new(800.0, 600.0);
        sim.draw(&mut frame, 800.0, 600.0);
        assert_eq!(frame.count(Paint::Player), 1);
        assert_eq!(frame.count(Paint::Track), LANES);
    }
}

//! Wave skin (`wave-rider`, `tide-skimmer`)
//!
//! A rider holds x = 0 inside a vertical band while gates scroll in from the
//! right. Hold sinks, letting go floats up; the drag variant steers straight
//! to the pointer height.

use glam::Vec2;

use super::{BurstClock, GameId, InputKind, RISK_COIN_VALUE, SAFE_COIN_VALUE};
use crate::error::ArcadeError;
use crate::pacing::{RewardMode, lerp};
use crate::sim::{
    Aabb, Frame, Paint, SimBase, SimInput, Simulation, circle_aabb_overlap, circle_circle_overlap,
};

const BAND_HEIGHT: f32 = 6.0;
const RIDER_RADIUS: f32 = 0.3;
const SINK_ACCEL: f32 = 16.0;
const RISE_ACCEL: f32 = 12.0;
const MAX_VY: f32 = 5.0;
/// Drag steering gain (1/s)
const TRACK_GAIN: f32 = 8.0;
const GATE_HALF_WIDTH: f32 = 0.3;
/// Gap half-height is `GAP_BASE + window * GAP_PER_WINDOW`
const GAP_BASE: f32 = 0.6;
const GAP_PER_WINDOW: f32 = 0.6;
/// Keeps gaps off the band edges
const GAP_MARGIN: f32 = 0.2;
/// Gate spacing in decision windows
const GATE_SPACING: f32 = 1.6;
const COIN_RADIUS: f32 = 0.25;
const DESPAWN_X: f32 = -3.0;
/// Visible distance ahead of the rider
const VIEW_LENGTH: f32 = 16.0;

#[derive(Debug, Clone)]
struct Gate {
    x: f32,
    gap_center: f32,
    gap_half: f32,
    age: f32,
    telegraph: f32,
    scored: bool,
}

impl Gate {
    fn lethal(&self) -> bool {
        self.age >= self.telegraph
    }

    /// Solid parts below and above the gap
    fn walls(&self) -> [Aabb; 2] {
        let left = self.x - GATE_HALF_WIDTH;
        let right = self.x + GATE_HALF_WIDTH;
        [
            Aabb::new(Vec2::new(left, 0.0), Vec2::new(right, self.gap_center - self.gap_half)),
            Aabb::new(
                Vec2::new(left, self.gap_center + self.gap_half),
                Vec2::new(right, BAND_HEIGHT),
            ),
        ]
    }
}

#[derive(Debug, Clone)]
struct Coin {
    pos: Vec2,
    value: u32,
}

#[derive(Debug, Clone)]
pub struct WaveSim {
    game: GameId,
    base: SimBase,
    y: f32,
    vy: f32,
    gates: Vec<Gate>,
    coins: Vec<Coin>,
    bursts: BurstClock,
}

impl WaveSim {
    pub fn new(game: GameId, seed: u64) -> Result<Self, ArcadeError> {
        Ok(Self {
            game,
            base: SimBase::new(game, seed)?,
            y: BAND_HEIGHT * 0.5,
            vy: 0.0,
            gates: Vec::new(),
            coins: Vec::new(),
            bursts: BurstClock::default(),
        })
    }

    /// Rider height inside the band
    pub fn height(&self) -> f32 {
        self.y
    }

    fn steer(&mut self, dt: f32, input: &SimInput) {
        match self.game.spec().input {
            InputKind::Drag => {
                if input.down {
                    let target = (1.0 - input.y.clamp(0.0, 1.0)) * BAND_HEIGHT;
                    self.vy = ((target - self.y) * TRACK_GAIN).clamp(-MAX_VY, MAX_VY);
                } else {
                    self.vy = 0.0;
                }
            }
            InputKind::Hold | InputKind::Tap => {
                let accel = if input.down { -SINK_ACCEL } else { RISE_ACCEL };
                self.vy = (self.vy + accel * dt).clamp(-MAX_VY, MAX_VY);
            }
        }
        self.y += self.vy * dt;
    }

    fn spawn_burst(&mut self) {
        let tuning = &self.base.tuning;
        let speed = tuning.effective_speed();
        let telegraph = tuning.effective_telegraph_seconds();
        let window = tuning.effective_decision_window_seconds();
        let count = tuning.effective_hazard_count();
        let reward = tuning.reward_mode();
        let mirrored = tuning.is_mirrored();

        let arrival = speed * (telegraph + window);
        let spacing = speed * window * GATE_SPACING;
        let gap_half = (GAP_BASE + window * GAP_PER_WINDOW).min(BAND_HEIGHT * 0.5 - GAP_MARGIN);
        let low = gap_half + GAP_MARGIN;
        let high = BAND_HEIGHT - gap_half - GAP_MARGIN;

        for k in 0..count {
            let center = lerp(low, high, self.base.random());
            self.gates.push(Gate {
                x: arrival + k as f32 * spacing,
                gap_center: if mirrored { BAND_HEIGHT - center } else { center },
                gap_half,
                age: 0.0,
                telegraph,
                scored: false,
            });
        }

        let burst = &self.gates[self.gates.len() - count as usize..];
        let coin = match (reward, burst.first(), burst.last()) {
            (RewardMode::None, _, _) => None,
            (RewardMode::Risk, _, Some(last)) => Some(Coin {
                pos: Vec2::new(last.x, last.gap_center + last.gap_half * 0.75),
                value: RISK_COIN_VALUE,
            }),
            (_, Some(first), _) => Some(Coin {
                pos: Vec2::new(first.x, first.gap_center),
                value: SAFE_COIN_VALUE,
            }),
            _ => Some(Coin {
                pos: Vec2::new(arrival, BAND_HEIGHT * 0.5),
                value: SAFE_COIN_VALUE,
            }),
        };
        self.coins.extend(coin);
    }
}

impl Simulation for WaveSim {
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

        self.steer(dt, input);
        if self.y < RIDER_RADIUS || self.y > BAND_HEIGHT - RIDER_RADIUS {
            self.base.kill("Left the wave");
            return;
        }

        if self.bursts.tick(dt, &self.base.tuning) {
            self.spawn_burst();
        }

        let travel = self.base.tuning.effective_speed() * dt;
        let rider = Vec2::new(0.0, self.y);

        for gate in &mut self.gates {
            gate.x -= travel;
            gate.age += dt;
            let hit = gate.lethal()
                && gate
                    .walls()
                    .iter()
                    .any(|wall| circle_aabb_overlap(rider, RIDER_RADIUS, wall));
            if hit {
                self.base.kill("Hit a gate");
            }
            if !gate.scored && gate.x + GATE_HALF_WIDTH < -RIDER_RADIUS {
                gate.scored = true;
                self.base.award(1);
            }
        }
        self.gates.retain(|g| g.x > DESPAWN_X);

        let base = &mut self.base;
        self.coins.retain_mut(|coin| {
            coin.pos.x -= travel;
            if circle_circle_overlap(rider, RIDER_RADIUS, coin.pos, COIN_RADIUS) {
                base.collect_coin(coin.value);
                return false;
            }
            coin.pos.x > DESPAWN_X
        });
    }

    fn draw(&self, frame: &mut Frame, width: f32, height: f32) {
        let top = height * 0.1;
        let bottom = height * 0.9;
        let origin_x = width * 0.2;
        let px_per_unit = (width - origin_x) / VIEW_LENGTH;
        let to_px = |p: Vec2| {
            Vec2::new(
                origin_x + p.x * px_per_unit,
                bottom - p.y / BAND_HEIGHT * (bottom - top),
            )
        };

        frame.rect(Vec2::new(0.0, top), Vec2::new(width, bottom), Paint::Track);

        for gate in self.gates.iter().filter(|g| g.x < VIEW_LENGTH) {
            let paint = if gate.lethal() { Paint::Hazard } else { Paint::Telegraph };
            for wall in gate.walls() {
                frame.rect(to_px(wall.min), to_px(wall.max), paint);
            }
        }

        for coin in self.coins.iter().filter(|c| c.pos.x < VIEW_LENGTH) {
            frame.circle(to_px(coin.pos), COIN_RADIUS * px_per_unit, Paint::Reward);
        }

        frame.circle(
            to_px(Vec2::new(0.0, self.y)),
            RIDER_RADIUS * px_per_unit,
            Paint::Player,
        );
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

    fn held() -> SimInput {
        SimInput {
            down: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_letting_go_floats_out_of_the_band() {
        let mut sim = WaveSim::new(GameId::WaveRider, 1).unwrap();
        run_steps(&mut sim, 60 * 3, |_, _| SimInput::default());
        assert!(sim.base().dead);
        assert_eq!(sim.base().note, "Left the wave");
    }

    #[test]
    fn test_holding_sinks_out_of_the_band() {
        let mut sim = WaveSim::new(GameId::WaveRider, 1).unwrap();
        run_steps(&mut sim, 60 * 3, |_, _| held());
        assert!(sim.base().dead);
        assert!(sim.height() < RIDER_RADIUS);
    }

    #[test]
    fn test_drag_tracks_pointer_height() {
        let mut sim = WaveSim::new(GameId::TideSkimmer, 1).unwrap();
        let pointer = SimInput {
            down: true,
            y: 0.25,
            ..Default::default()
        };
        for _ in 0..60 {
            sim.update(FIXED_STEP, &pointer, 800.0, 600.0);
        }
        assert!((sim.height() - 4.5).abs() < 0.05, "height {}", sim.height());
    }

    #[test]
    fn test_idle_skimmer_hits_a_gate() {
        let mut sim = WaveSim::new(GameId::TideSkimmer, 404).unwrap();
        run_steps(&mut sim, 60 * 120, |_, _| SimInput::default());
        assert!(sim.base().dead);
        assert_eq!(sim.base().note, "Hit a gate");
    }

    #[test]
    fn test_gaps_stay_inside_the_band() {
        let mut sim = WaveSim::new(GameId::WaveRider, 6).unwrap();
        sim.base.advance_tuning(FIXED_STEP, MIN_CHUNK_SECONDS).unwrap();
        for _ in 0..50 {
            sim.spawn_burst();
        }
        for gate in &sim.gates {
            assert!(gate.gap_center - gate.gap_half >= GAP_MARGIN - 1e-4);
            assert!(gate.gap_center + gate.gap_half <= BAND_HEIGHT - GAP_MARGIN + 1e-4);
            assert!(!gate.lethal());
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        // Hold for a third of every second to bob around the middle
        let script = |i: u32, _: &WaveSim| if i % 60 < 20 { held() } else { SimInput::default() };
        let mut a = WaveSim::new(GameId::WaveRider, 55).unwrap();
        let mut b = WaveSim::new(GameId::WaveRider, 55).unwrap();
        run_steps(&mut a, 1200, script);
        run_steps(&mut b, 1200, script);
        assert_eq!(a.height(), b.height());
        assert_eq!(a.base().dead, b.base().dead);
        assert_eq!(a.gates.len(), b.gates.len());
    }
}

//! Runtime harness
//!
//! Owns one simulation and drives it from the host's animation frames:
//! fixed-step scheduling, the ready / playing / game over lifecycle, input
//! edge handling, best score and currency persistence, and the draw list.
//!
//! Input handlers only write into the buffer; everything else happens inside
//! `frame`. Per step the order is always resample, select, update, then draw
//! once per frame.

use glam::Vec2;
use serde::Serialize;

use crate::error::ArcadeError;
use crate::games::{ArcadeSim, FailCondition, GameId};
use crate::highscores::{RunRecord, ScoreBook};
use crate::persistence::KeyValueStore;
use crate::settings::HarnessSettings;
use crate::sim::{FixedStepState, Frame, SimInput, Simulation, consume_with};

/// Multiplier used to derive per-run seeds
const RUN_SEED_MULTIPLIER: u64 = 2_654_435_761;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Ready,
    Playing,
    GameOver,
}

/// Keyboard keys the harness understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Same action as the pointer
    Space,
    /// Start over from game over
    Restart,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "KeyR" | "Enter" => Key::Restart,
            _ => Key::Other,
        }
    }
}

/// Input written by event handlers, read once per frame
#[derive(Debug, Clone, Copy, Default)]
struct InputBuffer {
    tap: bool,
    release: bool,
    pointer_down: bool,
    key_down: bool,
    /// Normalized pointer position
    x: f32,
    y: f32,
}

impl InputBuffer {
    fn snapshot(&self) -> SimInput {
        SimInput {
            tap: self.tap,
            release: self.release,
            down: self.pointer_down || self.key_down,
            x: self.x,
            y: self.y,
        }
    }

    fn clear_edges(&mut self) {
        self.tap = false;
        self.release = false;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HarnessEvent {
    PhaseChanged {
        from: RunPhase,
        to: RunPhase,
    },
    ChunkSelected {
        id: &'static str,
        pattern: String,
        tier: u8,
        mirrored: bool,
    },
    RunEnded {
        score: u64,
        best: u64,
        new_best: bool,
        coins: u32,
    },
    RunReset {
        version: u64,
    },
}

pub trait HarnessObserver {
    fn on_event(&mut self, event: &HarnessEvent);
}

impl<F: FnMut(&HarnessEvent)> HarnessObserver for F {
    fn on_event(&mut self, event: &HarnessEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(u64);

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub steps: u32,
    pub dt: f32,
    pub phase: RunPhase,
}

/// Everything a HUD overlay shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub game: GameId,
    pub title: &'static str,
    pub fail_condition: FailCondition,
    pub phase: RunPhase,
    pub score: u64,
    pub best: u64,
    pub new_best: bool,
    pub coins: u32,
    pub currency: u64,
    pub note: String,
    pub chunk: Option<String>,
    pub tier: Option<u8>,
    pub intensity: f32,
    pub onboarding: f32,
    pub elapsed_seconds: f32,
}

pub struct RuntimeHarness<G: Simulation, S: KeyValueStore> {
    sim: G,
    store: S,
    settings: HarnessSettings,
    scores: ScoreBook,
    phase: RunPhase,
    scheduler: FixedStepState,
    input: InputBuffer,
    frame: Frame,
    width: f32,
    height: f32,
    seed: u64,
    run_index: u64,
    reset_version: u64,
    applied_version: u64,
    last_record: Option<RunRecord>,
    observers: Vec<(SubscriptionId, Box<dyn HarnessObserver>)>,
    next_subscription: u64,
}

impl<S: KeyValueStore> RuntimeHarness<ArcadeSim, S> {
    /// Harness for a game from the static table
    pub fn for_game(
        game: GameId,
        store: S,
        settings: HarnessSettings,
        seed: u64,
        width: f32,
        height: f32,
    ) -> Result<Self, ArcadeError> {
        // `new` runs the one `init` with the first run's seed
        let sim = ArcadeSim::allocate(game, run_seed(seed, 0))?;
        Self::new(sim, store, settings, seed, width, height)
    }
}

impl<G: Simulation, S: KeyValueStore> RuntimeHarness<G, S> {
    pub fn new(
        mut sim: G,
        store: S,
        settings: HarnessSettings,
        seed: u64,
        width: f32,
        height: f32,
    ) -> Result<Self, ArcadeError> {
        let game = sim.game();
        let scores = ScoreBook::load(game, &store);
        let width = width.max(1.0);
        let height = height.max(1.0);
        sim.init(run_seed(seed, 0), width, height)?;
        log::info!("{} ready (seed {seed})", game.spec().title);

        Ok(Self {
            sim,
            store,
            settings: settings.sanitized(),
            scores,
            phase: RunPhase::Ready,
            scheduler: FixedStepState::new(),
            input: InputBuffer::default(),
            frame: Frame::new(width, height),
            width,
            height,
            seed,
            run_index: 0,
            reset_version: 0,
            applied_version: 0,
            last_record: None,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Advance by one animation frame of `frame_delta` seconds
    pub fn frame(&mut self, frame_delta: f32) -> Result<FrameReport, ArcadeError> {
        if self.reset_version != self.applied_version {
            self.apply_reset()?;
        }

        let mut input = self.input.snapshot();
        if self.phase == RunPhase::GameOver && input.tap {
            self.request_reset();
        }

        let step = consume_with(&mut self.scheduler, frame_delta, &self.settings);
        for _ in 0..step.steps {
            match self.phase {
                RunPhase::GameOver => break,
                RunPhase::Ready => {
                    self.sim.base_mut().t += step.dt;
                    if input.tap {
                        log::info!("{}: run started", self.sim.game());
                        self.set_phase(RunPhase::Playing);
                    }
                }
                RunPhase::Playing => {
                    self.sim.base_mut().t += step.dt;
                    let picked = self
                        .sim
                        .base_mut()
                        .advance_tuning(step.dt, self.settings.min_chunk_seconds)?;
                    if let Some(pattern) = picked {
                        let mirrored = self.sim.base().tuning.is_mirrored();
                        self.emit(HarnessEvent::ChunkSelected {
                            id: pattern.template.id,
                            pattern: pattern.pattern_name.clone(),
                            tier: pattern.tier(),
                            mirrored,
                        });
                    }
                    self.sim.update(step.dt, &input, self.width, self.height);
                    if self.sim.base().dead {
                        self.finish_run();
                    }
                }
            }
            // Edges belong to the first step only; the start tap is consumed too
            input = input.without_edges();
        }

        self.draw();
        self.input.clear_edges();

        Ok(FrameReport {
            steps: step.steps,
            dt: step.dt,
            phase: self.phase,
        })
    }

    /// Ask for a fresh run; applied at the start of the next frame
    pub fn request_reset(&mut self) -> u64 {
        self.reset_version += 1;
        self.reset_version
    }

    fn apply_reset(&mut self) -> Result<(), ArcadeError> {
        self.applied_version = self.reset_version;
        self.run_index += 1;
        let seed = run_seed(self.seed, self.run_index);
        self.sim.init(seed, self.width, self.height)?;
        self.scheduler.reset();
        self.input.clear_edges();
        self.last_record = None;
        self.set_phase(RunPhase::Ready);
        log::info!(
            "{}: reset to run {} (version {}, seed {seed})",
            self.sim.game(),
            self.run_index,
            self.reset_version
        );
        self.emit(HarnessEvent::RunReset {
            version: self.reset_version,
        });
        Ok(())
    }

    fn finish_run(&mut self) {
        let base = self.sim.base();
        let (score, coins) = (base.score, base.coins);
        let record = self.scores.record_run(&mut self.store, score, coins);
        self.last_record = Some(record);
        self.set_phase(RunPhase::GameOver);
        log::info!(
            "{}: game over, score {} (best {}), {} - {:.1}s",
            self.sim.game(),
            score,
            record.best,
            self.sim.base().note,
            self.sim.base().tuning.elapsed_seconds
        );
        self.emit(HarnessEvent::RunEnded {
            score,
            best: record.best,
            new_best: record.new_best,
            coins,
        });
    }

    fn set_phase(&mut self, to: RunPhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.emit(HarnessEvent::PhaseChanged { from, to });
        }
    }

    fn emit(&mut self, event: HarnessEvent) {
        for (_, observer) in &mut self.observers {
            observer.on_event(&event);
        }
    }

    fn draw(&mut self) {
        self.frame.begin(self.width, self.height);
        self.sim.draw(&mut self.frame, self.width, self.height);

        let base = self.sim.base();
        let margin = 16.0;
        self.frame.text(
            Vec2::new(margin, margin),
            format!("{}  best {}", base.score, self.scores.best()),
        );
        let center = Vec2::new(self.width * 0.5, self.height * 0.5);
        match self.phase {
            RunPhase::Ready => self.frame.text(center, "Tap to start"),
            RunPhase::Playing => {}
            RunPhase::GameOver => {
                let headline = if self.last_record.is_some_and(|r| r.new_best) {
                    "New best!"
                } else {
                    base.note.as_str()
                };
                self.frame.text(center, headline.to_string());
                self.frame
                    .text(center + Vec2::new(0.0, 32.0), "Tap to retry");
            }
        }
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.pointer_move(x, y);
        self.input.tap = true;
        self.input.pointer_down = true;
    }

    pub fn release(&mut self, x: f32, y: f32) {
        self.pointer_move(x, y);
        if self.input.pointer_down {
            self.input.release = true;
        }
        self.input.pointer_down = false;
    }

    /// Pointer position in canvas pixels
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.input.x = (x / self.width).clamp(0.0, 1.0);
            self.input.y = (y / self.height).clamp(0.0, 1.0);
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            // Auto-repeat keeps sending keydown while held
            Key::Space if !self.input.key_down => {
                self.input.tap = true;
                self.input.key_down = true;
            }
            Key::Restart if self.phase == RunPhase::GameOver => {
                self.request_reset();
            }
            _ => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if key == Key::Space && self.input.key_down {
            self.input.key_down = false;
            self.input.release = true;
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn HarnessObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn hud(&self) -> HudSnapshot {
        let base = self.sim.base();
        let tuning = &base.tuning;
        let game = self.sim.game();
        HudSnapshot {
            game,
            title: game.spec().title,
            fail_condition: game.spec().fail_condition,
            phase: self.phase,
            score: base.score,
            best: self.scores.best(),
            new_best: self.last_record.is_some_and(|r| r.new_best),
            coins: base.coins,
            currency: self.scores.currency(),
            note: base.note.clone(),
            chunk: tuning.pattern().map(|p| p.pattern_name.clone()),
            tier: tuning.pattern().map(|p| p.tier()),
            intensity: tuning.intensity(),
            onboarding: tuning.survivability.onboarding,
            elapsed_seconds: tuning.elapsed_seconds,
        }
    }

    /// Draw list from the last frame
    pub fn frame_list(&self) -> &Frame {
        &self.frame
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.width = width.max(1.0);
            self.height = height.max(1.0);
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn best(&self) -> u64 {
        self.scores.best()
    }

    pub fn currency(&self) -> u64 {
        self.scores.currency()
    }

    pub fn reset_version(&self) -> u64 {
        self.reset_version
    }

    pub fn settings(&self) -> &HarnessSettings {
        &self.settings
    }

    pub fn sim(&self) -> &G {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut G {
        &mut self.sim
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn run_seed(seed: u64, run_index: u64) -> u64 {
    seed.wrapping_mul(RUN_SEED_MULTIPLIER).wrapping_add(run_index)
}

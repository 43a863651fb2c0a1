//! Pulse Arcade headless runner
//!
//! Plays one game without a window: a scripted tapper (or nobody) drives
//! the harness at 60 fps and each run's outcome is printed. Handy for
//! checking pacing and chunk selection from the terminal:
//!
//! `RUST_LOG=debug pulse-arcade spiral-run --tap-every 0.8 --runs 3`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use clap::Parser;

    use pulse_arcade::games::GameId;
    use pulse_arcade::harness::{HarnessEvent, RunPhase, RuntimeHarness};
    use pulse_arcade::persistence::MemoryStore;
    use pulse_arcade::{ArcadeError, HarnessSettings};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    const FRAME_DT: f32 = 1.0 / 60.0;

    #[derive(Debug, Parser)]
    #[command(name = "pulse-arcade", about = "Run Pulse Arcade games headless")]
    struct Args {
        /// Game id, e.g. lane-dash or pulse-parry
        #[arg(default_value = "lane-dash")]
        game: String,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Runs to play back to back
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Give up on a run after this many seconds
        #[arg(long, default_value_t = 300.0)]
        seconds: f32,
        /// Tap every N seconds while playing (0 never taps)
        #[arg(long, default_value_t = 0.0)]
        tap_every: f32,
        /// Harness settings JSON
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print the final HUD of each run as JSON
        #[arg(long)]
        json: bool,
        /// List game ids and exit
        #[arg(long)]
        list: bool,
    }

    fn load_settings(path: Option<&PathBuf>) -> Result<HarnessSettings, ArcadeError> {
        let Some(path) = path else {
            return Ok(HarnessSettings::default());
        };
        match std::fs::read_to_string(path) {
            Ok(json) => HarnessSettings::from_json(&json),
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using default settings", path.display());
                Ok(HarnessSettings::default())
            }
        }
    }

    fn play(args: &Args) -> Result<(), ArcadeError> {
        let game: GameId = args.game.parse()?;
        let settings = load_settings(args.settings.as_ref())?;
        let mut harness =
            RuntimeHarness::for_game(game, MemoryStore::new(), settings, args.seed, WIDTH, HEIGHT)?;

        harness.subscribe(Box::new(|event: &HarnessEvent| {
            if let HarnessEvent::ChunkSelected { pattern, tier, .. } = event {
                log::debug!("chunk: {pattern} (tier {tier})");
            }
        }));

        let max_frames = (args.seconds.max(0.0) / FRAME_DT) as u32;
        let tap_frames = (args.tap_every / FRAME_DT).round() as u32;

        for run in 1..=args.runs {
            if run > 1 {
                harness.request_reset();
                harness.frame(FRAME_DT)?;
            }

            harness.press(WIDTH * 0.5, HEIGHT * 0.5);
            harness.frame(FRAME_DT)?;
            harness.release(WIDTH * 0.5, HEIGHT * 0.5);

            for i in 1..=max_frames {
                if tap_frames > 0 && i % tap_frames == 0 {
                    harness.press(WIDTH * 0.5, HEIGHT * 0.5);
                } else if tap_frames > 0 && i % tap_frames == 1 {
                    harness.release(WIDTH * 0.5, HEIGHT * 0.5);
                }
                if harness.frame(FRAME_DT)?.phase == RunPhase::GameOver {
                    break;
                }
            }

            let hud = harness.hud();
            println!(
                "{} run {run}: score {} coins {} in {:.1}s ({})",
                game,
                hud.score,
                hud.coins,
                hud.elapsed_seconds,
                if hud.phase == RunPhase::GameOver { hud.note.as_str() } else { "time limit" }
            );
            if args.json {
                match serde_json::to_string_pretty(&hud) {
                    Ok(json) => println!("{json}"),
                    Err(e) => log::warn!("Cannot encode HUD: {e}"),
                }
            }
        }

        println!("best {} currency {}", harness.best(), harness.currency());
        Ok(())
    }

    pub fn main() -> ExitCode {
        env_logger::init();
        let args = Args::parse();

        if args.list {
            for game in GameId::ALL {
                let spec = game.spec();
                println!("{:<14} {:<14} {:?}", game.as_str(), spec.title, spec.input);
            }
            return ExitCode::SUCCESS;
        }

        match play(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("{e}");
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`, this is just to satisfy the compiler
}

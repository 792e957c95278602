//! Find Pugie headless runner
//!
//! Plays a session with the demo player and logs every round. Rendering and
//! input belong to the platform frontend; this binary drives the engine with
//! a fixed frame time instead.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use find_pugie::autoplay::{Intent, choose_tap};
use find_pugie::consts::SIM_DT;
use find_pugie::persistence::{JsonFileStore, MemoryStore, ScoreStore};
use find_pugie::settings::Settings;
use find_pugie::sim::{Difficulty, RoundPhase, ScreenBounds, TapOutcome};
use find_pugie::{AudioManager, Game, Tuning};

#[derive(Parser, Debug)]
#[command(name = "find-pugie", about = "Headless Find Pugie session with the demo player")]
struct Args {
    /// Session seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Starting difficulty (easy, medium, hard)
    #[arg(long, default_value = "easy")]
    difficulty: Difficulty,

    /// Rounds to play before returning to the menu
    #[arg(long, default_value_t = 20)]
    rounds: u32,

    /// Screen width in pixels
    #[arg(long, default_value_t = 390.0)]
    width: f32,

    /// Screen height in pixels
    #[arg(long, default_value_t = 844.0)]
    height: f32,

    /// Balance overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Save file; in-memory when omitted
    #[arg(long)]
    save: Option<PathBuf>,

    /// Chance the demo player taps a decoy on purpose
    #[arg(long, default_value_t = 0.1)]
    miss_rate: f64,

    /// Motion ticks the player watches before each tap
    #[arg(long, default_value_t = 50)]
    think_ticks: u32,
}

/// Storage picked on the command line
enum Store {
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl ScoreStore for Store {
    fn load_high_score(&mut self) -> u32 {
        match self {
            Store::File(s) => s.load_high_score(),
            Store::Memory(s) => s.load_high_score(),
        }
    }

    fn save_high_score(&mut self, score: u32) {
        match self {
            Store::File(s) => s.save_high_score(score),
            Store::Memory(s) => s.save_high_score(score),
        }
    }

    fn load_settings(&mut self) -> Settings {
        match self {
            Store::File(s) => s.load_settings(),
            Store::Memory(s) => s.load_settings(),
        }
    }

    fn save_settings(&mut self, settings: &Settings) {
        match self {
            Store::File(s) => s.save_settings(settings),
            Store::Memory(s) => s.save_settings(settings),
        }
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let args = Args::parse();

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let mut store = match &args.save {
        Some(path) => Store::File(JsonFileStore::open(path)),
        None => Store::Memory(MemoryStore::new()),
    };
    let audio = AudioManager::from_settings(&store.load_settings());
    let seed = args.seed.unwrap_or_else(find_pugie::platform::session_seed);
    let bounds = ScreenBounds::new(args.width, args.height);

    log::info!("Find Pugie (headless) starting...");
    let mut game = Game::new(tuning, bounds, seed, store, audio).context("creating session")?;
    let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);

    let mut wins = 0u32;
    let mut losses = 0u32;
    let mut clouds = 0u32;

    game.start_round(args.difficulty)?;
    for round in 0..args.rounds {
        while game.is_active() {
            for _ in 0..args.think_ticks {
                game.advance(SIM_DT);
            }
            let Some(target) = game.target().cloned() else {
                break;
            };
            let intent = choose_tap(
                game.entities(),
                &target,
                game.tuning().icon_radius,
                args.miss_rate,
                &mut player,
            );
            match game.on_tap(intent.point()) {
                Some(TapOutcome::CloudRemoved(_)) => clouds += 1,
                Some(TapOutcome::TargetHit) => wins += 1,
                Some(TapOutcome::DecoyHit(_)) => losses += 1,
                Some(TapOutcome::Miss) | None => {}
            }
            if let Intent::Blunder(_) = intent {
                log::debug!("Demo player blundered on purpose");
            }
            for cue in game.audio_mut().drain() {
                log::trace!("cue {:?} at {:.2}", cue.effect, cue.volume);
            }
        }

        if round + 1 == args.rounds {
            break;
        }
        match game.phase() {
            RoundPhase::Won => game.continue_round()?,
            RoundPhase::Lost => game.retry_round()?,
            RoundPhase::Playing | RoundPhase::Ended => break,
        };
    }
    game.end_session();

    println!(
        "seed {seed}: {wins} wins, {losses} losses, {clouds} clouds cleared, final difficulty {}, high score {}",
        game.difficulty().as_str(),
        game.high_score()
    );
    Ok(())
}

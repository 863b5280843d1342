//! Uber Jump headless driver
//!
//! Plays one run against the reference physics with a scripted tilt sensor
//! and logs what a HUD would show. Usage:
//!
//! ```text
//! uber-jump [LEVEL.json] [SAVE.json] [--tuning TUNING.json]
//! uber-jump --seed N [--end-y HEIGHT] [--tuning TUNING.json]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use uber_jump::consts::SIM_DT;
use uber_jump::persistence::JsonFileStore;
use uber_jump::platform::{TiltMailbox, TiltSampler};
use uber_jump::sim::{ContactTracker, GameEvent, RunController, SimpleBody, TickInput};
use uber_jump::{LevelLayout, Tuning, level};

/// Give up after two minutes of play
const MAX_FRAMES: u32 = 120 * 60;

#[derive(Parser)]
#[command(name = "uber-jump")]
#[command(about = "Play one headless Uber Jump run")]
struct Args {
    /// Level document (defaults to the bundled level)
    level: Option<PathBuf>,

    /// Save file holding the high score and star count
    #[arg(default_value = "uber_jump_save.json")]
    save: PathBuf,

    /// JSON file overriding gameplay tuning
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Play a generated level built from this seed instead of a level file
    #[arg(long, conflicts_with = "level")]
    seed: Option<u64>,

    /// Height of the generated level
    #[arg(long, default_value_t = 6000)]
    end_y: i64,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Uber Jump (headless) starting...");

    let args = Args::parse();

    let layout = match (&args.seed, &args.level) {
        (Some(seed), _) => LevelLayout::load(&level::generate(*seed, args.end_y)),
        (None, Some(path)) => LevelLayout::from_path(path),
        (None, None) => LevelLayout::builtin(),
    };
    let layout = match layout {
        Ok(layout) => layout,
        Err(e) => {
            log::error!("Cannot start run: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tuning = match &args.tuning {
        Some(path) => match Tuning::from_path(path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Cannot start run: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let mailbox = TiltMailbox::new();

    // Slow side-to-side sway standing in for the accelerometer
    let mut phase = 0.0f32;
    let sampler = TiltSampler::spawn(
        move || {
            phase += 0.35;
            Some(phase.sin() * 0.6)
        },
        mailbox.clone(),
        Duration::from_millis(tuning.tilt_interval_ms),
        tuning.tilt_sample_weight,
    );
    let sampler = match sampler {
        Ok(sampler) => Some(sampler),
        Err(e) => {
            log::warn!("Tilt sampler unavailable, playing without steering: {}", e);
            None
        }
    };

    let gravity = tuning.gravity;
    let player_mass = tuning.player_mass;
    let mut controller = RunController::new(layout, tuning, JsonFileStore::new(args.save));
    let mut body = SimpleBody::new(controller.player_start()).with_mass(player_mass);
    let mut contacts = ContactTracker::new();

    for frame in 0..MAX_FRAMES {
        body.integrate(SIM_DT, gravity);

        for contact in contacts.begin_contacts(body.pos, controller.world()) {
            controller.handle_contact(&mut body, contact);
        }

        let input = TickInput {
            tap: frame == 0,
            tilt: mailbox.snapshot(),
        };
        controller.step(&mut body, &input);

        for event in controller.drain_events() {
            match event {
                GameEvent::ScoreChanged(score) => log::debug!("Score: {}", score),
                GameEvent::StarsChanged(stars) => println!("Stars: {}", stars),
                GameEvent::ObjectRemoved { id, reason } => {
                    log::debug!("Removed {:?} ({:?})", id, reason)
                }
                GameEvent::Sound(cue) => log::debug!("Sound: {:?}", cue),
                GameEvent::GameOver {
                    score,
                    stars,
                    high_score,
                    outcome,
                } => {
                    println!(
                        "Game over ({:?}) - score {}, stars {}, high score {}",
                        outcome, score, stars, high_score
                    );
                }
            }
        }

        if controller.run().is_over() {
            break;
        }

        std::thread::sleep(Duration::from_secs_f32(SIM_DT));
    }

    if !controller.run().is_over() {
        println!(
            "Time up - height {}, score {}",
            controller.run().max_height,
            controller.run().score
        );
    }

    if let Some(sampler) = sampler {
        sampler.stop();
    }
    ExitCode::SUCCESS
}

//! Headless demo runner
//!
//! Drives the simulation core with a simple scripted pilot for a fixed
//! number of ticks and logs what happened. Useful for eyeballing balance
//! changes without a renderer; pass a JSON config path as the first
//! argument to override the built-in tuning.

use std::process::ExitCode;

use glam::Vec2;
use rand::Rng;

use neon_swarm::sim::{tick, GameEvent, GamePhase, GameState, TickInput};
use neon_swarm::GameConfig;

/// Demo length in simulated seconds
const DEMO_SECS: u32 = 120;

fn main() -> ExitCode {
    env_logger::init();

    let cfg = match load_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let seed: u64 = rand::rng().random();
    let mut state = GameState::new(&cfg, seed);
    log::info!("demo run, seed {seed}");

    // Leave the menu
    let mut input = TickInput {
        start: true,
        ..TickInput::default()
    };
    tick(&mut state, &input, &cfg);

    let mut sounds = 0usize;
    for _ in 0..DEMO_SECS * cfg.game.fps {
        input = pilot(&state);
        tick(&mut state, &input, &cfg);
        sounds += state
            .take_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(_)))
            .count();
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "survived {:.1}s, score {}, difficulty level {}, {} sound events",
        state.play_time_secs(&cfg),
        state.score(),
        state.difficulty_level(),
        sounds
    );
    ExitCode::SUCCESS
}

fn load_config() -> Result<GameConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let cfg = GameConfig::from_json_str(&text)?;
            log::info!("loaded config from {path}");
            Ok(cfg)
        }
        None => Ok(GameConfig::default()),
    }
}

/// Scripted pilot: strafe away from the nearest enemy, aim at it, pop the
/// power-up the moment the meter fills
fn pilot(state: &GameState) -> TickInput {
    let mut input = TickInput {
        activate: state.energy >= 1.0,
        ..TickInput::default()
    };

    let player = state.player.aabb.center();
    let nearest = state
        .enemies
        .iter()
        .map(|e| e.aabb.center())
        .min_by(|a, b| {
            a.distance_squared(player)
                .partial_cmp(&b.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    if let Some(target) = nearest {
        let to_target = target - player;
        set_axis(
            to_target,
            &mut input.aim_left,
            &mut input.aim_right,
            &mut input.aim_up,
            &mut input.aim_down,
        );
        set_axis(
            -to_target,
            &mut input.move_left,
            &mut input.move_right,
            &mut input.move_up,
            &mut input.move_down,
        );
    }
    input
}

/// Quantize a direction vector onto 8-way key booleans
fn set_axis(dir: Vec2, left: &mut bool, right: &mut bool, up: &mut bool, down: &mut bool) {
    // Ignore a near-zero axis so we don't jitter between keys
    let threshold = dir.length() * 0.38;
    if dir.x < -threshold {
        *left = true;
    } else if dir.x > threshold {
        *right = true;
    }
    if dir.y < -threshold {
        *up = true;
    } else if dir.y > threshold {
        *down = true;
    }
}

//! Headless Battle Runner
//!
//! Runs a skirmish at a fixed frame rate without a renderer and prints the
//! result as JSON or text.

use std::path::PathBuf;

use clap::Parser;
use grid_skirmish::battle::{
    BattleOutcome, BattleState, CommandInput, FormationKind, FrameClock, SpawnRequest, Team,
    UpgradeLevels,
};
use grid_skirmish::core::error::Result;
use grid_skirmish::core::types::Vec2;
use grid_skirmish::core::SimulationConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Battle Runner - blue vs red skirmish on the standard battlefield
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Run a grid skirmish headlessly and report the result")]
struct Args {
    /// Number of blue units
    #[arg(long, default_value_t = 12)]
    blue: u32,

    /// Number of red units
    #[arg(long, default_value_t = 12)]
    red: u32,

    /// Attack upgrade level (player team only)
    #[arg(long, default_value_t = 0)]
    attack_upgrades: u32,

    /// Health upgrade level (all units)
    #[arg(long, default_value_t = 0)]
    health_upgrades: u32,

    /// Speed upgrade level (player team only)
    #[arg(long, default_value_t = 0)]
    speed_upgrades: u32,

    /// Simulation speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f32,

    /// Wall-clock milliseconds per frame
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Maximum frames before giving up (undecided)
    #[arg(long, default_value_t = 20_000)]
    max_frames: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file overriding simulation defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Opening command for the player team, as "x,y"
    #[arg(long, value_parser = parse_point)]
    command: Option<Vec2>,

    /// Formation for the opening command (line, wedge, column); without it
    /// the command moves only the nearest unit
    #[arg(long)]
    formation: Option<FormationKind>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    outcome: String,
    frames: u64,
    ticks: u64,
    sim_seconds: f32,
    credits_earned: u64,
    corpses_removed: u64,
    blue_alive: usize,
    red_alive: usize,
    seed: u64,
}

fn parse_point(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got '{}'", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x '{}': {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y '{}': {}", y, e))?;
    Ok(Vec2::new(x, y))
}

fn outcome_label(outcome: BattleOutcome) -> String {
    match outcome {
        BattleOutcome::Undecided => "undecided".to_string(),
        BattleOutcome::Victory(Team::Blue) => "blue_victory".to_string(),
        BattleOutcome::Victory(Team::Red) => "red_victory".to_string(),
        BattleOutcome::Draw => "draw".to_string(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_skirmish=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };

    let request = SpawnRequest::new(args.blue, args.red).with_upgrades(UpgradeLevels {
        attack: args.attack_upgrades,
        health: args.health_upgrades,
        speed: args.speed_upgrades,
    });
    let mut state = BattleState::from_spawn(config, &request)?;

    if let Some(point) = args.command {
        let input = match args.formation {
            Some(kind) => {
                state.select_formation(kind);
                CommandInput::formation_to(point)
            }
            None => CommandInput::move_to(point),
        };
        let outcome = state.command(&input);
        tracing::info!("Opening command: {:?}", outcome);
    }

    let mut clock = FrameClock::starting_at(0.0);
    let mut frames = 0u64;
    while !state.is_finished() && frames < args.max_frames {
        frames += 1;
        let input = clock.frame(frames as f64 * args.frame_ms, args.speed, true);
        let report = state.run_tick(&input, &mut rng);

        for event in &report.events {
            tracing::debug!("[{}] {}", event.tick, event.description);
        }
    }

    let strength = state.strength();
    let result = RunResult {
        outcome: outcome_label(state.outcome),
        frames,
        ticks: state.tick,
        sim_seconds: state.sim_time,
        credits_earned: state.credits_earned,
        corpses_removed: state.corpses_removed,
        blue_alive: strength.blue_alive,
        red_alive: strength.red_alive,
        seed,
    };

    if args.format == "text" {
        println!("=== Battle Result ===");
        println!("Outcome: {}", result.outcome);
        println!("Frames: {} ({:.1}s simulated)", result.frames, result.sim_seconds);
        println!("Survivors: blue {} / red {}", result.blue_alive, result.red_alive);
        println!(
            "Credits: {} from {} corpses",
            result.credits_earned, result.corpses_removed
        );
        println!("Seed: {}", result.seed);
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

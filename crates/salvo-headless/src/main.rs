//! Headless Salvo runner.
//!
//! Plays one computer-vs-computer round without a window and reports how it
//! ended. Logging goes through `tracing`; set `RUST_LOG` to change the filter.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use salvo_core::{hash_simulation, GameConfig, Outcome, SimEvent, Simulation};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Plays a computer-vs-computer artillery round without a window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Master seed of the round
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// JSON file with game configuration overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Give up after this many frames
    #[arg(long, default_value_t = 36_000)]
    max_frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Print the summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// What happened during a round.
#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    frames: u64,
    turns: usize,
    shots: usize,
    explosions: usize,
    outcome: Option<Outcome>,
    state_hash: u64,
}

impl Summary {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::TurnStateChanged { from, to } => debug!(%from, %to, "state"),
            SimEvent::TurnStarted {
                team,
                unit,
                computer,
            } => {
                self.turns += 1;
                debug!(team, %unit, computer, "turn");
            }
            SimEvent::WeaponFired { unit, charge, .. } => {
                self.shots += 1;
                debug!(%unit, charge, "shot");
            }
            SimEvent::Explosion {
                center, cleared, ..
            } => {
                self.explosions += 1;
                debug!(x = center.x, y = center.y, cleared, "explosion");
            }
            SimEvent::GameOver { outcome } => self.outcome = Some(*outcome),
            SimEvent::Bounce { .. } | SimEvent::BodyExpired { .. } => {}
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if config.primary_is_human {
        info!("no input device, handing the primary team to the AI");
        config.primary_is_human = false;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<Summary> {
    let config = load_config(args.config.as_ref())?;
    anyhow::ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "frame time must be positive, got {}",
        args.dt
    );

    let mut sim = Simulation::new(config, args.seed).context("creating simulation")?;
    let mut summary = Summary {
        seed: args.seed,
        ..Summary::default()
    };

    while !sim.is_over() && sim.frame() < args.max_frames {
        sim.advance(args.dt);
        for event in sim.drain_events() {
            summary.record(&event);
        }
    }

    if !sim.is_over() {
        warn!(frames = sim.frame(), "frame limit reached before the round ended");
    }
    summary.frames = sim.frame();
    summary.state_hash = hash_simulation(&sim);
    Ok(summary)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let summary = run(&args)?;
    match summary.outcome {
        Some(outcome) => info!(
            %outcome,
            frames = summary.frames,
            turns = summary.turns,
            shots = summary.shots,
            "{}",
            outcome.message()
        ),
        None => info!(frames = summary.frames, turns = summary.turns, "round undecided"),
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use salvo_core::entity::BodyId;

    fn args(max_frames: u64) -> Args {
        Args {
            seed: 3,
            config: None,
            max_frames,
            dt: 1.0 / 60.0,
            json: false,
        }
    }

    #[test]
    fn default_config_is_all_computer() {
        let config = load_config(None).unwrap();
        assert!(!config.primary_is_human);
        assert_eq!(config.map_width, GameConfig::default().map_width);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/salvo.json");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn frame_cap_stops_the_round() {
        let summary = run(&args(5)).unwrap();
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.seed, 3);
        assert_eq!(summary.outcome, None);
    }

    #[test]
    fn bad_frame_time_is_rejected() {
        let mut args = args(5);
        args.dt = 0.0;
        assert!(run(&args).is_err());
    }

    #[test]
    fn summary_counts_events() {
        let mut summary = Summary::default();
        summary.record(&SimEvent::TurnStarted {
            team: 1,
            unit: BodyId::new(2),
            computer: true,
        });
        summary.record(&SimEvent::WeaponFired {
            unit: BodyId::new(2),
            projectile: BodyId::new(9),
            charge: 0.75,
        });
        summary.record(&SimEvent::GameOver {
            outcome: Outcome::Draw,
        });
        assert_eq!(summary.turns, 1);
        assert_eq!(summary.shots, 1);
        assert_eq!(summary.outcome, Some(Outcome::Draw));
    }

    #[test]
    fn cli_parses_flags() {
        let args = Args::parse_from(["salvo-headless", "--seed", "9", "--max-frames", "100", "--json"]);
        assert_eq!(args.seed, 9);
        assert_eq!(args.max_frames, 100);
        assert!(args.json);
        assert!(args.config.is_none());
    }
}

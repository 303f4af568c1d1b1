// Mat Match Runner: one seeded match, event log to CSV
//
// Usage:
//   cargo run --bin simulate -- --catalog data/techniques.csv --fighters data/fighters.json
//   cargo run --bin simulate -- ... --seed 7 --max-clock 300 --export-net Output/net.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grapple_engine::event_log;
use grapple_engine::*;

/// Simulate a single grappling match over the technique net
#[derive(Parser, Debug)]
#[command(name = "simulate")]
struct Args {
    /// Technique catalog (CSV)
    #[arg(long, default_value = "data/techniques.csv")]
    catalog: PathBuf,

    /// Fighter profiles keyed "A" and "O" (JSON)
    #[arg(long, default_value = "data/fighters.json")]
    fighters: PathBuf,

    /// Optional match config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Clock ceiling in seconds, overrides the config
    #[arg(long)]
    max_clock: Option<u32>,

    /// Directory for the event log
    #[arg(long, default_value = "Output")]
    out_dir: PathBuf,

    /// Also write the net structure, with repertoire highlights, as JSON
    #[arg(long)]
    export_net: Option<PathBuf>,
}

fn main() -> Result<()> {
    grapple_engine::logging::init();

    let args = Args::parse();

    let mut model = MatchModel::load(&args.catalog, args.config.as_deref())
        .with_context(|| format!("failed to build model from {}", args.catalog.display()))?;
    if let Some(max_clock) = args.max_clock {
        model.config.max_clock = max_clock;
    }
    let fighters = Fighters::load(&args.fighters)
        .with_context(|| format!("failed to load fighters from {}", args.fighters.display()))?;

    if let Some(path) = &args.export_net {
        NetGraph::describe(&model.net, Some(&fighters))
            .write_to_path(path)
            .with_context(|| format!("failed to export net to {}", path.display()))?;
        println!("Net structure written to {}", path.display());
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut sim = MatchSimulation::with_seed(&model, fighters, seed);
    let report = sim.run().context("simulation aborted")?;

    let log_path = args.out_dir.join(event_log::log_file_name(&chrono::Local::now()));
    event_log::write_to_path(&log_path, &report.events)
        .with_context(|| format!("failed to write event log {}", log_path.display()))?;

    println!("Seed: {seed}");
    match report.verdict() {
        Verdict::Submission(winner) => {
            let technique = report
                .finishing_event()
                .map(|e| e.transition.as_str())
                .unwrap_or("unknown");
            println!("Submission at {}s. Winner: {winner} ({technique})", report.clock);
        }
        Verdict::Stalemate => {
            println!(
                "Stalemate at {}s: no enabled techniques. Score A {} - O {}",
                report.clock, report.score_a, report.score_o
            );
        }
        Verdict::Points(winner) => {
            println!(
                "Time limit. Score A {} - O {}. Winner on points: {winner}",
                report.score_a, report.score_o
            );
        }
        Verdict::Draw => {
            println!("Time limit. Score A {} - O {}. Draw", report.score_a, report.score_o);
        }
    }
    println!("Event log: {}", log_path.display());
    Ok(())
}

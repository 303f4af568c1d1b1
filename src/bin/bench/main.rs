// Mat Benchmark Runner v0.2.0: Monte Carlo match aggregation
// N seeded matches on one catalog and fighter pair, or a folder of saved logs
//
// Usage:
//   cargo run --release --bin bench -- --catalog data/techniques.csv --fighters data/fighters.json
//   cargo run --release --bin bench -- ... --runs 200 --seed 42     # Custom batch
//   cargo run --release --bin bench -- ... --logs                   # Keep per-run event logs
//   cargo run --release --bin bench -- ... --from-logs Output/      # Aggregate saved logs

mod metrics;
mod monte_carlo;
mod report;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use grapple_engine::*;

use report::*;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

/// Monte Carlo aggregation of simulated grappling matches
#[derive(Parser, Debug)]
#[command(name = "bench")]
struct CliArgs {
    /// Technique catalog (CSV)
    #[arg(long, default_value = "data/techniques.csv")]
    catalog: PathBuf,

    /// Fighter profiles keyed "A" and "O" (JSON)
    #[arg(long, default_value = "data/fighters.json")]
    fighters: PathBuf,

    /// Optional match config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Matches to run
    #[arg(long, default_value_t = 30)]
    runs: usize,

    /// Seed of the first match; match i uses seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Write each match's event log under <out-dir>/logs-<timestamp>/
    #[arg(long)]
    logs: bool,

    /// Aggregate existing event logs in this folder instead of simulating
    #[arg(long)]
    from_logs: Option<PathBuf>,

    /// Report directory
    #[arg(long, default_value = "benchmark-results")]
    out_dir: PathBuf,
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    grapple_engine::logging::init();

    let cli = CliArgs::parse();
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    let model = MatchModel::load(&cli.catalog, cli.config.as_deref())
        .with_context(|| format!("failed to build model from {}", cli.catalog.display()))?;

    let suite_start = Instant::now();
    let results = match &cli.from_logs {
        Some(dir) => {
            println!("\n  Mat Benchmark Runner v0.2.0");
            println!("  Aggregating saved logs in {}\n", dir.display());
            monte_carlo::analyze_logs(dir, &model.catalog)?
        }
        None => {
            let fighters = Fighters::load(&cli.fighters)
                .with_context(|| format!("failed to load fighters from {}", cli.fighters.display()))?;
            let log_dir = cli.logs.then(|| cli.out_dir.join(format!("logs-{timestamp}")));

            println!("\n  Mat Benchmark Runner v0.2.0");
            println!("  PRNG: ChaCha8Rng | Runs: {} | Base seed: {}", cli.runs, cli.seed);
            println!(
                "  Net: {} places, {} transitions, {} arcs\n",
                model.net.places().len(),
                model.net.transitions().len(),
                model.net.arc_count()
            );
            monte_carlo::run_monte_carlo(&model, &fighters, cli.runs, cli.seed, log_dir.as_deref())?
        }
    };
    let suite_elapsed = suite_start.elapsed();

    print_summary(&results);
    println!("  Matches: {}  Suite time: {:.1}s\n", results.n_runs, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.2.0",
        prng: "ChaCha8Rng",
        catalog: cli.catalog.display().to_string(),
        fighters: cli.fighters.display().to_string(),
        results,
    };

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("failed to create {}", cli.out_dir.display()))?;
    let path = cli.out_dir.join(format!("bench-{timestamp}.json"));
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("  Results saved to: {}\n", path.display());
    Ok(())
}

fn print_summary(r: &MonteCarloReport) {
    println!("  {:<28} {:>12} {:>12}", "Metric", "A", "O");
    println!("  {}", "-".repeat(54));
    println!(
        "  {:<28} {:>5} ({:>2}S/{:>2}P) {:>5} ({:>2}S/{:>2}P)",
        "Wins",
        r.wins_a.total,
        r.wins_a.by_submission,
        r.wins_a.by_points,
        r.wins_o.total,
        r.wins_o.by_submission,
        r.wins_o.by_points
    );
    println!("  {:<28} {:>11.1}% {:>11.1}%", "Win probability", r.wins_a.win_pct, r.wins_o.win_pct);
    println!(
        "  {:<28} {:>11.1}% {:>11.1}%",
        "Wins by submission",
        r.wins_a.submission_pct,
        r.wins_o.submission_pct
    );
    println!(
        "  {:<28} {:>6.2}±{:<5.2} {:>6.2}±{:<5.2}",
        "Final score",
        r.score_a.mean,
        r.score_a.pop_std_dev,
        r.score_o.mean,
        r.score_o.pop_std_dev
    );
    println!(
        "  {:<28} {:>6.2} cv{:<4.2} {:>6.2} cv{:<4.2}",
        "Mean hold (s)",
        r.hold_a.mean,
        r.hold_cv_a,
        r.hold_o.mean,
        r.hold_cv_o
    );
    println!(
        "  {:<28} {:>11.1}% {:>11.1}%",
        "Effectiveness",
        r.effectiveness_a.mean,
        r.effectiveness_o.mean
    );
    println!("  {}", "-".repeat(54));
    println!(
        "  Duration: {:.1}±{:.1}s  Draws: {}  Stalemates: {}",
        r.duration.mean, r.duration.pop_std_dev, r.draws, r.stalemates
    );
}

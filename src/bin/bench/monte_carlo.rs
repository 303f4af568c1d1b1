// Monte Carlo Infrastructure: N matches per batch with statistical aggregation
// Match i runs with seed base + i on the same model and fighters

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use grapple_engine::event_log;
use grapple_engine::*;

use crate::metrics::MatchMetrics;
use crate::report::*;

/// Run a single match with a specific seed, optionally saving its log.
pub fn run_single(
    model: &MatchModel,
    fighters: &Fighters,
    seed: u64,
    log_dir: Option<&Path>,
) -> Result<(MatchMetrics, MatchReport)> {
    let start = Instant::now();
    let mut sim = MatchSimulation::with_seed(model, fighters.clone(), seed);
    let report = sim.run().with_context(|| format!("match with seed {seed} failed"))?;

    if let Some(dir) = log_dir {
        let path = dir.join(format!("seed-{seed}.csv"));
        event_log::write_to_path(&path, &report.events)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let stalemate = report.status == MatchStatus::EndedStalemate;
    let mut metrics = MatchMetrics::from_events(format!("seed-{seed}"), &report.events, &model.catalog, stalemate);
    metrics.elapsed_ms = start.elapsed().as_millis();
    Ok((metrics, report))
}

/// Run Monte Carlo: N matches, aggregate stats.
pub fn run_monte_carlo(
    model: &MatchModel,
    fighters: &Fighters,
    n_runs: usize,
    base_seed: u64,
    log_dir: Option<&Path>,
) -> Result<MonteCarloReport> {
    let mut results = Vec::with_capacity(n_runs);
    let mut usage = BTreeMap::new();
    for i in 0..n_runs {
        let seed = base_seed + i as u64;
        let (metrics, report) = run_single(model, fighters, seed, log_dir)?;
        tally_usage(&mut usage, &report.events);
        results.push(metrics);
    }

    Ok(aggregate(results, usage, Some(base_seed)))
}

/// Aggregate every `*.csv` event log found in `dir`, in file-name order.
pub fn analyze_logs(dir: &Path, catalog: &Catalog) -> Result<MonteCarloReport> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("cannot list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();
    anyhow::ensure!(!paths.is_empty(), "no event logs found in {}", dir.display());

    let mut results = Vec::with_capacity(paths.len());
    let mut usage = BTreeMap::new();
    for path in &paths {
        let events = event_log::read_path(path).with_context(|| format!("failed to read {}", path.display()))?;
        tally_usage(&mut usage, &events);
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        results.push(MatchMetrics::from_events(source, &events, catalog, false));
    }
    Ok(aggregate(results, usage, None))
}

fn tally_usage(usage: &mut BTreeMap<String, BTreeMap<String, u32>>, events: &[Event]) {
    for event in events {
        *usage
            .entry(event.actor.to_string())
            .or_default()
            .entry(event.technique_id.clone())
            .or_default() += 1;
    }
}

/// Aggregate individual matches into a MonteCarloReport.
pub fn aggregate(
    results: Vec<MatchMetrics>,
    technique_usage: BTreeMap<String, BTreeMap<String, u32>>,
    base_seed: Option<u64>,
) -> MonteCarloReport {
    let duration = stats_of(&results, |m| f64::from(m.duration));
    let score_a = stats_of(&results, |m| f64::from(m.score_a));
    let score_o = stats_of(&results, |m| f64::from(m.score_o));
    let hold_a = stats_of(&results, |m| m.mean_hold(Role::A));
    let hold_o = stats_of(&results, |m| m.mean_hold(Role::O));
    let effectiveness_a = stats_of(&results, |m| m.effectiveness(Role::A));
    let effectiveness_o = stats_of(&results, |m| m.effectiveness(Role::O));

    let mut wins_a = WinTally::default();
    let mut wins_o = WinTally::default();
    let (mut draws, mut stalemates) = (0, 0);
    for m in &results {
        match m.verdict {
            Verdict::Submission(Role::A) => wins_a.by_submission += 1,
            Verdict::Submission(Role::O) => wins_o.by_submission += 1,
            Verdict::Points(Role::A) => wins_a.by_points += 1,
            Verdict::Points(Role::O) => wins_o.by_points += 1,
            Verdict::Draw => draws += 1,
            Verdict::Stalemate => stalemates += 1,
        }
    }
    finish_tallies(&mut wins_a, &mut wins_o);

    MonteCarloReport {
        n_runs: results.len(),
        base_seed,
        hold_cv_a: hold_a.coefficient_of_variation(),
        hold_cv_o: hold_o.coefficient_of_variation(),
        duration,
        score_a,
        score_o,
        hold_a,
        hold_o,
        effectiveness_a,
        effectiveness_o,
        wins_a,
        wins_o,
        draws,
        stalemates,
        technique_usage,
        individual_runs: results,
    }
}

fn stats_of(results: &[MatchMetrics], metric: impl Fn(&MatchMetrics) -> f64) -> Stats {
    Stats::from_samples(&results.iter().map(metric).collect::<Vec<_>>())
}

fn finish_tallies(a: &mut WinTally, o: &mut WinTally) {
    a.total = a.by_submission + a.by_points;
    o.total = o.by_submission + o.by_points;
    let decided = a.total + o.total;
    for tally in [a, o] {
        if decided > 0 {
            tally.win_pct = f64::from(tally.total) / f64::from(decided) * 100.0;
        }
        if tally.total > 0 {
            tally.submission_pct = f64::from(tally.by_submission) / f64::from(tally.total) * 100.0;
        }
    }
}

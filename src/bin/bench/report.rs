// Benchmark Report Types
// Structured output of a Monte Carlo batch, written as pretty JSON

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::MatchMetrics;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    /// Sample standard deviation (n - 1).
    pub std_dev: f64,
    /// Population standard deviation (n).
    pub pop_std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
                pop_std_dev: 0.0,
                ci_lower: 0.0,
                ci_upper: 0.0,
                min: 0.0,
                max: 0.0,
                n: 0,
            };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let squares = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        let variance = if n > 1 { squares / (n - 1) as f64 } else { 0.0 };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            pop_std_dev: (squares / n as f64).sqrt(),
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    /// Population coefficient of variation; zero when the mean is not positive.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean > 0.0 {
            self.pop_std_dev / self.mean
        } else {
            0.0
        }
    }
}

// ─── Win Tally ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize)]
pub struct WinTally {
    pub by_submission: u32,
    pub by_points: u32,
    pub total: u32,
    /// Share of all decided matches won, %.
    pub win_pct: f64,
    /// Share of this fighter's wins that came by submission, %.
    pub submission_pct: f64,
}

// ─── Monte Carlo Report ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    pub n_runs: usize,
    pub base_seed: Option<u64>,
    pub duration: Stats,
    pub score_a: Stats,
    pub score_o: Stats,
    pub hold_a: Stats,
    pub hold_o: Stats,
    pub hold_cv_a: f64,
    pub hold_cv_o: f64,
    pub effectiveness_a: Stats,
    pub effectiveness_o: Stats,
    pub wins_a: WinTally,
    pub wins_o: WinTally,
    pub draws: u32,
    pub stalemates: u32,
    /// Attempts per technique id, keyed by acting role.
    pub technique_usage: BTreeMap<String, BTreeMap<String, u32>>,
    pub individual_runs: Vec<MatchMetrics>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub catalog: String,
    pub fighters: String,
    pub results: MonteCarloReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_known_samples() {
        let stats = Stats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.pop_std_dev, 2.0);
        assert!(stats.std_dev > stats.pop_std_dev);
        assert_eq!((stats.min, stats.max, stats.n), (2.0, 9.0, 8));
        assert_eq!(stats.coefficient_of_variation(), 0.4);
    }

    #[test]
    fn stats_of_nothing_are_zero() {
        let stats = Stats::from_samples(&[]);
        assert_eq!(stats.n, 0);
        assert_eq!(stats.coefficient_of_variation(), 0.0);
    }
}

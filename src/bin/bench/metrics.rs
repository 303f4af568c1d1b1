// Per-Match Metrics: duration, scores, hold, effectiveness, victory
// Computed from an event log so fresh runs and saved logs share one path

use grapple_engine::*;
use serde::Serialize;

// ─── Match Metrics ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct MatchMetrics {
    /// Seed for fresh runs, file name for loaded logs.
    pub source: String,
    pub duration: u32,
    pub steps: usize,
    pub score_a: i32,
    pub score_o: i32,
    /// Sample variance of the cumulative score column.
    pub score_variance_a: f64,
    pub score_variance_o: f64,
    pub mean_hold_a: f64,
    pub mean_hold_o: f64,
    /// Successful attempts over attempts, %.
    pub effectiveness_a: f64,
    pub effectiveness_o: f64,
    pub verdict: Verdict,
    pub elapsed_ms: u128,
}

impl MatchMetrics {
    /// `stalemate` is known only for fresh runs; a log does not record it.
    pub fn from_events(source: String, events: &[Event], catalog: &Catalog, stalemate: bool) -> Self {
        let last = events.last();
        let score_a = last.map_or(0, |e| e.score_a);
        let score_o = last.map_or(0, |e| e.score_o);

        let verdict = match submission_winner(events, catalog) {
            Some(role) => Verdict::Submission(role),
            None if stalemate => Verdict::Stalemate,
            None if score_a > score_o => Verdict::Points(Role::A),
            None if score_o > score_a => Verdict::Points(Role::O),
            None => Verdict::Draw,
        };

        Self {
            source,
            duration: last.map_or(0, |e| e.clock),
            steps: events.len(),
            score_a,
            score_o,
            score_variance_a: sample_variance(events.iter().map(|e| f64::from(e.score_a))),
            score_variance_o: sample_variance(events.iter().map(|e| f64::from(e.score_o))),
            mean_hold_a: mean_hold(events, Role::A),
            mean_hold_o: mean_hold(events, Role::O),
            effectiveness_a: effectiveness(events, Role::A),
            effectiveness_o: effectiveness(events, Role::O),
            verdict,
            elapsed_ms: 0,
        }
    }

    pub fn mean_hold(&self, role: Role) -> f64 {
        match role {
            Role::A => self.mean_hold_a,
            Role::O => self.mean_hold_o,
        }
    }

    pub fn effectiveness(&self, role: Role) -> f64 {
        match role {
            Role::A => self.effectiveness_a,
            Role::O => self.effectiveness_o,
        }
    }
}

/// Actor of the first successful submission in the log.
pub fn submission_winner(events: &[Event], catalog: &Catalog) -> Option<Role> {
    events
        .iter()
        .filter(|e| e.outcome == Outcome::Success)
        .find(|e| catalog.lookup(&e.technique_id).category.is_submission())
        .map(|e| e.actor)
}

fn sample_variance(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

fn mean_hold(events: &[Event], role: Role) -> f64 {
    let holds: Vec<f64> = events
        .iter()
        .filter(|e| e.actor == role)
        .map(|e| f64::from(e.hold))
        .collect();
    if holds.is_empty() {
        0.0
    } else {
        holds.iter().sum::<f64>() / holds.len() as f64
    }
}

fn effectiveness(events: &[Event], role: Role) -> f64 {
    let attempts = events.iter().filter(|e| e.actor == role).count();
    if attempts == 0 {
        return 0.0;
    }
    let successes = events
        .iter()
        .filter(|e| e.actor == role && e.outcome == Outcome::Success)
        .count();
    successes as f64 / attempts as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        let csv = "\
ID,Name,Initial State,Success State,Failure State,Category,Hold Time,Stamina Cost,Execution Time,Score
T01,Double Leg,\"Pos(A:Standing, O:Standing)\",\"Pos(A:Top, O:Bottom)\",,Takedown,3,8,4,2
T30,Armbar,\"Pos(A:Top, O:Bottom)\",\"Pos(A:Finish, O:Tapped)\",,Submission,0,5,6,0
";
        Catalog::from_reader(csv.as_bytes()).unwrap()
    }

    fn event(clock: u32, actor: Role, id: &str, outcome: Outcome, hold: u32, scores: (i32, i32)) -> Event {
        Event {
            clock,
            actor,
            technique_id: id.to_string(),
            transition: format!("{id}_x_{actor}_{outcome}"),
            outcome,
            hold,
            pos_a: "Top".to_string(),
            pos_o: "Bottom".to_string(),
            score_a: scores.0,
            score_o: scores.1,
        }
    }

    #[test]
    fn metrics_of_a_points_match() {
        let events = vec![
            event(7, Role::A, "T01", Outcome::Success, 3, (2, 0)),
            event(12, Role::O, "T01", Outcome::Failure, 2, (2, 0)),
            event(19, Role::A, "T01", Outcome::Failure, 4, (2, 0)),
            event(26, Role::O, "T01", Outcome::Success, 3, (2, 2)),
            event(33, Role::A, "T01", Outcome::Success, 3, (4, 2)),
        ];
        let m = MatchMetrics::from_events("seed-1".into(), &events, &catalog(), false);
        assert_eq!(m.duration, 33);
        assert_eq!((m.score_a, m.score_o), (4, 2));
        assert_eq!(m.verdict, Verdict::Points(Role::A));
        assert_eq!(m.mean_hold_a, 10.0 / 3.0);
        assert_eq!(m.mean_hold_o, 2.5);
        assert_eq!(m.effectiveness_o, 50.0);
        // score_a column 2,2,2,2,4: mean 2.4, squares 0.16*4 + 2.56 = 3.2, / 4
        assert!((m.score_variance_a - 0.8).abs() < 1e-12);
    }

    #[test]
    fn submission_beats_points() {
        let events = vec![
            event(7, Role::O, "T01", Outcome::Success, 3, (0, 2)),
            event(13, Role::A, "T30", Outcome::Failure, 0, (0, 2)),
            event(19, Role::A, "T30", Outcome::Success, 0, (0, 2)),
        ];
        let m = MatchMetrics::from_events("log".into(), &events, &catalog(), false);
        assert_eq!(m.verdict, Verdict::Submission(Role::A));
    }

    #[test]
    fn empty_log_is_a_draw_or_stalemate() {
        let m = MatchMetrics::from_events("x".into(), &[], &catalog(), false);
        assert_eq!(m.verdict, Verdict::Draw);
        assert_eq!(m.effectiveness_a, 0.0);
        let m = MatchMetrics::from_events("x".into(), &[], &catalog(), true);
        assert_eq!(m.verdict, Verdict::Stalemate);
    }
}

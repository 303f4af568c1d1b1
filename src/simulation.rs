// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Simulation Core

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::MatchConfig;
use crate::error::Result;
use crate::formulas;
use crate::net::{Marking, PetriNet, TransitionId};
use crate::profiles::Fighters;
use crate::symmetry;
use crate::types::*;

// ─── MatchModel ──────────────────────────────────────────────────────────────

/// Everything a match reads but never mutates. Build once, share across runs.
#[derive(Debug, Clone)]
pub struct MatchModel {
    pub catalog: Catalog,
    pub net: PetriNet,
    pub config: MatchConfig,
}

impl MatchModel {
    pub fn new(catalog: Catalog, config: MatchConfig) -> Self {
        let variants = symmetry::expand(&catalog);
        let net = PetriNet::build(&variants, &config.standing_position);
        info!(
            techniques = catalog.len(),
            variants = variants.len(),
            places = net.places().len(),
            transitions = net.transitions().len(),
            arcs = net.arc_count(),
            "match model built"
        );
        Self { catalog, net, config }
    }

    /// Load the catalog and, when given, a TOML config. Defaults otherwise.
    pub fn load(catalog: &Path, config: Option<&Path>) -> Result<Self> {
        let catalog = Catalog::load(catalog)?;
        let config = match config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };
        Ok(Self::new(catalog, config))
    }
}

// ─── MatchSimulation ─────────────────────────────────────────────────────────

/// One match. Owns the mutable state: marking, clock, fighters and log.
pub struct MatchSimulation<'m, R: Rng = ChaCha8Rng> {
    model: &'m MatchModel,
    fighters: Fighters,
    marking: Marking,
    clock: u32,
    steps: u32,
    status: MatchStatus,
    events: Vec<Event>,
    rng: R,
}

impl<'m> MatchSimulation<'m, ChaCha8Rng> {
    pub fn with_seed(model: &'m MatchModel, fighters: Fighters, seed: u64) -> Self {
        Self::new(model, fighters, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'m, R: Rng> MatchSimulation<'m, R> {
    pub fn new(model: &'m MatchModel, mut fighters: Fighters, rng: R) -> Self {
        fighters.a.score = 0;
        fighters.o.score = 0;
        Self {
            model,
            fighters,
            marking: model.net.initial_marking(),
            clock: 0,
            steps: 0,
            status: MatchStatus::Running,
            events: Vec::new(),
            rng,
        }
    }

    /// Start from `marking` instead of both fighters standing.
    pub fn with_marking(mut self, marking: Marking) -> Self {
        self.marking = marking;
        self
    }

    pub fn marking(&self) -> Marking {
        self.marking
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn fighter(&self, role: Role) -> &FighterProfile {
        self.fighters.get(role)
    }

    /// Advance one step and return the resulting status. A terminal match is
    /// left untouched.
    pub fn step(&mut self) -> Result<MatchStatus> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        let model = self.model;
        let config = &model.config;
        if self.clock >= config.max_clock || self.steps >= config.max_steps {
            self.finish(MatchStatus::EndedTimeLimit);
            return Ok(self.status);
        }

        // 1. Enablement per fighter
        let enabled_a = model.net.enabled(Role::A, &self.marking, &self.fighters.a.repertoire);
        let enabled_o = model.net.enabled(Role::O, &self.marking, &self.fighters.o.repertoire);

        // 2. Stalemate
        if enabled_a.is_empty() && enabled_o.is_empty() {
            self.finish(MatchStatus::EndedStalemate);
            return Ok(self.status);
        }

        // 3. Proposals, A drawn first
        let proposal_a = self.propose(&enabled_a);
        let proposal_o = self.propose(&enabled_o);

        // 4. Initiative arbitration; the losing proposal is dropped
        let (actor, transition) = match (proposal_a, proposal_o) {
            (Some(a), None) => (Role::A, a),
            (None, Some(o)) => (Role::O, o),
            (Some(a), Some(o)) => {
                let initiative_a = self.initiative(Role::A, a);
                let initiative_o = self.initiative(Role::O, o);
                debug!(initiative_a, initiative_o, "arbitration");
                if initiative_a > initiative_o {
                    (Role::A, a)
                } else {
                    (Role::O, o)
                }
            }
            (None, None) => {
                self.finish(MatchStatus::EndedStalemate);
                return Ok(self.status);
            }
        };

        // 5. Resolution and event
        let submitted = self.resolve(actor, transition)?;
        self.steps += 1;

        // 6. Termination
        if submitted {
            self.finish(MatchStatus::EndedSubmission { winner: actor });
        } else if self.clock >= config.max_clock || self.steps >= config.max_steps {
            self.finish(MatchStatus::EndedTimeLimit);
        }
        Ok(self.status)
    }

    /// Step until the match ends.
    pub fn run(&mut self) -> Result<MatchReport> {
        while !self.step()?.is_terminal() {}
        Ok(self.report())
    }

    pub fn report(&self) -> MatchReport {
        MatchReport {
            status: self.status,
            clock: self.clock,
            steps: self.steps,
            score_a: self.fighters.a.score,
            score_o: self.fighters.o.score,
            stamina_a: self.fighters.a.stamina,
            stamina_o: self.fighters.o.stamina,
            events: self.events.clone(),
        }
    }

    // -------------------------------------------------------------------------
    // Step internals
    // -------------------------------------------------------------------------

    fn propose(&mut self, enabled: &[TransitionId]) -> Option<TransitionId> {
        if enabled.is_empty() {
            return None;
        }
        Some(enabled[self.rng.gen_range(0..enabled.len())])
    }

    fn initiative(&mut self, role: Role, transition: TransitionId) -> f64 {
        let model = self.model;
        let tuning = &model.config.tuning;
        let technique = model.catalog.lookup(&model.net.transition(transition).technique_id);
        let place = model.net.place_name(self.marking.get(role));
        let standing = model.config.positions.standing_of(place);
        let noise = formulas::initiative_noise(self.rng.gen::<f64>(), tuning);
        let fighter = self.fighters.get(role);
        formulas::initiative(
            &fighter.attributes,
            fighter.stamina,
            technique.category,
            standing,
            noise,
            tuning,
        )
    }

    /// Resolve the chosen attempt, apply its effects and log it. Returns
    /// whether it was a successful submission.
    fn resolve(&mut self, actor: Role, attempted: TransitionId) -> Result<bool> {
        let model = self.model;
        let tuning = &model.config.tuning;
        let net = &model.net;
        let technique = model.catalog.lookup(&net.transition(attempted).technique_id);

        let fighter = self.fighters.get(actor);
        let cost = formulas::stamina_cost(technique.stamina_cost, &fighter.attributes, technique.category, tuning);
        let probability =
            formulas::success_probability(&fighter.attributes, fighter.stamina, technique.category, tuning);
        let hold = formulas::sample_hold(technique.hold_time, self.rng.gen::<f64>(), tuning);
        let draw = self.rng.gen::<f64>();
        let succeeded = draw < probability;
        let elapsed = technique.execution_time.saturating_add(hold.seconds);
        let failure = net.failure_of(attempted);

        debug!(
            actor = %actor,
            technique = %technique.id,
            probability,
            draw,
            hold = hold.raw,
            cost,
            "resolving attempt"
        );

        let mut submitted = false;
        let (outcome, fired) = if technique.category.is_submission() {
            if succeeded && hold.met {
                net.fire(attempted, &mut self.marking)?;
                self.fighters.get_mut(actor).stamina -= f64::from(cost);
                self.clock = self.clock.saturating_add(elapsed);
                submitted = true;
                (Outcome::Success, attempted)
            } else if let Some(failure) = failure {
                net.fire(failure, &mut self.marking)?;
                (Outcome::Failure, failure)
            } else {
                (Outcome::Failure, attempted)
            }
        } else if succeeded {
            net.fire(attempted, &mut self.marking)?;
            let fighter = self.fighters.get_mut(actor);
            fighter.stamina -= f64::from(cost);
            if hold.met {
                fighter.score += technique.score;
            }
            self.clock = self.clock.saturating_add(elapsed);
            (Outcome::Success, attempted)
        } else if let Some(failure) = failure {
            net.fire(failure, &mut self.marking)?;
            self.fighters.get_mut(actor).stamina -= (f64::from(cost) * tuning.failure_cost_ratio).trunc();
            self.clock = self.clock.saturating_add(elapsed);
            (Outcome::Failure, failure)
        } else {
            self.fighters.get_mut(actor).stamina -= (f64::from(cost) * tuning.missing_failure_cost_ratio).trunc();
            self.clock = self.clock.saturating_add(tuning.missing_failure_clock);
            (Outcome::Failure, attempted)
        };

        let event = Event {
            clock: self.clock,
            actor,
            technique_id: technique.id.clone(),
            transition: net.transition(fired).name.clone(),
            outcome,
            hold: hold.seconds,
            pos_a: net.place_name(self.marking.a).to_string(),
            pos_o: net.place_name(self.marking.o).to_string(),
            score_a: self.fighters.a.score,
            score_o: self.fighters.o.score,
        };
        debug!(
            clock = event.clock,
            transition = %event.transition,
            outcome = %event.outcome,
            pos_a = %event.pos_a,
            pos_o = %event.pos_o,
            "step fired"
        );
        self.events.push(event);
        Ok(submitted)
    }

    fn finish(&mut self, status: MatchStatus) {
        self.status = status;
        info!(
            status = status.label(),
            clock = self.clock,
            steps = self.steps,
            score_a = self.fighters.a.score,
            score_o = self.fighters.o.score,
            "match ended"
        );
    }
}

// ─── MatchReport ─────────────────────────────────────────────────────────────

/// How a finished match was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "winner", rename_all = "snake_case")]
pub enum Verdict {
    Submission(Role),
    Points(Role),
    Draw,
    Stalemate,
}

impl Verdict {
    pub fn winner(&self) -> Option<Role> {
        match self {
            Verdict::Submission(r) | Verdict::Points(r) => Some(*r),
            Verdict::Draw | Verdict::Stalemate => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub status: MatchStatus,
    pub clock: u32,
    pub steps: u32,
    pub score_a: i32,
    pub score_o: i32,
    pub stamina_a: f64,
    pub stamina_o: f64,
    pub events: Vec<Event>,
}

impl MatchReport {
    pub fn verdict(&self) -> Verdict {
        match self.status {
            MatchStatus::EndedSubmission { winner } => Verdict::Submission(winner),
            MatchStatus::EndedStalemate => Verdict::Stalemate,
            _ if self.score_a > self.score_o => Verdict::Points(Role::A),
            _ if self.score_o > self.score_a => Verdict::Points(Role::O),
            _ => Verdict::Draw,
        }
    }

    pub fn winner(&self) -> Option<Role> {
        self.verdict().winner()
    }

    /// The event that ended the match by submission, if any.
    pub fn finishing_event(&self) -> Option<&Event> {
        match self.status {
            MatchStatus::EndedSubmission { .. } => self.events.last(),
            _ => None,
        }
    }
}

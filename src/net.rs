// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Petri Net Model
//
// Places are positions, the two tokens are the fighters, and every technique
// variant contributes a success transition and, when the catalog defines a
// failure position, a failure transition. The net is built once and is
// read-only afterwards; the marking lives with the engine.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{Result, SimError};
use crate::symmetry::TechniqueVariant;
use crate::types::{Outcome, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlaceId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TransitionId(pub usize);

// ─── Arcs ────────────────────────────────────────────────────────────────────

/// Which fighter tokens an arc carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArcLabel {
    Single(Role),
    /// Merged arc moving both tokens at once.
    Both,
}

impl ArcLabel {
    pub fn covers(self, role: Role) -> bool {
        match self {
            ArcLabel::Single(r) => r == role,
            ArcLabel::Both => true,
        }
    }

    pub fn tokens(self) -> usize {
        match self {
            ArcLabel::Single(_) => 1,
            ArcLabel::Both => 2,
        }
    }

    pub fn roles(self) -> impl Iterator<Item = Role> {
        Role::BOTH.into_iter().filter(move |&r| self.covers(r))
    }
}

/// Result of inserting an arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcInsert {
    Added,
    /// The arc already carried this token.
    Unchanged,
    /// An arc on the same place now carries both tokens.
    Merged,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    pub place: PlaceId,
    pub label: ArcLabel,
}

fn insert_arc(arcs: &mut Vec<Arc>, place: PlaceId, role: Role) -> ArcInsert {
    match arcs.iter_mut().find(|arc| arc.place == place) {
        Some(arc) if arc.label.covers(role) => ArcInsert::Unchanged,
        Some(arc) => {
            arc.label = ArcLabel::Both;
            ArcInsert::Merged
        }
        None => {
            arcs.push(Arc { place, label: ArcLabel::Single(role) });
            ArcInsert::Added
        }
    }
}

// ─── Places & Transitions ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transition {
    pub name: String,
    pub technique_id: String,
    pub role: Role,
    pub outcome: Outcome,
    pub inputs: Vec<Arc>,
    pub outputs: Vec<Arc>,
}

// ─── Marking ─────────────────────────────────────────────────────────────────

/// Where each fighter's token currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Marking {
    pub a: PlaceId,
    pub o: PlaceId,
}

impl Marking {
    pub fn new(a: PlaceId, o: PlaceId) -> Self {
        Self { a, o }
    }

    pub fn get(&self, role: Role) -> PlaceId {
        match role {
            Role::A => self.a,
            Role::O => self.o,
        }
    }

    pub fn set(&mut self, role: Role, place: PlaceId) {
        match role {
            Role::A => self.a = place,
            Role::O => self.o = place,
        }
    }

    /// Tokens on `place`.
    pub fn tokens_at(&self, place: PlaceId) -> usize {
        Role::BOTH.iter().filter(|&&r| self.get(r) == place).count()
    }
}

// ─── PetriNet ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PetriNet {
    places: Vec<Place>,
    place_index: HashMap<String, PlaceId>,
    transitions: Vec<Transition>,
    transition_index: HashMap<String, TransitionId>,
    /// Failure counterpart of each success transition, by transition index.
    failures: Vec<Option<TransitionId>>,
    /// Success transitions per acting role, in build order.
    selectable: [Vec<TransitionId>; 2],
    standing: Option<PlaceId>,
}

impl PetriNet {
    /// Build the net for `variants`, with `standing` as the start place.
    pub fn build(variants: &[TechniqueVariant], standing: &str) -> Self {
        let mut net = Self::default();
        net.standing = Some(net.add_place(standing));
        for variant in variants {
            for place in variant.places() {
                net.add_place(place);
            }
        }

        for variant in variants {
            let success = net.add_transition(variant, Outcome::Success);
            net.connect(success, variant, Outcome::Success);
            let failure = variant.has_failure().then(|| {
                let id = net.add_transition(variant, Outcome::Failure);
                net.connect(id, variant, Outcome::Failure);
                id
            });
            net.failures[success.0] = failure;
            net.selectable[variant.role.index()].push(success);
        }
        net
    }

    /// Idempotent: a known name returns its existing id.
    pub fn add_place(&mut self, name: &str) -> PlaceId {
        if let Some(&id) = self.place_index.get(name) {
            return id;
        }
        let id = PlaceId(self.places.len());
        self.places.push(Place { name: name.to_string() });
        self.place_index.insert(name.to_string(), id);
        id
    }

    fn add_transition(&mut self, variant: &TechniqueVariant, outcome: Outcome) -> TransitionId {
        let name = variant.transition_name(outcome);
        if let Some(&id) = self.transition_index.get(&name) {
            return id;
        }
        let id = TransitionId(self.transitions.len());
        self.transitions.push(Transition {
            name: name.clone(),
            technique_id: variant.technique_id.clone(),
            role: variant.role,
            outcome,
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        self.failures.push(None);
        self.transition_index.insert(name, id);
        id
    }

    fn connect(&mut self, transition: TransitionId, variant: &TechniqueVariant, outcome: Outcome) {
        let targets = match outcome {
            Outcome::Success => &variant.success,
            Outcome::Failure => &variant.failure,
        };
        for role in Role::BOTH {
            if let Some(place) = variant.initial.get(role) {
                let place = self.add_place(place);
                self.add_input(transition, place, role);
            }
            if let Some(place) = targets.get(role) {
                let place = self.add_place(place);
                self.add_output(transition, place, role);
            }
        }
    }

    /// Arc from `place` into `transition` carrying `role`'s token.
    pub fn add_input(&mut self, transition: TransitionId, place: PlaceId, role: Role) -> ArcInsert {
        insert_arc(&mut self.transitions[transition.0].inputs, place, role)
    }

    /// Arc from `transition` into `place` carrying `role`'s token.
    pub fn add_output(&mut self, transition: TransitionId, place: PlaceId, role: Role) -> ArcInsert {
        insert_arc(&mut self.transitions[transition.0].outputs, place, role)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.0]
    }

    pub fn transition_by_name(&self, name: &str) -> Option<TransitionId> {
        self.transition_index.get(name).copied()
    }

    pub fn place_id(&self, name: &str) -> Result<PlaceId> {
        self.place_index
            .get(name)
            .copied()
            .ok_or_else(|| SimError::UnknownPlace(name.to_string()))
    }

    pub fn place_name(&self, id: PlaceId) -> &str {
        &self.places[id.0].name
    }

    pub fn failure_of(&self, success: TransitionId) -> Option<TransitionId> {
        self.failures.get(success.0).copied().flatten()
    }

    pub fn success_transitions(&self, role: Role) -> &[TransitionId] {
        &self.selectable[role.index()]
    }

    pub fn arc_count(&self) -> usize {
        self.transitions
            .iter()
            .map(|t| t.inputs.len() + t.outputs.len())
            .sum()
    }

    /// Both tokens on the standing place.
    pub fn initial_marking(&self) -> Marking {
        let standing = self.standing.unwrap_or(PlaceId(0));
        Marking::new(standing, standing)
    }

    /// Marking with the fighters on the named places.
    pub fn marking_at(&self, a: &str, o: &str) -> Result<Marking> {
        Ok(Marking::new(self.place_id(a)?, self.place_id(o)?))
    }

    // -------------------------------------------------------------------------
    // Enablement & firing
    // -------------------------------------------------------------------------

    pub fn is_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        self.first_unmet(transition, marking).is_none()
    }

    fn first_unmet(&self, transition: TransitionId, marking: &Marking) -> Option<(Role, PlaceId)> {
        self.transitions[transition.0].inputs.iter().find_map(|arc| {
            arc.label
                .roles()
                .find(|&r| marking.get(r) != arc.place)
                .map(|r| (r, arc.place))
        })
    }

    /// Success transitions `role` may propose: inputs satisfied and technique
    /// in `repertoire`.
    pub fn enabled(&self, role: Role, marking: &Marking, repertoire: &BTreeSet<String>) -> Vec<TransitionId> {
        self.selectable[role.index()]
            .iter()
            .copied()
            .filter(|&t| repertoire.contains(&self.transitions[t.0].technique_id))
            .filter(|&t| self.is_enabled(t, marking))
            .collect()
    }

    /// Fire `transition`. Fighters named by an output arc move there; any
    /// other fighter keeps its place.
    pub fn fire(&self, transition: TransitionId, marking: &mut Marking) -> Result<()> {
        let t = &self.transitions[transition.0];
        if let Some((role, expected)) = self.first_unmet(transition, marking) {
            return Err(SimError::PreconditionViolated {
                transition: t.name.clone(),
                role,
                expected: self.place_name(expected).to_string(),
                actual: self.place_name(marking.get(role)).to_string(),
            });
        }
        for arc in &t.outputs {
            for role in arc.label.roles() {
                marking.set(role, arc.place);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, PositionPair, Technique};
    use crate::symmetry::expand;
    use crate::types::Category;

    fn technique(id: &str, initial: PositionPair, success: PositionPair, failure: PositionPair) -> Technique {
        Technique {
            id: id.to_string(),
            name: "Move".to_string(),
            category: Category::Takedown,
            initial,
            success,
            failure,
            hold_time: 0,
            stamina_cost: 1,
            execution_time: 1,
            score: 2,
        }
    }

    fn takedown_net() -> PetriNet {
        let catalog = Catalog::from_techniques([technique(
            "T01",
            PositionPair::new(Some("Standing"), Some("Standing")),
            PositionPair::new(Some("Top"), Some("Bottom")),
            PositionPair::new(Some("Standing"), Some("Standing")),
        )]);
        PetriNet::build(&expand(&catalog), "Standing")
    }

    #[test]
    fn shared_input_place_becomes_merged_arc() {
        let net = takedown_net();
        let t = net.transition_by_name("T01_Move_A_success").unwrap();
        let inputs = &net.transition(t).inputs;
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].label, ArcLabel::Both);
        assert_eq!(inputs[0].label.tokens(), 2);
        assert_eq!(net.transition(t).outputs.len(), 2);
    }

    #[test]
    fn arc_insertion_is_idempotent() {
        let mut net = takedown_net();
        let before = net.arc_count();
        let t = net.transition_by_name("T01_Move_A_success").unwrap();
        let standing = net.place_id("Standing").unwrap();
        let top = net.place_id("Top").unwrap();

        assert_eq!(net.add_input(t, standing, Role::A), ArcInsert::Unchanged);
        assert_eq!(net.add_input(t, standing, Role::O), ArcInsert::Unchanged);
        assert_eq!(net.add_output(t, top, Role::A), ArcInsert::Unchanged);
        assert_eq!(net.add_output(t, top, Role::O), ArcInsert::Merged);
        assert_eq!(net.arc_count(), before);
    }

    #[test]
    fn add_place_returns_existing_id() {
        let mut net = takedown_net();
        let count = net.places().len();
        let id = net.place_id("Top").unwrap();
        assert_eq!(net.add_place("Top"), id);
        assert_eq!(net.places().len(), count);
    }

    #[test]
    fn enablement_respects_marking_and_repertoire() {
        let net = takedown_net();
        let marking = net.initial_marking();
        let repertoire: BTreeSet<String> = ["T01".to_string()].into();

        let enabled = net.enabled(Role::A, &marking, &repertoire);
        assert_eq!(enabled.len(), 1);
        assert_eq!(net.transition(enabled[0]).outcome, Outcome::Success);
        assert!(net.enabled(Role::A, &marking, &BTreeSet::new()).is_empty());

        let moved = net.marking_at("Top", "Bottom").unwrap();
        assert!(net.enabled(Role::O, &moved, &repertoire).is_empty());
    }

    #[test]
    fn firing_moves_both_tokens() {
        let net = takedown_net();
        let mut marking = net.initial_marking();
        let t = net.transition_by_name("T01_Move_O_success").unwrap();
        net.fire(t, &mut marking).unwrap();
        assert_eq!(net.place_name(marking.a), "Bottom");
        assert_eq!(net.place_name(marking.o), "Top");
        assert_eq!(net.failure_of(t), net.transition_by_name("T01_Move_O_failure"));
    }

    #[test]
    fn firing_without_preconditions_is_an_error() {
        let net = takedown_net();
        let mut marking = net.marking_at("Top", "Bottom").unwrap();
        let t = net.transition_by_name("T01_Move_A_success").unwrap();
        let err = net.fire(t, &mut marking).unwrap_err();
        match err {
            SimError::PreconditionViolated { role, expected, actual, .. } => {
                assert_eq!(role, Role::A);
                assert_eq!(expected, "Standing");
                assert_eq!(actual, "Top");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(marking, net.marking_at("Top", "Bottom").unwrap());
    }

    #[test]
    fn one_sided_output_keeps_other_fighter() {
        let catalog = Catalog::from_techniques([technique(
            "T09",
            PositionPair::new(Some("Mount_Bottom"), Some("Mount_Top")),
            PositionPair::new(Some("Half_Guard_Bottom"), None),
            PositionPair::EMPTY,
        )]);
        let net = PetriNet::build(&expand(&catalog), "Standing");
        let t = net.transition_by_name("T09_Move_A_success").unwrap();
        assert_eq!(net.failure_of(t), None);

        let mut marking = net.marking_at("Mount_Bottom", "Mount_Top").unwrap();
        net.fire(t, &mut marking).unwrap();
        assert_eq!(net.place_name(marking.a), "Half_Guard_Bottom");
        assert_eq!(net.place_name(marking.o), "Mount_Top");
    }

    #[test]
    fn unknown_place_is_reported() {
        let net = takedown_net();
        assert!(matches!(net.place_id("Crucifix"), Err(SimError::UnknownPlace(_))));
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Symmetry Expansion
//
// Every catalog technique is written from the attacker's point of view. The
// expander produces one variant per acting role, with positions restated in the
// absolute A/O frame the net uses.

use tracing::warn;

use crate::catalog::{Catalog, PositionPair, Technique};
use crate::types::{Category, Outcome, Role};

/// A technique bound to an acting role. `initial`, `success` and `failure`
/// give the places of fighter A and fighter O, not attacker and defender.
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueVariant {
    pub technique_id: String,
    pub name: String,
    pub category: Category,
    pub role: Role,
    pub initial: PositionPair,
    pub success: PositionPair,
    pub failure: PositionPair,
}

impl TechniqueVariant {
    /// Bind `technique` to `role`. For `Role::O` the attacker slot moves to O.
    pub fn of(technique: &Technique, role: Role) -> Self {
        let frame = |pair: &PositionPair| match role {
            Role::A => pair.clone(),
            Role::O => pair.swapped(),
        };
        Self {
            technique_id: technique.id.clone(),
            name: technique.name.clone(),
            category: technique.category,
            role,
            initial: frame(&technique.initial),
            success: frame(&technique.success),
            failure: frame(&technique.failure),
        }
    }

    pub fn transition_name(&self, outcome: Outcome) -> String {
        format!(
            "{}_{}_{}_{}",
            self.technique_id,
            self.name.split_whitespace().collect::<Vec<_>>().join("_"),
            self.role,
            outcome
        )
    }

    pub fn has_failure(&self) -> bool {
        !self.failure.is_empty()
    }

    /// Every place this variant mentions, in initial/success/failure order.
    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.initial
            .places()
            .chain(self.success.places())
            .chain(self.failure.places())
    }
}

/// Both role variants of every usable technique, in catalog order with the A
/// variant first.
pub fn expand(catalog: &Catalog) -> Vec<TechniqueVariant> {
    let mut variants = Vec::with_capacity(catalog.len() * 2);
    for technique in catalog.techniques() {
        if technique.initial.is_empty() {
            warn!(technique = %technique.id, "no initial position on either side, dropped");
            continue;
        }
        if technique.success.is_empty() {
            warn!(technique = %technique.id, "no success position on either side, dropped");
            continue;
        }
        for role in Role::BOTH {
            variants.push(TechniqueVariant::of(technique, role));
        }
    }
    variants
}

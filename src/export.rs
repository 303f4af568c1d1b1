// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Net Export
//
// Structural view of the net for an external renderer: names, tags and the
// parts of the net each fighter's repertoire can reach. No layout.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SimError};
use crate::net::{PetriNet, PlaceId};
use crate::profiles::Fighters;
use crate::types::{Outcome, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    None,
    A,
    O,
    Both,
}

impl Highlight {
    fn from_flags(a: bool, o: bool) -> Self {
        match (a, o) {
            (true, true) => Highlight::Both,
            (true, false) => Highlight::A,
            (false, true) => Highlight::O,
            (false, false) => Highlight::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceNode {
    pub name: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionNode {
    pub name: String,
    pub technique_id: String,
    pub role: Role,
    pub outcome: Outcome,
    pub in_repertoire: bool,
}

/// Directed edge between a place and a transition, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub tokens: usize,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetGraph {
    pub places: Vec<PlaceNode>,
    pub transitions: Vec<TransitionNode>,
    pub edges: Vec<Edge>,
}

impl NetGraph {
    /// Describe `net`, marking what `fighters` can use when given.
    ///
    /// A place is highlighted for a role when any transition of a technique in
    /// that role's repertoire touches it.
    pub fn describe(net: &PetriNet, fighters: Option<&Fighters>) -> Self {
        let (rep_a, rep_o) = (repertoire_of(fighters, Role::A), repertoire_of(fighters, Role::O));

        let mut touched = [BTreeSet::new(), BTreeSet::new()];
        let mut transitions = Vec::with_capacity(net.transitions().len());
        let mut edges = Vec::with_capacity(net.arc_count());

        for t in net.transitions() {
            let id = t.technique_id.as_str();
            let (in_a, in_o) = (rep_a.contains(id), rep_o.contains(id));
            let in_repertoire = in_a || in_o;

            for arc in t.inputs.iter().chain(&t.outputs) {
                if in_a {
                    touched[Role::A.index()].insert(arc.place);
                }
                if in_o {
                    touched[Role::O.index()].insert(arc.place);
                }
            }
            for arc in &t.inputs {
                edges.push(Edge {
                    from: net.place_name(arc.place).to_string(),
                    to: t.name.clone(),
                    tokens: arc.label.tokens(),
                    highlighted: in_repertoire,
                });
            }
            for arc in &t.outputs {
                edges.push(Edge {
                    from: t.name.clone(),
                    to: net.place_name(arc.place).to_string(),
                    tokens: arc.label.tokens(),
                    highlighted: in_repertoire,
                });
            }
            transitions.push(TransitionNode {
                name: t.name.clone(),
                technique_id: t.technique_id.clone(),
                role: t.role,
                outcome: t.outcome,
                in_repertoire,
            });
        }

        let places = net
            .places()
            .iter()
            .enumerate()
            .map(|(i, place)| {
                let id = PlaceId(i);
                PlaceNode {
                    name: place.name.clone(),
                    highlight: Highlight::from_flags(touched[0].contains(&id), touched[1].contains(&id)),
                }
            })
            .collect();

        Self { places, transitions, edges }
    }

    pub fn write_json<W: io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(SimError::Export)
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.write_json(io::BufWriter::new(std::fs::File::create(path)?))
    }
}

fn repertoire_of(fighters: Option<&Fighters>, role: Role) -> BTreeSet<&str> {
    fighters
        .map(|f| f.get(role).repertoire.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, PositionPair, Technique};
    use crate::symmetry::expand;
    use crate::types::{Attributes, Category, FighterProfile};

    fn net() -> PetriNet {
        let t = |id: &str, initial: PositionPair, success: PositionPair| Technique {
            id: id.to_string(),
            name: "Move".to_string(),
            category: Category::Neutral,
            initial,
            success,
            failure: PositionPair::EMPTY,
            hold_time: 0,
            stamina_cost: 1,
            execution_time: 1,
            score: 0,
        };
        let catalog = Catalog::from_techniques([
            t(
                "T01",
                PositionPair::new(Some("Standing"), Some("Standing")),
                PositionPair::new(Some("Top"), Some("Bottom")),
            ),
            t(
                "T02",
                PositionPair::new(Some("Guard_Top"), Some("Guard_Bottom")),
                PositionPair::new(Some("Standing"), Some("Standing")),
            ),
        ]);
        PetriNet::build(&expand(&catalog), "Standing")
    }

    #[test]
    fn describes_every_node_and_arc() {
        let net = net();
        let graph = NetGraph::describe(&net, None);
        assert_eq!(graph.places.len(), net.places().len());
        assert_eq!(graph.transitions.len(), 4);
        assert_eq!(graph.edges.len(), net.arc_count());
        assert!(graph.places.iter().all(|p| p.highlight == Highlight::None));

        let merged = graph
            .edges
            .iter()
            .find(|e| e.from == "Standing" && e.to == "T01_Move_A_success")
            .unwrap();
        assert_eq!(merged.tokens, 2);
    }

    #[test]
    fn highlights_follow_repertoires() {
        let net = net();
        let fighters = Fighters::new(
            FighterProfile::new(Attributes::uniform(3.0), 100.0, ["T01"]),
            FighterProfile::new(Attributes::uniform(3.0), 100.0, ["T01", "T02"]),
        );
        let graph = NetGraph::describe(&net, Some(&fighters));
        let highlight = |name: &str| graph.places.iter().find(|p| p.name == name).unwrap().highlight;
        assert_eq!(highlight("Top"), Highlight::Both);
        assert_eq!(highlight("Guard_Top"), Highlight::O);
        assert!(graph.transitions.iter().all(|t| t.in_repertoire));

        let mut json = Vec::new();
        graph.write_json(&mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["places"][0]["highlight"], "both");
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat")
//
// A grappling match as a colored Petri net: positions are places, the two
// fighters are tokens, techniques are transitions. `MatchModel` builds the
// static net from a technique catalog; `MatchSimulation` plays one seeded
// match over it and records every fired step.

pub mod types;
pub mod error;
pub mod config;
pub mod catalog;
pub mod symmetry;
pub mod net;
pub mod formulas;
pub mod profiles;
pub mod simulation;
pub mod event_log;
pub mod export;
pub mod logging;

pub use types::*;
pub use error::{Result, SimError};
pub use config::{MatchConfig, PositionTable, Tuning};
pub use catalog::{Catalog, PositionPair, Technique};
pub use net::{Marking, PetriNet};
pub use profiles::Fighters;
pub use simulation::{MatchModel, MatchReport, MatchSimulation, Verdict};
pub use export::NetGraph;

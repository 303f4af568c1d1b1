// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Match Configuration
//
// Every constant the engine and the support formulas use lives here. The
// defaults are the reference calibration; a TOML file may override any subset.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::Standing;

/// Simulated seconds in a regulation match.
pub const DEFAULT_MAX_CLOCK: u32 = 6 * 60;

/// Upper bound on engine steps. Some steps do not advance the clock (failed
/// submissions), so the clock alone cannot bound the loop.
pub const DEFAULT_MAX_STEPS: u32 = 10_000;

pub const DEFAULT_STANDING_POSITION: &str = "Standing";

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Clock ceiling in simulated seconds.
    pub max_clock: u32,
    pub max_steps: u32,
    /// Place where both tokens start.
    pub standing_position: String,
    pub positions: PositionTable,
    pub tuning: Tuning,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_clock: DEFAULT_MAX_CLOCK,
            max_steps: DEFAULT_MAX_STEPS,
            standing_position: DEFAULT_STANDING_POSITION.to_string(),
            positions: PositionTable::default(),
            tuning: Tuning::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

// ---------------------------------------------------------------------------
// PositionTable
// ---------------------------------------------------------------------------

/// Place-name tables for the positional initiative factor. A place listed in
/// neither table is neutral.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionTable {
    pub dominant: BTreeSet<String>,
    pub inferior: BTreeSet<String>,
}

impl PositionTable {
    pub fn standing_of(&self, place: &str) -> Standing {
        if self.dominant.contains(place) {
            Standing::Dominant
        } else if self.inferior.contains(place) {
            Standing::Inferior
        } else {
            Standing::Neutral
        }
    }
}

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

/// Coefficients of initiative, stamina cost, success probability and hold
/// sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Attribute average regarded as "average fighter" by initiative and cost.
    pub attribute_threshold: f64,

    // Initiative
    pub initiative_base_weight: f64,
    pub initiative_attribute_scale: f64,
    pub initiative_slope: f64,
    /// Half-width of the symmetric uniform noise.
    pub initiative_noise: f64,
    pub stamina_factor_floor: f64,
    pub stamina_factor_span: f64,
    pub dominant_factor: f64,
    pub inferior_factor: f64,

    // Stamina cost
    pub stamina_cost_slope: f64,

    // Success probability
    pub offensive_divisor: f64,
    pub defensive_divisor: f64,
    pub neutral_divisor: f64,
    pub success_scale: f64,
    /// Stamina fraction used once stored stamina is no longer positive.
    pub stamina_fraction_floor: f64,

    // Resolution
    /// Relative half-width of the hold sampling window.
    pub hold_spread: f64,
    pub failure_cost_ratio: f64,
    pub missing_failure_cost_ratio: f64,
    pub missing_failure_clock: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            attribute_threshold: 3.0,
            initiative_base_weight: 0.30,
            initiative_attribute_scale: 5.0,
            initiative_slope: 0.08,
            initiative_noise: 0.25,
            stamina_factor_floor: 0.95,
            stamina_factor_span: 0.10,
            dominant_factor: 1.03,
            inferior_factor: 0.97,
            stamina_cost_slope: 1.3,
            offensive_divisor: 10.0,
            defensive_divisor: 10.0,
            neutral_divisor: 20.0,
            success_scale: 0.8,
            stamina_fraction_floor: 0.1,
            hold_spread: 0.2,
            failure_cost_ratio: 0.7,
            missing_failure_cost_ratio: 0.5,
            missing_failure_clock: 1,
        }
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Support Formulas
//
// Pure functions. Random inputs arrive as unit draws in [0, 1) so the engine
// owns the draw order and these stay testable without an RNG.

use crate::config::Tuning;
use crate::types::{Attributes, Category, Standing};

/// Map a unit draw to the symmetric initiative noise interval.
pub fn initiative_noise(unit: f64, tuning: &Tuning) -> f64 {
    (2.0 * unit - 1.0) * tuning.initiative_noise
}

/// Initiative score of a fighter proposing a technique of `category`.
///
/// The category's attribute average sets a base value with a linear correction
/// around the threshold; `noise` is added, then the result is scaled by a
/// stamina factor in `[floor, floor + span]` and by the positional factor.
pub fn initiative(
    attributes: &Attributes,
    stamina: f64,
    category: Category,
    standing: Standing,
    noise: f64,
    tuning: &Tuning,
) -> f64 {
    let average = attributes.class_average(category.attribute_class());
    let adjustment = (average - tuning.attribute_threshold) * tuning.initiative_slope;
    let base = (average / tuning.initiative_attribute_scale) * tuning.initiative_base_weight + adjustment + noise;

    let fraction = (stamina / 100.0).clamp(0.0, 1.0);
    let stamina_factor = tuning.stamina_factor_floor + fraction * tuning.stamina_factor_span;
    let position_factor = match standing {
        Standing::Dominant => tuning.dominant_factor,
        Standing::Inferior => tuning.inferior_factor,
        Standing::Neutral => 1.0,
    };
    base * stamina_factor * position_factor
}

/// Stamina actually charged for a technique: stronger fighters pay less,
/// weaker ones more, never below 1.
pub fn stamina_cost(base_cost: i32, attributes: &Attributes, category: Category, tuning: &Tuning) -> i32 {
    let delta = attributes.class_average(category.attribute_class()) - tuning.attribute_threshold;
    let correction = (delta.abs() * tuning.stamina_cost_slope).ceil() as i32;
    let signed = if delta > 0.0 {
        correction
    } else if delta < 0.0 {
        -correction
    } else {
        0
    };
    (base_cost - signed).max(1)
}

/// Probability that an attempt succeeds. Not clamped: strong, fresh fighters
/// can exceed 1.
pub fn success_probability(attributes: &Attributes, stamina: f64, category: Category, tuning: &Tuning) -> f64 {
    use crate::types::AttributeClass::*;

    let class = category.attribute_class();
    let divisor = match class {
        Offensive => tuning.offensive_divisor,
        Defensive => tuning.defensive_divisor,
        Neutral => tuning.neutral_divisor,
    };
    let technique_factor = attributes.class_sum(class) / divisor;
    let stamina_fraction = if stamina <= 0.0 {
        tuning.stamina_fraction_floor
    } else {
        stamina / 100.0
    };
    technique_factor * stamina_fraction * tuning.success_scale
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldSample {
    /// Uniform sample before rounding; gating compares this value.
    pub raw: f64,
    /// Seconds logged and added to the clock.
    pub seconds: u32,
    /// Whether the position was held at least as long as expected.
    pub met: bool,
}

/// Sample a hold within `±hold_spread` of `expected`. Short holds are
/// truncated; holds at or above `expected` round half to even.
pub fn sample_hold(expected: u32, unit: f64, tuning: &Tuning) -> HoldSample {
    let expected = f64::from(expected);
    let low = expected * (1.0 - tuning.hold_spread);
    let high = expected * (1.0 + tuning.hold_spread);
    let raw = low + (high - low) * unit;
    let met = raw >= expected;
    let seconds = if met { raw.round_ties_even() } else { raw.floor() };
    HoldSample {
        raw,
        seconds: seconds.max(0.0) as u32,
        met,
    }
}

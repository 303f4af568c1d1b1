// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Type Definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ─── Role ────────────────────────────────────────────────────────────────────

/// Fighter identity. Each role owns exactly one token in the net.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    A,
    O,
}

impl Role {
    pub const BOTH: [Role; 2] = [Role::A, Role::O];

    pub fn opponent(self) -> Role {
        match self {
            Role::A => Role::O,
            Role::O => Role::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Role::A => 0,
            Role::O => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::A => "A",
            Role::O => "O",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Takedown,
    GuardPass,
    Submission,
    Escape,
    Neutral,
    #[default]
    Unknown,
}

impl Category {
    /// Normalize a raw catalog category (case and surrounding whitespace are
    /// ignored). Anything unrecognised is a neutral technique.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "derribo" | "takedown" => Self::Takedown,
            "pase de guardia" | "guard pass" | "guardpass" | "guard_pass" => Self::GuardPass,
            "sumisión" | "sumision" | "submission" => Self::Submission,
            "escape" => Self::Escape,
            "" | "desconocida" | "unknown" => Self::Unknown,
            _ => Self::Neutral,
        }
    }

    pub fn attribute_class(self) -> AttributeClass {
        match self {
            Self::Takedown | Self::GuardPass | Self::Submission => AttributeClass::Offensive,
            Self::Escape => AttributeClass::Defensive,
            Self::Neutral | Self::Unknown => AttributeClass::Neutral,
        }
    }

    pub fn is_submission(self) -> bool {
        self == Self::Submission
    }
}

/// Which attribute pair drives a technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeClass {
    Offensive,
    Defensive,
    Neutral,
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Standing ────────────────────────────────────────────────────────────────

/// Positional advantage of the place a fighter currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Standing {
    Dominant,
    #[default]
    Neutral,
    Inferior,
}

// ─── Attributes ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Attributes {
    #[serde(default, alias = "velAt")]
    pub attack_speed: f64,
    #[serde(default, alias = "fueAt")]
    pub attack_strength: f64,
    #[serde(default, alias = "velDef")]
    pub defense_speed: f64,
    #[serde(default, alias = "fueDef")]
    pub defense_strength: f64,
}

impl Attributes {
    pub fn new(attack_speed: f64, attack_strength: f64, defense_speed: f64, defense_strength: f64) -> Self {
        Self { attack_speed, attack_strength, defense_speed, defense_strength }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of the attributes relevant to `class`.
    pub fn class_sum(&self, class: AttributeClass) -> f64 {
        match class {
            AttributeClass::Offensive => self.attack_speed + self.attack_strength,
            AttributeClass::Defensive => self.defense_speed + self.defense_strength,
            AttributeClass::Neutral => {
                self.attack_speed + self.attack_strength + self.defense_speed + self.defense_strength
            }
        }
    }

    /// Mean of the attributes relevant to `class`.
    pub fn class_average(&self, class: AttributeClass) -> f64 {
        match class {
            AttributeClass::Offensive | AttributeClass::Defensive => self.class_sum(class) / 2.0,
            AttributeClass::Neutral => self.class_sum(class) / 4.0,
        }
    }
}

// ─── FighterProfile ──────────────────────────────────────────────────────────

pub fn default_stamina() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FighterProfile {
    #[serde(flatten)]
    pub attributes: Attributes,
    /// 0-100 scale. Deductions may drive it negative; nothing floors it.
    #[serde(default = "default_stamina", alias = "energy")]
    pub stamina: f64,
    #[serde(default, alias = "repertorio")]
    pub repertoire: BTreeSet<String>,
    #[serde(skip_deserializing)]
    pub score: i32,
}

impl FighterProfile {
    pub fn new<I, S>(attributes: Attributes, stamina: f64, repertoire: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes,
            stamina,
            repertoire: repertoire.into_iter().map(|id| id.into().trim().to_string()).collect(),
            score: 0,
        }
    }

    pub fn permits(&self, technique_id: &str) -> bool {
        self.repertoire.contains(technique_id)
    }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// One fired step of a match, in the column order of the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub clock: u32,
    pub actor: Role,
    pub technique_id: String,
    pub transition: String,
    pub outcome: Outcome,
    pub hold: u32,
    pub pos_a: String,
    pub pos_o: String,
    pub score_a: i32,
    pub score_o: i32,
}

// ─── MatchStatus ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStatus {
    Running,
    EndedSubmission { winner: Role },
    EndedTimeLimit,
    EndedStalemate,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::EndedSubmission { .. } => "ENDED_SUBMISSION",
            Self::EndedTimeLimit => "ENDED_TIME_LIMIT",
            Self::EndedStalemate => "ENDED_STALEMATE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_normalizes_case_and_whitespace() {
        assert_eq!(Category::parse("  Derribo "), Category::Takedown);
        assert_eq!(Category::parse("PASE DE GUARDIA"), Category::GuardPass);
        assert_eq!(Category::parse("Sumisión"), Category::Submission);
        assert_eq!(Category::parse("submission"), Category::Submission);
        assert_eq!(Category::parse("escape"), Category::Escape);
        assert_eq!(Category::parse("Barrido"), Category::Neutral);
        assert_eq!(Category::parse(""), Category::Unknown);
    }

    #[test]
    fn attribute_class_by_category() {
        assert_eq!(Category::Takedown.attribute_class(), AttributeClass::Offensive);
        assert_eq!(Category::Submission.attribute_class(), AttributeClass::Offensive);
        assert_eq!(Category::Escape.attribute_class(), AttributeClass::Defensive);
        assert_eq!(Category::Unknown.attribute_class(), AttributeClass::Neutral);
    }

    #[test]
    fn class_average_uses_relevant_attributes() {
        let attrs = Attributes::new(4.0, 2.0, 1.0, 1.0);
        assert_eq!(attrs.class_average(AttributeClass::Offensive), 3.0);
        assert_eq!(attrs.class_average(AttributeClass::Defensive), 1.0);
        assert_eq!(attrs.class_average(AttributeClass::Neutral), 2.0);
    }

    #[test]
    fn profile_accepts_reference_field_names() {
        let json = r#"{"velAt": 4, "fueAt": 3, "velDef": 2, "fueDef": 5,
                       "energy": 90, "repertorio": ["T01", "T02"]}"#;
        let profile: FighterProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.attributes, Attributes::new(4.0, 3.0, 2.0, 5.0));
        assert_eq!(profile.stamina, 90.0);
        assert!(profile.permits("T02"));
        assert_eq!(profile.score, 0);
    }

    #[test]
    fn profile_defaults_stamina_to_full() {
        let profile: FighterProfile = serde_json::from_str(r#"{"attack_speed": 3}"#).unwrap();
        assert_eq!(profile.stamina, 100.0);
        assert!(profile.repertoire.is_empty());
    }

    #[test]
    fn status_terminality() {
        assert!(!MatchStatus::Running.is_terminal());
        assert!(MatchStatus::EndedSubmission { winner: Role::O }.is_terminal());
        assert!(MatchStatus::EndedStalemate.is_terminal());
    }
}

// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Fighter Profiles

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::types::{FighterProfile, Role};

/// The two competitors of a match, indexed by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighters {
    #[serde(rename = "A")]
    pub a: FighterProfile,
    #[serde(rename = "O")]
    pub o: FighterProfile,
}

impl Fighters {
    pub fn new(a: FighterProfile, o: FighterProfile) -> Self {
        Self { a, o }
    }

    /// Parse a JSON object keyed `"A"` and `"O"`. Other keys may hold any
    /// value and are ignored.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut take = |role: Role| -> Result<FighterProfile> {
            let value = entries.remove(role.as_str()).ok_or(SimError::MissingRole(role))?;
            Ok(normalize(serde_json::from_value(value)?))
        };
        let a = take(Role::A)?;
        let o = take(Role::O)?;
        Ok(Self { a, o })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SimError::ProfilesUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn get(&self, role: Role) -> &FighterProfile {
        match role {
            Role::A => &self.a,
            Role::O => &self.o,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut FighterProfile {
        match role {
            Role::A => &mut self.a,
            Role::O => &mut self.o,
        }
    }
}

fn normalize(mut profile: FighterProfile) -> FighterProfile {
    profile.repertoire = profile
        .repertoire
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    profile.score = 0;
    profile
}

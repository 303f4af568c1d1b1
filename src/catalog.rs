// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Grappling Simulation Suite ("The Mat") - Technique Catalog
//
// Turns catalog rows into structured techniques. Position notation looks like
// `Pos(A:Closed_Guard_Top, O:Closed_Guard_Bottom) ModP(...)`; only the `Pos`
// group is read. Bad notation or numbers degrade to absent/zero, never abort.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SimError};
use crate::types::{Category, Role};

static POS_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"Pos\((.*?)\)").expect("valid position notation regex"));

// ---------------------------------------------------------------------------
// Notation
// ---------------------------------------------------------------------------

/// Extract the place named for `role` from a position notation string.
///
/// Returns `None` when the notation is empty, has no `Pos(...)` group, or the
/// entry for `role` is missing or malformed.
pub fn parse_position(notation: &str, role: Role) -> Option<String> {
    let caps = POS_GROUP.captures(notation)?;
    for entry in caps[1].split(',') {
        let mut parts = entry.split(':');
        let (Some(who), Some(place), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        if who.trim() == role.as_str() {
            let place = place.trim();
            return (!place.is_empty()).then(|| place.to_string());
        }
    }
    None
}

/// Positions of fighter A and fighter O for one moment of a technique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionPair {
    pub a: Option<String>,
    pub o: Option<String>,
}

impl PositionPair {
    pub const EMPTY: PositionPair = PositionPair { a: None, o: None };

    pub fn new(a: Option<&str>, o: Option<&str>) -> Self {
        Self {
            a: a.map(str::to_string),
            o: o.map(str::to_string),
        }
    }

    pub fn parse(notation: &str) -> Self {
        Self {
            a: parse_position(notation, Role::A),
            o: parse_position(notation, Role::O),
        }
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::A => self.a.as_deref(),
            Role::O => self.o.as_deref(),
        }
    }

    /// The same pair seen with the roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            a: self.o.clone(),
            o: self.a.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_none() && self.o.is_none()
    }

    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.a.as_deref().into_iter().chain(self.o.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Technique
// ---------------------------------------------------------------------------

/// One catalog row. Positions are in catalog frame: slot `a` is the attacker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Technique {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub initial: PositionPair,
    pub success: PositionPair,
    pub failure: PositionPair,
    /// Expected hold duration, seconds.
    pub hold_time: u32,
    pub stamina_cost: i32,
    /// Seconds.
    pub execution_time: u32,
    pub score: i32,
}

/// Profile handed out for ids the catalog does not know.
pub static UNKNOWN_TECHNIQUE: Technique = Technique {
    id: String::new(),
    name: String::new(),
    category: Category::Unknown,
    initial: PositionPair::EMPTY,
    success: PositionPair::EMPTY,
    failure: PositionPair::EMPTY,
    hold_time: 0,
    stamina_cost: 0,
    execution_time: 0,
    score: 0,
};

/// Raw CSV row. Headers are accepted in English or in Spanish.
#[derive(Debug, Deserialize)]
struct RawTechniqueRow {
    #[serde(rename = "ID", alias = "Id", alias = "id")]
    id: String,
    #[serde(rename = "Name", alias = "Nombre de la Técnica", default)]
    name: String,
    #[serde(rename = "Initial State", alias = "Estado Inicial (Notación)", default)]
    initial: String,
    #[serde(rename = "Success State", alias = "Estado Final Exitoso (Notación)", default)]
    success: String,
    #[serde(rename = "Failure State", alias = "Estado Final Fallido (Notación)", default)]
    failure: String,
    #[serde(rename = "Category", alias = "Categoría", default)]
    category: String,
    #[serde(rename = "Hold Time", alias = "Tiempo Posición", default)]
    hold_time: String,
    #[serde(rename = "Stamina Cost", alias = "Costo Stamina", default)]
    stamina_cost: String,
    #[serde(rename = "Execution Time", alias = "Tiempo Ejecución", default)]
    execution_time: String,
    #[serde(rename = "Score", alias = "Puntaje", default)]
    score: String,
}

/// Text → float → truncated integer. Empty or unparseable values are zero.
fn coerce_int(raw: &str, column: &str, id: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => {
            warn!(technique = id, column, value = raw, "unparseable number, using 0");
            0
        }
    }
}

fn coerce_seconds(raw: &str, column: &str, id: &str) -> u32 {
    let value = coerce_int(raw, column, id);
    if value < 0 {
        warn!(technique = id, column, value, "negative duration, using 0");
    }
    value.clamp(0, u32::MAX as i64) as u32
}

impl RawTechniqueRow {
    fn into_technique(self) -> Technique {
        let id = self.id.trim().to_string();
        let initial = PositionPair::parse(&self.initial);
        let success = PositionPair::parse(&self.success);
        let failure = PositionPair::parse(&self.failure);
        for (column, raw, pair) in [
            ("initial", &self.initial, &initial),
            ("success", &self.success, &success),
            ("failure", &self.failure, &failure),
        ] {
            if !raw.trim().is_empty() && pair.is_empty() {
                warn!(technique = %id, column, notation = %raw, "malformed position notation");
            }
        }

        Technique {
            hold_time: coerce_seconds(&self.hold_time, "hold_time", &id),
            stamina_cost: coerce_int(&self.stamina_cost, "stamina_cost", &id) as i32,
            execution_time: coerce_seconds(&self.execution_time, "execution_time", &id),
            score: coerce_int(&self.score, "score", &id) as i32,
            name: self.name.trim().to_string(),
            category: Category::parse(&self.category),
            initial,
            success,
            failure,
            id,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    techniques: Vec<Technique>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build from already structured techniques. The first occurrence of an id
    /// wins; later duplicates are skipped.
    pub fn from_techniques<I>(techniques: I) -> Self
    where
        I: IntoIterator<Item = Technique>,
    {
        let mut catalog = Self::default();
        for technique in techniques {
            if technique.id.is_empty() {
                warn!(name = %technique.name, "catalog row without an id skipped");
                continue;
            }
            if catalog.index.contains_key(&technique.id) {
                warn!(technique = %technique.id, "duplicate catalog id skipped");
                continue;
            }
            catalog.index.insert(technique.id.clone(), catalog.techniques.len());
            catalog.techniques.push(technique);
        }
        catalog
    }

    /// Parse CSV rows. Rows that cannot be decoded are skipped with a warning.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(rdr)
    }

    /// Load the catalog file. An unreadable file is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|source| SimError::CatalogUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv(rdr)
    }

    fn from_csv<R: io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let headers = rdr.headers().map_err(SimError::CatalogFormat)?;
        if !headers.iter().any(|h| matches!(h, "ID" | "Id" | "id")) {
            return Err(SimError::CatalogColumn("ID"));
        }

        let mut techniques = Vec::new();
        for (line, row) in rdr.deserialize::<RawTechniqueRow>().enumerate() {
            match row {
                Ok(raw) => techniques.push(raw.into_technique()),
                Err(e) => warn!(row = line + 1, error = %e, "undecodable catalog row skipped"),
            }
        }
        Ok(Self::from_techniques(techniques))
    }

    pub fn get(&self, id: &str) -> Option<&Technique> {
        self.index.get(id.trim()).map(|&i| &self.techniques[i])
    }

    /// Exact-match lookup after trimming; unknown ids yield the zero profile.
    pub fn lookup(&self, id: &str) -> &Technique {
        self.get(id).unwrap_or(&UNKNOWN_TECHNIQUE)
    }

    pub fn techniques(&self) -> &[Technique] {
        &self.techniques
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ID,Name,Initial State,Success State,Failure State,Category,Hold Time,Stamina Cost,Execution Time,Score
T01,Double Leg,\"Pos(A:Standing, O:Standing)\",\"Pos(A:Side_Top, O:Side_Bottom)\",\"Pos(A:Standing, O:Standing)\", Takedown ,3,8,4,2
T02,Armbar,\"Pos(A:Mount_Top, O:Mount_Bottom)\",\"Pos(A:Finish, O:Tapped)\",\"Pos(A:Mount_Bottom, O:Mount_Top)\",Submission,2.9,,6,
T01,Duplicate,\"Pos(A:Standing, O:Standing)\",,,Takedown,1,1,1,1
";

    #[test]
    fn parse_position_reads_each_role() {
        let notation = "Pos(A:Closed_Guard_Top, O:Closed_Guard_Bottom) ModP(A:grip)";
        assert_eq!(parse_position(notation, Role::A).as_deref(), Some("Closed_Guard_Top"));
        assert_eq!(parse_position(notation, Role::O).as_deref(), Some("Closed_Guard_Bottom"));
    }

    #[test]
    fn parse_position_degrades_to_absent() {
        assert_eq!(parse_position("", Role::A), None);
        assert_eq!(parse_position("ModP(A:grip)", Role::A), None);
        assert_eq!(parse_position("Pos(A:Mount_Top)", Role::O), None);
        assert_eq!(parse_position("Pos(A=Mount_Top, O:Mount_Bottom)", Role::A), None);
        assert_eq!(
            parse_position("Pos(A=Mount_Top, O:Mount_Bottom)", Role::O).as_deref(),
            Some("Mount_Bottom")
        );
        assert_eq!(parse_position("Pos(A:, O:X)", Role::A), None);
    }

    #[test]
    fn swapped_exchanges_roles() {
        let pair = PositionPair::new(Some("Top"), None);
        let swapped = pair.swapped();
        assert_eq!(swapped.a, None);
        assert_eq!(swapped.o.as_deref(), Some("Top"));
    }

    #[test]
    fn loads_rows_with_coercion_and_dedup() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let takedown = catalog.lookup("T01");
        assert_eq!(takedown.name, "Double Leg");
        assert_eq!(takedown.category, Category::Takedown);
        assert_eq!(takedown.success.a.as_deref(), Some("Side_Top"));
        assert_eq!(takedown.stamina_cost, 8);

        let armbar = catalog.lookup(" T02 ");
        assert_eq!(armbar.category, Category::Submission);
        assert_eq!(armbar.hold_time, 2);
        assert_eq!(armbar.stamina_cost, 0);
        assert_eq!(armbar.score, 0);
    }

    #[test]
    fn unknown_id_yields_zero_profile() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        let unknown = catalog.lookup("T99");
        assert_eq!(unknown.category, Category::Unknown);
        assert_eq!(unknown.stamina_cost, 0);
        assert_eq!(unknown.hold_time, 0);
        assert_eq!(unknown.score, 0);
        assert!(catalog.get("T99").is_none());
    }

    #[test]
    fn spanish_headers_are_accepted() {
        let csv = "\
ID,Nombre de la Técnica,Estado Inicial (Notación),Estado Final Exitoso (Notación),Estado Final Fallido (Notación),Categoría,Tiempo Posición,Costo Stamina,Tiempo Ejecución,Puntaje
T05,Raspado de tijera,\"Pos(A:Guardia_Cerrada_Abajo, O:Guardia_Cerrada_Arriba)\",\"Pos(A:Montada_Arriba, O:Montada_Abajo)\",,Pase de Guardia,3,5,3,2
";
        let catalog = Catalog::from_reader(csv.as_bytes()).unwrap();
        let t = catalog.lookup("T05");
        assert_eq!(t.name, "Raspado de tijera");
        assert_eq!(t.category, Category::GuardPass);
        assert!(t.failure.is_empty());
    }

    #[test]
    fn missing_id_column_is_fatal() {
        let err = Catalog::from_reader("Name,Category\nX,Escape\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SimError::CatalogColumn("ID")));
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = Catalog::load(Path::new("/nonexistent/techniques.csv")).unwrap_err();
        assert!(matches!(err, SimError::CatalogUnreadable { .. }));
        assert!(err.to_string().contains("techniques.csv"));
    }
}

//! Airport codes, the live position table and nearest-airport lookup.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::{distance_nm, Position};

/// Uppercase ICAO identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AirportCode(String);

impl AirportCode {
    /// Normalize user input into a code. Blank input is rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidAirportCode(raw.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AirportCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AirportCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AirportCode> for String {
    fn from(code: AirportCode) -> Self {
        code.0
    }
}

/// Read-only view of the simulator's live airport registry.
pub trait AirportPositions: Send + Sync {
    fn position(&self, code: &AirportCode) -> Option<Position>;

    /// All airports in registry order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&AirportCode, Position)> + '_>;

    fn contains(&self, code: &AirportCode) -> bool {
        self.position(code).is_some()
    }
}

/// Insertion-ordered in-memory airport table.
#[derive(Debug, Clone, Default)]
pub struct AirportTable {
    airports: Vec<(AirportCode, Position)>,
    index: HashMap<AirportCode, usize>,
}

impl AirportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move an airport. Existing codes keep their original slot.
    pub fn insert(&mut self, code: AirportCode, position: Position) {
        match self.index.get(&code) {
            Some(&slot) => self.airports[slot].1 = position,
            None => {
                self.index.insert(code.clone(), self.airports.len());
                self.airports.push((code, position));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl FromIterator<(AirportCode, Position)> for AirportTable {
    fn from_iter<I: IntoIterator<Item = (AirportCode, Position)>>(iter: I) -> Self {
        let mut table = AirportTable::new();
        for (code, position) in iter {
            table.insert(code, position);
        }
        table
    }
}

impl AirportPositions for AirportTable {
    fn position(&self, code: &AirportCode) -> Option<Position> {
        self.index.get(code).map(|&slot| self.airports[slot].1)
    }

    fn entries(&self) -> Box<dyn Iterator<Item = (&AirportCode, Position)> + '_> {
        Box::new(self.airports.iter().map(|(code, pos)| (code, *pos)))
    }
}

/// Closest airport to the aircraft at the time of the lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestAirport {
    pub code: AirportCode,
    pub distance_nm: f64,
}

/// Linear scan for the closest airport. The first airport wins ties.
///
/// Returns `None` only for an empty table.
pub fn find_nearest<A>(aircraft: Position, airports: &A) -> Option<NearestAirport>
where
    A: AirportPositions + ?Sized,
{
    let mut nearest: Option<(&AirportCode, f64)> = None;
    for (code, position) in airports.entries() {
        let distance = distance_nm(aircraft, position);
        let closer = match nearest {
            Some((_, best)) => distance < best,
            None => true,
        };
        if closer {
            nearest = Some((code, distance));
        }
    }

    nearest.map(|(code, distance_nm)| NearestAirport {
        code: code.clone(),
        distance_nm,
    })
}

/// Distance from the aircraft to one airport in nautical miles.
pub fn distance_to<A>(code: &AirportCode, aircraft: Position, airports: &A) -> Result<f64, CoreError>
where
    A: AirportPositions + ?Sized,
{
    let position = airports
        .position(code)
        .ok_or_else(|| CoreError::UnknownAirport(code.to_string()))?;
    Ok(distance_nm(aircraft, position))
}

/// Static airport metadata, only used for display and speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirportMetadata {
    pub name: String,
}

/// Airport metadata keyed by code, loaded from a JSON object.
#[derive(Debug, Clone, Default)]
pub struct AirportCatalog {
    airports: HashMap<AirportCode, AirportMetadata>,
}

impl AirportCatalog {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let airports: HashMap<AirportCode, AirportMetadata> = serde_json::from_str(json)?;
        Ok(Self { airports })
    }

    pub fn insert(&mut self, code: AirportCode, metadata: AirportMetadata) {
        self.airports.insert(code, metadata);
    }

    /// Overlay `other`; its entries win for codes present in both.
    pub fn merge(&mut self, other: AirportCatalog) {
        self.airports.extend(other.airports);
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    pub fn get(&self, code: &AirportCode) -> Option<&AirportMetadata> {
        self.airports.get(code)
    }

    /// `"Name (CODE)"` when the airport is known, otherwise the bare code.
    pub fn display_name(&self, code: &AirportCode) -> String {
        match self.get(code) {
            Some(meta) => format!("{} ({})", meta.name, code),
            None => code.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    fn sample_table() -> AirportTable {
        [
            (code("LFPG"), Position::new(49.0097, 2.5479)),
            (code("LFPO"), Position::new(48.7262, 2.3652)),
            (code("EGLL"), Position::new(51.4700, -0.4543)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn airport_code_is_normalized() {
        assert_eq!(code(" lfpg ").as_str(), "LFPG");
        assert!(AirportCode::parse("").is_err());
        assert!(AirportCode::parse("   ").is_err());
        assert!(AirportCode::parse("LF PG").is_err());
    }

    #[test]
    fn finds_nearest_airport() {
        let table = sample_table();
        let orly_ish = Position::new(48.70, 2.40);
        let nearest = find_nearest(orly_ish, &table).unwrap();
        assert_eq!(nearest.code.as_str(), "LFPO");
        assert!(nearest.distance_nm < 3.0);
    }

    #[test]
    fn first_airport_wins_ties() {
        let same = Position::new(10.0, 10.0);
        let table: AirportTable = [(code("AAAA"), same), (code("BBBB"), same)]
            .into_iter()
            .collect();
        let nearest = find_nearest(Position::new(10.5, 10.5), &table).unwrap();
        assert_eq!(nearest.code.as_str(), "AAAA");
    }

    #[test]
    fn empty_table_has_no_nearest() {
        assert!(find_nearest(Position::new(0.0, 0.0), &AirportTable::new()).is_none());
    }

    #[test]
    fn distance_to_unknown_airport_fails() {
        let table = sample_table();
        let err = distance_to(&code("KXYZ"), Position::new(0.0, 0.0), &table).unwrap_err();
        assert!(matches!(err, CoreError::UnknownAirport(c) if c == "KXYZ"));
    }

    #[test]
    fn reinserting_keeps_registry_order() {
        let mut table = sample_table();
        table.insert(code("LFPG"), Position::new(0.0, 0.0));
        let first = table.entries().next().unwrap();
        assert_eq!(first.0.as_str(), "LFPG");
        assert_eq!(first.1, Position::new(0.0, 0.0));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn catalog_display_name() {
        let catalog = AirportCatalog::from_json_str(
            r#"{"lfpg": {"name": "Paris Charles de Gaulle", "city": "Paris"}}"#,
        )
        .unwrap();
        assert_eq!(
            catalog.display_name(&code("LFPG")),
            "Paris Charles de Gaulle (LFPG)"
        );
        assert_eq!(catalog.display_name(&code("EGLL")), "EGLL");
    }

    #[test]
    fn merged_catalog_overrides_names() {
        let mut catalog = AirportCatalog::default();
        catalog.insert(
            code("LFPO"),
            AirportMetadata {
                name: "Orly".to_string(),
            },
        );
        catalog.insert(
            code("LFPG"),
            AirportMetadata {
                name: "Roissy".to_string(),
            },
        );

        let overlay = AirportCatalog::from_json_str(
            r#"{"LFPO": {"name": "Paris Orly", "country": "FR"}, "EGLL": {"name": "London Heathrow"}}"#,
        )
        .unwrap();
        catalog.merge(overlay);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.display_name(&code("LFPO")), "Paris Orly (LFPO)");
        assert_eq!(catalog.display_name(&code("LFPG")), "Roissy (LFPG)");
        assert_eq!(catalog.display_name(&code("EGLL")), "London Heathrow (EGLL)");
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let err = AirportCatalog::from_json_str(r#"{"LF PO": {"name": "Orly"}}"#).unwrap_err();
        assert!(matches!(err, CoreError::Catalog(_)));
    }
}

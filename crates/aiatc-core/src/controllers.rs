//! Randomized controller personas, one per airport.

use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::airports::AirportCode;

const MIN_AGE: u8 = 25;
const MAX_AGE: u8 = 65;

static FIRST_NAMES: &[&str] = &[
    "John", "Sarah", "Michael", "Emma", "David", "Lisa", "James", "Maria", "Robert", "Jennifer",
];

static LAST_NAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

/// The persona the language model plays for one airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerIdentity {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub age: u8,
}

impl ControllerIdentity {
    /// Sample every attribute independently.
    pub fn random(rng: &mut impl Rng) -> Self {
        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let gender = if rng.random_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        };

        Self {
            first_name: first.to_string(),
            last_name: last.to_string(),
            gender,
            age: rng.random_range(MIN_AGE..=MAX_AGE),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Lazily populated controller identities keyed by airport.
///
/// Identities are never regenerated or removed; changing one mid-session
/// would contradict what the model and the pilot have already heard.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<AirportCode, ControllerIdentity>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the controller for `code`, creating one on first contact.
    pub fn ensure(&mut self, code: &AirportCode) -> ControllerIdentity {
        self.ensure_with(code, &mut rand::rng())
    }

    pub fn ensure_with(&mut self, code: &AirportCode, rng: &mut impl Rng) -> ControllerIdentity {
        self.controllers
            .entry(code.clone())
            .or_insert_with(|| ControllerIdentity::random(rng))
            .clone()
    }

    pub fn get(&self, code: &AirportCode) -> Option<&ControllerIdentity> {
        self.controllers.get(code)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

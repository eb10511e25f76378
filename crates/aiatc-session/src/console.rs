//! Console front end: scenario files and typed commands.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, PoisonError};

use aiatc_core::{
    AirportCatalog, AirportCode, AirportMetadata, AirportTable, CoreError, Language, ModeOverride,
    PilotRecord, Position, SceneSnapshot,
};
use serde::Deserialize;
use thiserror::Error;

use crate::simulator::Simulator;

#[derive(Debug, Deserialize)]
pub struct ScenarioAirport {
    pub code: AirportCode,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A scripted world: airports, pilot and the initial aircraft state.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub airports: Vec<ScenarioAirport>,
    #[serde(default)]
    pub pilot: PilotRecord,
    pub aircraft: SceneSnapshot,
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scenario lists no airports")]
    NoAirports,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        if scenario.airports.is_empty() {
            return Err(ScenarioError::NoAirports);
        }
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Split into the live position table, metadata catalog and simulator.
    pub fn into_parts(self) -> (AirportTable, AirportCatalog, ScenarioSimulator) {
        let mut table = AirportTable::new();
        let mut catalog = AirportCatalog::default();
        for airport in self.airports {
            table.insert(airport.code.clone(), Position::new(airport.lat, airport.lon));
            catalog.insert(
                airport.code,
                AirportMetadata {
                    name: airport.name,
                },
            );
        }
        let simulator = ScenarioSimulator {
            scene: Mutex::new(self.aircraft),
            pilot: self.pilot,
        };
        (table, catalog, simulator)
    }
}

/// Simulator whose aircraft is moved by console commands.
pub struct ScenarioSimulator {
    scene: Mutex<SceneSnapshot>,
    pilot: PilotRecord,
}

impl ScenarioSimulator {
    pub fn update(&self, f: impl FnOnce(&mut SceneSnapshot)) {
        let mut scene = self.scene.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut scene);
    }
}

impl Simulator for ScenarioSimulator {
    fn aircraft_position(&self) -> Position {
        self.scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .aircraft
    }

    fn scene(&self) -> SceneSnapshot {
        self.scene
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn pilot(&self) -> PilotRecord {
        self.pilot.clone()
    }
}

pub const HELP: &str = "commands: tune [CODE] | say [text] | mode <AUTO|GROUND|TOWER|APPROACH|DEPARTURE> | \
lang <EN|FR> | goto <lat> <lon> | alt <ft> | ground <on|off> | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `None` tunes to the suggested (nearest) airport.
    Tune(Option<String>),
    /// `None` prompts for the message on the next line.
    Say(Option<String>),
    Mode(ModeOverride),
    Lang(Language),
    Goto(Position),
    Altitude(f64),
    Ground(bool),
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, type help")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn parse_number(raw: Option<&str>, usage: &'static str) -> Result<f64, CommandError> {
    raw.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(CommandError::Usage(usage))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        match verb.to_ascii_lowercase().as_str() {
            "tune" => Ok(Command::Tune(args.next().map(str::to_string))),
            "say" => Ok(Command::Say(Some(rest.to_string()).filter(|t| !t.is_empty()))),
            "mode" => Ok(Command::Mode(rest.parse()?)),
            "lang" => Ok(Command::Lang(rest.parse()?)),
            "goto" => {
                let lat = parse_number(args.next(), "goto <lat> <lon>")?;
                let lon = parse_number(args.next(), "goto <lat> <lon>")?;
                Ok(Command::Goto(Position::new(lat, lon)))
            }
            "alt" => Ok(Command::Altitude(parse_number(args.next(), "alt <ft>")?)),
            "ground" => match args.next() {
                Some("on") => Ok(Command::Ground(true)),
                Some("off") => Ok(Command::Ground(false)),
                _ => Err(CommandError::Usage("ground <on|off>")),
            },
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

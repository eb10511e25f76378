//! ATC role selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Altitude at or below which an airborne aircraft talks to the tower.
pub const TOWER_CEILING_FT: f64 = 5000.0;

/// The controller role answering the pilot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AtcMode {
    Ground,
    Tower,
    Approach,
    Departure,
}

impl AtcMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AtcMode::Ground => "GROUND",
            AtcMode::Tower => "TOWER",
            AtcMode::Approach => "APPROACH",
            AtcMode::Departure => "DEPARTURE",
        }
    }
}

impl fmt::Display for AtcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pilot's mode selection. `Auto` defers to [`resolve_mode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ModeOverride {
    #[default]
    Auto,
    Manual(AtcMode),
}

impl ModeOverride {
    pub const ALL: [ModeOverride; 5] = [
        ModeOverride::Auto,
        ModeOverride::Manual(AtcMode::Ground),
        ModeOverride::Manual(AtcMode::Tower),
        ModeOverride::Manual(AtcMode::Approach),
        ModeOverride::Manual(AtcMode::Departure),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModeOverride::Auto => "AUTO",
            ModeOverride::Manual(mode) => mode.as_str(),
        }
    }
}

impl fmt::Display for ModeOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeOverride {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeOverride::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownMode(s.to_string()))
    }
}

/// Pick the controller role for the current flight state.
///
/// A manual selection always wins. Departure is never inferred
/// automatically since altitude and ground contact cannot tell it
/// apart from approach.
pub fn resolve_mode(selection: ModeOverride, on_ground: bool, sea_altitude_ft: f64) -> AtcMode {
    match selection {
        ModeOverride::Manual(mode) => mode,
        ModeOverride::Auto if on_ground => AtcMode::Ground,
        ModeOverride::Auto if sea_altitude_ft <= TOWER_CEILING_FT => AtcMode::Tower,
        ModeOverride::Auto => AtcMode::Approach,
    }
}

//! Snapshot of the simulated world and pilot, as read from the simulator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::geo::Position;

/// Clearance subtracted from height above terrain when reporting AGL.
pub const GROUND_CLEARANCE_FT: f64 = 50.0;

/// Callsign used for guest pilots.
pub const GUEST_CALLSIGN: &str = "Foo";

/// Aircraft and environment state at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub aircraft: Position,
    pub aircraft_name: String,
    pub on_ground: bool,
    pub sea_altitude_ft: f64,
    /// Terrain elevation under the aircraft.
    pub ground_elevation_ft: f64,
    pub heading_deg: f64,
    pub airspeed_kts: f64,
    pub wind_speed_kts: f64,
    /// Wind direction relative to the aircraft heading.
    pub relative_wind_deg: f64,
    pub air_temp_c: f64,
    pub season: String,
    pub night: bool,
    #[serde(default)]
    pub snow: bool,
    pub sim_hours: u32,
    pub sim_minutes: u32,
}

impl SceneSnapshot {
    /// Height above ground minus the fixed clearance, never negative.
    pub fn ground_altitude_ft(&self) -> f64 {
        (self.sea_altitude_ft - self.ground_elevation_ft - GROUND_CLEARANCE_FT).max(0.0)
    }

    /// Absolute wind direction in degrees.
    pub fn wind_direction_deg(&self) -> f64 {
        (self.heading_deg + self.relative_wind_deg + 360.0) % 360.0
    }

    pub fn sim_time(&self) -> String {
        format!("{}:{:02}", self.sim_hours, self.sim_minutes)
    }
}

/// The logged-in user as reported by the simulator. `id == 0` is a guest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PilotRecord {
    pub id: u64,
    #[serde(default)]
    pub callsign: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Account creation date, used as the licensing date.
    #[serde(default)]
    pub created: String,
}

impl PilotRecord {
    pub fn is_guest(&self) -> bool {
        self.id == 0
    }
}

/// Pilot identity as presented to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PilotInfo {
    pub callsign: String,
    pub name: String,
    pub licensed_at: String,
}

impl PilotInfo {
    /// Guests get a placeholder callsign and are licensed "today".
    pub fn from_record(record: &PilotRecord, today: NaiveDate) -> Self {
        if record.is_guest() {
            return Self {
                callsign: GUEST_CALLSIGN.to_string(),
                name: "not known".to_string(),
                licensed_at: today.to_string(),
            };
        }

        Self {
            callsign: record.callsign.clone(),
            name: format!("{} {}", record.first_name, record.last_name),
            licensed_at: record.created.clone(),
        }
    }
}

/// Callsign shown in the pilot's own transmission notice.
pub fn display_callsign(record: &PilotRecord) -> &str {
    if record.is_guest() {
        GUEST_CALLSIGN
    } else {
        &record.callsign
    }
}

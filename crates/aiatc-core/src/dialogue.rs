//! Prompt construction and the per-airport conversation context.
//!
//! Every transmission sends the whole conversation to the language model:
//! a one-time intro describing the controller persona and scenario,
//! followed by alternating situational updates, pilot utterances and
//! controller replies. The context is compacted before each turn by
//! dropping the third-from-last entry, which keeps the intro and the
//! latest exchange intact.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::airports::AirportCode;
use crate::controllers::ControllerIdentity;
use crate::geo::{bearing_deg, distance_nm, CompassPoint, Position};
use crate::language::Language;
use crate::mode::{AtcMode, TOWER_CEILING_FT};
use crate::scene::{PilotInfo, SceneSnapshot};

/// Context length at which one entry is evicted before the next turn.
pub const COMPACTION_THRESHOLD: usize = 4;

/// Beyond this distance the position phrase includes a direction.
pub const NEARBY_NM: f64 = 1.0;

/// Ground speed under which a taxiing aircraft counts as stationary.
const STATIONARY_KTS: f64 = 1.0;

/// Aircraft families addressed by type name, as with GA callsigns.
const GA_TYPE_PREFIXES: [&str; 2] = ["cessna", "piper"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered message history for one airport. Index 0 is always the intro.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationContext {
    messages: Vec<ChatMessage>,
}

impl ConversationContext {
    pub fn new(intro: ChatMessage) -> Self {
        Self {
            messages: vec![intro],
        }
    }

    pub fn intro(&self) -> &ChatMessage {
        &self.messages[0]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Drop the third-from-last entry once the context holds
    /// [`COMPACTION_THRESHOLD`] entries. Returns the evicted entry.
    pub fn compact(&mut self) -> Option<ChatMessage> {
        if self.messages.len() < COMPACTION_THRESHOLD {
            return None;
        }
        let index = self.messages.len() - 3;
        Some(self.messages.remove(index))
    }

    /// Compact, then append the situational update and the pilot's words.
    pub fn append_turn(&mut self, update: ChatMessage, utterance: impl Into<String>) -> &[ChatMessage] {
        self.compact();
        self.messages.push(update);
        self.messages.push(ChatMessage::user(utterance));
        &self.messages
    }

    /// Store the model's reply verbatim.
    pub fn record_reply(&mut self, reply: ChatMessage) {
        self.messages.push(reply);
    }
}

/// Where the conversation takes place.
#[derive(Debug, Clone)]
pub struct Briefing<'a> {
    pub airport: &'a AirportCode,
    /// Human-readable name, e.g. `"Paris Orly (LFPO)"`.
    pub airport_name: &'a str,
    pub airport_position: Position,
    pub language: Language,
    pub date: NaiveDate,
}

/// One-time system message establishing persona and scenario.
pub fn build_intro(
    briefing: &Briefing<'_>,
    controller: &ControllerIdentity,
    mode: AtcMode,
    pilot: &PilotInfo,
    scene: &SceneSnapshot,
) -> ChatMessage {
    let phrases = briefing.language.phrases();
    let daynight = match (scene.snow, scene.night) {
        (true, true) => phrases.snowy_night,
        (true, false) => phrases.snowy_day,
        (false, true) => phrases.night,
        (false, false) => phrases.day,
    };

    let content = format!(
        "You are {name}, a {age} years old {gender} ATC controller on the {airport} for today. \
         Your airport location is (lat: {lat:.4}, lon: {lon:.4}). \
         You are talking to pilot whose name is {pilot_name} callsign ({callsign}) and they've been piloting since {licensed}. \
         You are currently working as {mode} controller. \
         {respond_in}\
         You will be acting as ground, tower (if the plane is below or at {ceiling:.0} ft) or approach or departure (if above {ceiling:.0} ft), \
         depending on whether the plane is on the ground, their distance from the airport, heading and previous context. \
         If the aircraft is in the air, keep your communication short and concise, as a real ATC. \
         If they're on the ground, your replies should still be short (1-2 sentence per reply), but you can use a more relaxed \
         communication like making jokes, discussing weather, other traffic etc. \
         If asked why so slow on replies, say you're busy, like the real ATC. \
         Today is {date}, time is {time}, a beautiful {season} {daynight}.",
        name = controller.full_name(),
        age = controller.age,
        gender = controller.gender,
        airport = briefing.airport_name,
        lat = briefing.airport_position.lat,
        lon = briefing.airport_position.lon,
        pilot_name = pilot.name,
        callsign = pilot.callsign,
        licensed = pilot.licensed_at,
        mode = mode,
        respond_in = phrases.respond_in,
        ceiling = TOWER_CEILING_FT,
        date = briefing.date,
        time = scene.sim_time(),
        season = scene.season,
        daynight = daynight,
    );

    ChatMessage::system(content)
}

/// Per-transmission system message describing the current situation.
pub fn build_situational_update(
    briefing: &Briefing<'_>,
    scene: &SceneSnapshot,
    mode: AtcMode,
    pilot: &PilotInfo,
) -> ChatMessage {
    let language = briefing.language;
    let phrases = language.phrases();

    let distance = distance_nm(briefing.airport_position, scene.aircraft);
    let bearing = bearing_deg(briefing.airport_position, scene.aircraft);
    let ground_state = if scene.on_ground {
        phrases.on_the_ground
    } else {
        phrases.in_the_air
    };

    let content = format!(
        "Date and time: {date} {time}. \
         The pilot is flying {aircraft} and their position is {ground_state} {position}. \
         The altitude of the aircraft is {asl:.0} feet above the sea level ({agl:.0} feet above ground). \
         The plane is {motion}. \
         Wind speed is {wind:.0} kts, {direction}{wind_dir:.0} {degrees}. \
         Air temperature is {temp:.0} degrees celsius. \
         You should address them with \"{address}\", followed by the message.",
        date = briefing.date,
        time = scene.sim_time(),
        aircraft = scene.aircraft_name,
        ground_state = ground_state,
        position = position_phrase(distance, bearing, scene.on_ground, language),
        asl = scene.sea_altitude_ft,
        agl = scene.ground_altitude_ft(),
        motion = motion_phrase(scene, language),
        wind = scene.wind_speed_kts,
        direction = phrases.direction,
        wind_dir = scene.wind_direction_deg(),
        degrees = phrases.degrees,
        temp = scene.air_temp_c,
        address = radio_address(&scene.aircraft_name, &pilot.callsign, briefing.airport, mode),
    );

    ChatMessage::system(content)
}

/// Where the aircraft is relative to the airport.
///
/// `bearing` is measured from the airport to the aircraft. Distances are
/// rounded to whole nautical miles.
pub fn position_phrase(distance_nm: f64, bearing: f64, on_ground: bool, language: Language) -> String {
    let phrases = language.phrases();
    if distance_nm > NEARBY_NM {
        let direction = CompassPoint::from_bearing(bearing).label(language);
        format!(
            "{:.0} {} {} {}",
            distance_nm, phrases.nautical_miles, direction, phrases.from_the_airport
        )
    } else if on_ground {
        phrases.at_the_airport.to_string()
    } else {
        phrases.above_the_airport.to_string()
    }
}

fn motion_phrase(scene: &SceneSnapshot, language: Language) -> String {
    let phrases = language.phrases();
    if !scene.on_ground {
        return format!(
            "{}{:.0} kts, {}{:.0}",
            phrases.flying_at, scene.airspeed_kts, phrases.heading, scene.heading_deg
        );
    }
    if scene.airspeed_kts > STATIONARY_KTS {
        format!("{}{:.0} kts", phrases.moving_at, scene.airspeed_kts)
    } else {
        phrases.stationary.to_string()
    }
}

/// The exact string the controller must open with.
pub fn radio_address(aircraft_name: &str, callsign: &str, airport: &AirportCode, mode: AtcMode) -> String {
    let address = format!("{}, {} {}", callsign, airport, mode);
    let lowered = aircraft_name.to_lowercase();
    if GA_TYPE_PREFIXES.iter().any(|ga| lowered.contains(ga)) {
        format!("{} {}", aircraft_name, address)
    } else {
        address
    }
}

//! Core logic for the AI ATC companion.
//!
//! Pure, synchronous building blocks: great-circle math, airport lookup,
//! controller personas, ATC role selection and the prompt/context rules
//! used when talking to a language model.

pub mod airports;
pub mod controllers;
pub mod dialogue;
pub mod error;
pub mod geo;
pub mod language;
pub mod mode;
pub mod scene;

pub use airports::{
    distance_to, find_nearest, AirportCatalog, AirportCode, AirportMetadata, AirportPositions,
    AirportTable, NearestAirport,
};
pub use controllers::{ControllerIdentity, ControllerRegistry, Gender};
pub use dialogue::{
    build_intro, build_situational_update, Briefing, ChatMessage, ConversationContext, Role,
};
pub use error::CoreError;
pub use geo::{bearing_deg, distance_nm, CompassPoint, Position};
pub use language::Language;
pub use mode::{resolve_mode, AtcMode, ModeOverride};
pub use scene::{PilotInfo, PilotRecord, SceneSnapshot};

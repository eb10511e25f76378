//! Shared fakes for session integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aiatc_core::geo::{EARTH_RADIUS_KM, KM_PER_NM};
use aiatc_core::{
    AirportCatalog, AirportCode, AirportMetadata, AirportTable, ChatMessage, Language, PilotRecord,
    Position, SceneSnapshot,
};
use aiatc_session::{
    AtcEngine, ChatError, ChatService, Collaborators, Config, Notification, OutputSink, Simulator,
    SpeechError, SpeechRecognizer,
};
use tokio::sync::Notify;

pub const KXYZ: Position = Position { lat: 40.0, lon: -75.0 };
/// Roughly 60 nm north of KXYZ.
pub const KABC: Position = Position { lat: 41.0, lon: -75.0 };

pub fn code(s: &str) -> AirportCode {
    AirportCode::parse(s).unwrap()
}

/// Point `distance_nm` away from `origin` along `bearing` degrees.
pub fn position_from(origin: Position, distance_nm: f64, bearing: f64) -> Position {
    let angular = distance_nm * KM_PER_NM / EARTH_RADIUS_KM;
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let brg = bearing.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * brg.cos()).asin();
    let lon2 = lon1
        + (brg.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());
    Position::new(lat2.to_degrees(), lon2.to_degrees())
}

pub fn airborne_scene(aircraft: Position) -> SceneSnapshot {
    SceneSnapshot {
        aircraft,
        aircraft_name: "Cessna 172".to_string(),
        on_ground: false,
        sea_altitude_ft: 3000.0,
        ground_elevation_ft: 500.0,
        heading_deg: 225.0,
        airspeed_kts: 110.0,
        wind_speed_kts: 8.0,
        relative_wind_deg: 30.0,
        air_temp_c: 15.0,
        season: "summer".to_string(),
        night: false,
        snow: false,
        sim_hours: 14,
        sim_minutes: 5,
    }
}

pub fn licensed_pilot() -> PilotRecord {
    PilotRecord {
        id: 7,
        callsign: "N123AB".to_string(),
        first_name: "Alex".to_string(),
        last_name: "Doe".to_string(),
        created: "2019-04-01".to_string(),
    }
}

pub struct FakeSimulator {
    scene: Mutex<SceneSnapshot>,
    pilot: Mutex<PilotRecord>,
}

impl FakeSimulator {
    pub fn new(scene: SceneSnapshot, pilot: PilotRecord) -> Self {
        Self {
            scene: Mutex::new(scene),
            pilot: Mutex::new(pilot),
        }
    }

    pub fn move_to(&self, position: Position) {
        self.scene.lock().unwrap().aircraft = position;
    }

    pub fn update(&self, f: impl FnOnce(&mut SceneSnapshot)) {
        f(&mut self.scene.lock().unwrap());
    }

    pub fn set_pilot(&self, pilot: PilotRecord) {
        *self.pilot.lock().unwrap() = pilot;
    }
}

impl Simulator for FakeSimulator {
    fn aircraft_position(&self) -> Position {
        self.scene.lock().unwrap().aircraft
    }

    fn scene(&self) -> SceneSnapshot {
        self.scene.lock().unwrap().clone()
    }

    fn pilot(&self) -> PilotRecord {
        self.pilot.lock().unwrap().clone()
    }
}

#[derive(Default)]
pub struct RecordingOutput {
    notifications: Mutex<Vec<Notification>>,
    spoken: Mutex<Vec<(String, Language)>>,
    statics: AtomicUsize,
}

impl RecordingOutput {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn last_body(&self) -> String {
        self.notifications
            .lock()
            .unwrap()
            .last()
            .map(|n| n.body.clone())
            .unwrap_or_default()
    }

    pub fn spoken(&self) -> Vec<(String, Language)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn static_count(&self) -> usize {
        self.statics.load(Ordering::SeqCst)
    }
}

impl OutputSink for RecordingOutput {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn speak(&self, text: &str, language: Language) {
        self.spoken.lock().unwrap().push((text.to_string(), language));
    }

    fn play_static(&self) {
        self.statics.fetch_add(1, Ordering::SeqCst);
    }
}

/// Chat service answering from a script and recording every request.
#[derive(Default)]
pub struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every call until the gate is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(error.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChatService for ScriptedChat {
    async fn send(&self, messages: Vec<ChatMessage>) -> Result<ChatMessage, ChatError> {
        self.calls.lock().unwrap().push(messages);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(ChatMessage::assistant(text)),
            Some(Err(error)) => Err(ChatError::Service(error)),
            None => Ok(ChatMessage::assistant("Roger")),
        }
    }
}

pub struct FakeRecognizer(pub Result<&'static str, &'static str>);

impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, _language: Language) -> Result<String, SpeechError> {
        match self.0 {
            Ok(text) => Ok(text.to_string()),
            Err(error) => Err(SpeechError::Recognizer(error.to_string())),
        }
    }
}

/// Recognizer that keeps listening forever.
pub struct SilentRecognizer;

impl SpeechRecognizer for SilentRecognizer {
    async fn recognize(&self, _language: Language) -> Result<String, SpeechError> {
        std::future::pending().await
    }
}

pub struct Harness {
    pub engine: Arc<AtcEngine<ScriptedChat>>,
    pub simulator: Arc<FakeSimulator>,
    pub output: Arc<RecordingOutput>,
}

impl Harness {
    pub fn chat(&self) -> &ScriptedChat {
        self.engine.chat()
    }
}

pub fn airports() -> (AirportTable, AirportCatalog) {
    let mut table = AirportTable::new();
    table.insert(code("KXYZ"), KXYZ);
    table.insert(code("KABC"), KABC);

    let mut catalog = AirportCatalog::default();
    catalog.insert(
        code("KXYZ"),
        AirportMetadata {
            name: "Test Field".to_string(),
        },
    );
    (table, catalog)
}

pub fn harness_with(table: AirportTable, scene: SceneSnapshot, chat: ScriptedChat) -> Harness {
    let (_, catalog) = airports();
    let simulator = Arc::new(FakeSimulator::new(scene, licensed_pilot()));
    let output = Arc::new(RecordingOutput::default());
    let collaborators = Collaborators {
        simulator: simulator.clone(),
        airports: Arc::new(table),
        catalog: Arc::new(catalog),
        output: output.clone(),
    };
    let engine = Arc::new(AtcEngine::new(Config::default(), collaborators, chat));
    Harness {
        engine,
        simulator,
        output,
    }
}

/// Aircraft airborne 5 nm northeast of KXYZ.
pub fn harness(chat: ScriptedChat) -> Harness {
    let (table, _) = airports();
    harness_with(table, airborne_scene(position_from(KXYZ, 5.0, 45.0)), chat)
}

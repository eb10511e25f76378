//! Proximity tracking, radio selection and session lifecycle tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use aiatc_core::{AirportTable, AtcMode, CoreError, Language, ModeOverride};
use aiatc_session::{NoticeLevel, SessionRuntime, TransmitError};
use common::*;

#[test]
fn test_proximity_change_is_announced_once() {
    let h = harness(ScriptedChat::new());

    let first = h.engine.proximity_tick().unwrap();
    assert_eq!(first, Some(code("KXYZ")));
    assert_eq!(
        h.output.last_body(),
        "You are now in range of Test Field (KXYZ). Set your radio frequency to KXYZ to tune in with them"
    );
    assert!(h.engine.store().controller(&code("KXYZ")).is_some());

    assert_eq!(h.engine.proximity_tick().unwrap(), None);
    assert_eq!(h.output.notifications().len(), 1);

    h.simulator.move_to(position_from(KABC, 3.0, 180.0));
    assert_eq!(h.engine.proximity_tick().unwrap(), Some(code("KABC")));
    // No catalog entry, the bare code is shown
    assert!(h.output.last_body().starts_with("You are now in range of KABC."));
    assert!(h.engine.store().controller(&code("KABC")).is_some());
    assert_eq!(h.engine.store().radio().last_proximate, Some(code("KABC")));
}

#[test]
fn test_empty_airport_table_is_an_error() {
    let h = harness_with(
        AirportTable::new(),
        airborne_scene(KXYZ),
        ScriptedChat::new(),
    );
    assert!(matches!(
        h.engine.proximity_tick(),
        Err(CoreError::EmptyAirportTable)
    ));
    assert_eq!(h.engine.suggested_frequency(), None);
}

#[test]
fn test_suggested_frequency_is_nearest_airport() {
    let h = harness(ScriptedChat::new());
    assert_eq!(h.engine.suggested_frequency(), Some(code("KXYZ")));

    h.simulator.move_to(position_from(KABC, 10.0, 0.0));
    assert_eq!(h.engine.suggested_frequency(), Some(code("KABC")));
}

#[test]
fn test_tune_in_validates_airport() {
    let h = harness(ScriptedChat::new());

    let unknown = h.engine.tune_in(Some("zzzz"));
    assert!(matches!(unknown, Err(TransmitError::UnknownAirport(ref c)) if c == "ZZZZ"));
    assert_eq!(h.output.last_body(), "Airport with code ZZZZ can not be found!");
    assert_eq!(h.output.notifications()[0].level, NoticeLevel::Error);

    assert!(matches!(h.engine.tune_in(None), Err(TransmitError::UserCancelled)));
    assert!(matches!(h.engine.tune_in(Some("  ")), Err(TransmitError::UserCancelled)));
    assert_eq!(h.engine.store().tuned_in(), None);

    let tuned = h.engine.tune_in(Some(" kabc ")).unwrap();
    assert_eq!(tuned, code("KABC"));
    assert_eq!(h.engine.store().tuned_in(), Some(code("KABC")));
    assert!(h.engine.store().controller(&code("KABC")).is_some());
    assert_eq!(
        h.output.last_body(),
        "Your radio is now tuned to KABC frequency. You will now talk to them."
    );
}

#[test]
fn test_retuning_keeps_controller_identity() {
    let h = harness(ScriptedChat::new());
    h.engine.tune_in(Some("KXYZ")).unwrap();
    let controller = h.engine.store().controller(&code("KXYZ")).unwrap();

    h.engine.tune_in(Some("KABC")).unwrap();
    h.engine.tune_in(Some("KXYZ")).unwrap();
    assert_eq!(h.engine.store().controller(&code("KXYZ")).unwrap(), controller);
}

#[test]
fn test_mode_and_language_selection_notify() {
    let h = harness(ScriptedChat::new());

    h.engine.set_mode(ModeOverride::Manual(AtcMode::Ground));
    assert_eq!(h.output.last_body(), "ATC mode switched to GROUND");
    assert_eq!(
        h.engine.store().mode_override(),
        ModeOverride::Manual(AtcMode::Ground)
    );

    h.engine.set_language(Language::Fr);
    assert_eq!(h.output.last_body(), "Langue changée en Français");
    assert_eq!(h.engine.store().language(), Language::Fr);

    h.engine.set_mode(ModeOverride::Auto);
    assert_eq!(h.output.last_body(), "Mode ATC basculé vers AUTO");
}

#[tokio::test(start_paused = true)]
async fn test_runtime_tracks_proximity_until_shutdown() {
    let h = harness(ScriptedChat::new());
    let runtime = SessionRuntime::start(h.engine.clone());

    tokio::time::sleep(Duration::from_millis(1200)).await;
    assert!(runtime.is_tracking());
    assert_eq!(h.output.notifications().len(), 1);

    h.simulator.move_to(KABC);
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(h.engine.store().radio().last_proximate, Some(code("KABC")));
    assert_eq!(h.output.notifications().len(), 2);

    runtime.shutdown().await;
    assert_eq!(Arc::strong_count(&h.engine), 1);
}

#[tokio::test(start_paused = true)]
async fn test_runtime_stops_on_empty_airport_table() {
    let h = harness_with(
        AirportTable::new(),
        airborne_scene(KXYZ),
        ScriptedChat::new(),
    );
    let runtime = SessionRuntime::start(h.engine.clone());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!runtime.is_tracking());
    assert!(h.output.notifications().is_empty());

    runtime.shutdown().await;
}

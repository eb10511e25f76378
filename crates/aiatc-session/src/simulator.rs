//! Read-only access to the host simulator.

use aiatc_core::{PilotRecord, Position, SceneSnapshot};

pub trait Simulator: Send + Sync {
    /// Current aircraft position; polled on every proximity tick.
    fn aircraft_position(&self) -> Position;

    /// Full aircraft and environment state for prompt building.
    fn scene(&self) -> SceneSnapshot;

    fn pilot(&self) -> PilotRecord;
}

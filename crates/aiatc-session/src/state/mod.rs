//! Session state for one simulator session.

mod store;

pub use store::{InFlightGuard, RadioState, SessionStore, TurnSnapshot};

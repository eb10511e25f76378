//! Failures of a single pilot action.
//!
//! Each variant is reported to the pilot where it is detected and then
//! returned to the caller. Nothing is retried.

use aiatc_core::AirportCode;
use thiserror::Error;

use crate::chat::ChatError;
use crate::speech::SpeechError;

#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("the pilot cancelled the prompt")]
    UserCancelled,
    #[error("airport {0} can not be found")]
    UnknownAirport(String),
    #[error("{code} is out of range ({distance_nm:.1} nm)")]
    OutOfRange { code: AirportCode, distance_nm: f64 },
    #[error("no frequency tuned")]
    NoFrequencyTuned,
    #[error("{0} has no controller on duty")]
    ControllerUnavailable(AirportCode),
    #[error("{0} is still answering a previous transmission")]
    FrequencyBusy(AirportCode),
    #[error("speech capture failed: {0}")]
    SpeechCapture(#[from] SpeechError),
    #[error("chat service failed: {0}")]
    Transport(#[from] ChatError),
}

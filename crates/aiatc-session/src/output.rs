//! Output channels: notifications, speech and the radio static cue.

use std::time::Duration;

use aiatc_core::{AirportCode, Language};

const NOTICE_SECS: u64 = 10;
const ATC_NOTICE_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
    pub duration: Duration,
}

impl Notification {
    pub fn info(body: impl Into<String>) -> Self {
        Self::titled(NoticeLevel::Info, "Information", body)
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::titled(NoticeLevel::Error, "Error", body)
    }

    /// A controller reply, titled after the airport.
    pub fn atc(code: &AirportCode, text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: format!("{} ATC", code),
            body: text.into(),
            duration: Duration::from_secs(ATC_NOTICE_SECS),
        }
    }

    /// Echo of the pilot's own transmission.
    pub fn pilot(aircraft: &str, callsign: &str, text: impl Into<String>) -> Self {
        Self::titled(NoticeLevel::Success, format!("{}: {}", aircraft, callsign), text)
    }

    fn titled(level: NoticeLevel, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            body: body.into(),
            duration: Duration::from_secs(NOTICE_SECS),
        }
    }
}

/// Everything the engine shows or plays to the pilot.
pub trait OutputSink: Send + Sync {
    fn notify(&self, notification: Notification);
    fn speak(&self, text: &str, language: Language);
    fn play_static(&self);
}

/// Terminal rendition used by the console binary.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn notify(&self, notification: Notification) {
        let marker = match notification.level {
            NoticeLevel::Info => "i",
            NoticeLevel::Success => ">",
            NoticeLevel::Warning => "<",
            NoticeLevel::Error => "!",
        };
        println!("[{}] {}: {}", marker, notification.title, notification.body);
    }

    fn speak(&self, text: &str, language: Language) {
        tracing::debug!("Speaking ({}): {}", language.speech_tag(), text);
    }

    fn play_static(&self) {
        println!("~~ krrzzzt ~~");
    }
}

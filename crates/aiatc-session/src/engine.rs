//! The ATC session engine.
//!
//! Owns the session store and the injected collaborators, and implements
//! the pilot-facing actions: tuning the radio, selecting mode and
//! language, transmitting, and the periodic proximity check.

use std::sync::Arc;

use aiatc_core::language::Messages;
use aiatc_core::scene::display_callsign;
use aiatc_core::{
    build_intro, build_situational_update, distance_nm, find_nearest, resolve_mode,
    AirportCatalog, AirportCode, AirportPositions, Briefing, ChatMessage, CoreError, Language,
    ModeOverride, PilotInfo,
};
use chrono::Utc;

use crate::chat::ChatService;
use crate::config::Config;
use crate::error::TransmitError;
use crate::output::{Notification, OutputSink};
use crate::simulator::Simulator;
use crate::speech::{capture_transcript, SpeechError, SpeechRecognizer};
use crate::state::SessionStore;

/// External systems the engine reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    pub simulator: Arc<dyn Simulator>,
    pub airports: Arc<dyn AirportPositions>,
    pub catalog: Arc<AirportCatalog>,
    pub output: Arc<dyn OutputSink>,
}

pub struct AtcEngine<C> {
    config: Config,
    store: SessionStore,
    simulator: Arc<dyn Simulator>,
    airports: Arc<dyn AirportPositions>,
    catalog: Arc<AirportCatalog>,
    output: Arc<dyn OutputSink>,
    chat: C,
}

impl<C: ChatService> AtcEngine<C> {
    pub fn new(config: Config, collaborators: Collaborators, chat: C) -> Self {
        Self {
            store: SessionStore::new(config.language),
            config,
            simulator: collaborators.simulator,
            airports: collaborators.airports,
            catalog: collaborators.catalog,
            output: collaborators.output,
            chat,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    fn messages(&self) -> &'static Messages {
        self.store.language().messages()
    }

    /// Nearest airport, offered as the default when tuning in.
    pub fn suggested_frequency(&self) -> Option<AirportCode> {
        find_nearest(self.simulator.aircraft_position(), self.airports.as_ref()).map(|n| n.code)
    }

    /// Bind the radio to an airport. `None` or blank input means the pilot
    /// dismissed the prompt.
    pub fn tune_in(&self, input: Option<&str>) -> Result<AirportCode, TransmitError> {
        let msg = self.messages();
        let raw = match input.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                self.output.notify(Notification::info(msg.cancelled));
                return Err(TransmitError::UserCancelled);
            }
        };

        let code = match AirportCode::parse(raw) {
            Ok(code) if self.airports.contains(&code) => code,
            _ => {
                let shown = raw.to_uppercase();
                tracing::warn!("Tune-in rejected, unknown airport {}", shown);
                self.output.notify(Notification::error(format!(
                    "{}{}{}",
                    msg.airport_not_found, shown, msg.cannot_be_found
                )));
                return Err(TransmitError::UnknownAirport(shown));
            }
        };

        self.store.set_tuned_in(code.clone());
        self.store.ensure_controller(&code);
        tracing::info!("Radio tuned to {}", code);
        self.output.notify(Notification::info(format!(
            "{}{}{}",
            msg.tune_in, code, msg.frequency
        )));
        Ok(code)
    }

    pub fn set_mode(&self, selection: ModeOverride) {
        self.store.set_mode_override(selection);
        tracing::info!("ATC mode set to {}", selection);
        self.output.notify(Notification::info(format!(
            "{}{}",
            self.messages().mode_switch,
            selection
        )));
    }

    pub fn set_language(&self, language: Language) {
        self.store.set_language(language);
        tracing::info!("Language set to {}", language);
        self.output.notify(Notification::info(format!(
            "{}{}",
            language.messages().language_switch,
            language.display_name()
        )));
    }

    /// Recompute the nearest airport and announce it when it changes.
    ///
    /// Returns the newly proximate airport, if any. An empty airport
    /// table is an error; the registry is expected to always be populated.
    pub fn proximity_tick(&self) -> Result<Option<AirportCode>, CoreError> {
        let nearest = find_nearest(self.simulator.aircraft_position(), self.airports.as_ref())
            .ok_or(CoreError::EmptyAirportTable)?;

        if !self.store.update_last_proximate(&nearest.code) {
            return Ok(None);
        }

        let msg = self.messages();
        tracing::info!(
            "Now in range of {} ({:.1} nm)",
            nearest.code,
            nearest.distance_nm
        );
        self.output.notify(Notification::info(format!(
            "{}{}. {}{}{}",
            msg.in_range,
            self.catalog.display_name(&nearest.code),
            msg.set_frequency,
            nearest.code,
            msg.to_tune_in
        )));
        self.store.ensure_controller(&nearest.code);
        Ok(Some(nearest.code))
    }

    /// Typed transmission. `None` or blank text means the pilot cancelled.
    pub async fn transmit_text(&self, message: Option<&str>) -> Result<ChatMessage, TransmitError> {
        let code = self.require_tuned()?;

        let Some(text) = message.map(str::trim).filter(|t| !t.is_empty()) else {
            self.output.notify(Notification::info(self.messages().cancelled));
            return Err(TransmitError::UserCancelled);
        };

        self.dispatch(code, text).await
    }

    /// Spoken transmission captured through `recognizer`.
    pub async fn transmit_voice<R: SpeechRecognizer>(
        &self,
        recognizer: &R,
    ) -> Result<ChatMessage, TransmitError> {
        let code = self.require_tuned()?;
        let language = self.store.language();
        let msg = language.messages();

        match capture_transcript(recognizer, language, self.config.speech_timeout()).await {
            Ok(transcript) => self.dispatch(code, &transcript).await,
            Err(SpeechError::NoSpeech) => {
                self.output.notify(Notification::error(msg.no_speech));
                Err(SpeechError::NoSpeech.into())
            }
            Err(e) => {
                tracing::warn!("Speech capture failed: {}", e);
                self.output
                    .notify(Notification::error(format!("{}{}", msg.speech_error, e)));
                Err(e.into())
            }
        }
    }

    fn require_tuned(&self) -> Result<AirportCode, TransmitError> {
        self.store.tuned_in().ok_or_else(|| {
            tracing::warn!("Transmission rejected, no frequency tuned");
            self.output
                .notify(Notification::error(self.messages().no_frequency));
            TransmitError::NoFrequencyTuned
        })
    }

    async fn dispatch(&self, code: AirportCode, utterance: &str) -> Result<ChatMessage, TransmitError> {
        let language = self.store.language();
        let msg = language.messages();
        let airport_name = self.catalog.display_name(&code);

        let Some(controller) = self.store.controller(&code) else {
            tracing::warn!("No controller on duty at {}", code);
            self.output.play_static();
            self.output.notify(Notification::info(format!(
                "{}{}{}",
                msg.airport_not_found, airport_name, msg.closed
            )));
            self.store.ensure_controller(&code);
            return Err(TransmitError::ControllerUnavailable(code));
        };

        let Some(airport_position) = self.airports.position(&code) else {
            tracing::warn!("Tuned airport {} left the airport registry", code);
            self.output.notify(Notification::error(format!(
                "{}{}{}",
                msg.airport_not_found, code, msg.cannot_be_found
            )));
            return Err(TransmitError::UnknownAirport(code.to_string()));
        };

        let scene = self.simulator.scene();
        let distance = distance_nm(scene.aircraft, airport_position);
        if distance > self.config.max_range_nm {
            tracing::warn!("{} out of range at {:.1} nm", code, distance);
            self.output.play_static();
            self.output.notify(Notification::error(format!(
                "{}{}{}{:.0}{}",
                msg.airport_not_found,
                code,
                msg.out_of_range,
                self.config.max_range_nm,
                msg.out_of_range_suffix
            )));
            return Err(TransmitError::OutOfRange {
                code,
                distance_nm: distance,
            });
        }

        let Some(_claim) = self.store.try_claim(&code) else {
            tracing::warn!("{} busy, transmission dropped", code);
            self.output
                .notify(Notification::info(format!("{}{}", airport_name, msg.busy)));
            return Err(TransmitError::FrequencyBusy(code));
        };

        let today = Utc::now().date_naive();
        let record = self.simulator.pilot();
        let pilot = PilotInfo::from_record(&record, today);
        let mode = resolve_mode(
            self.store.mode_override(),
            scene.on_ground,
            scene.sea_altitude_ft,
        );
        let briefing = Briefing {
            airport: &code,
            airport_name: &airport_name,
            airport_position,
            language,
            date: today,
        };

        let update = build_situational_update(&briefing, &scene, mode, &pilot);
        let (messages, previous) = self.store.begin_turn(
            &code,
            || build_intro(&briefing, &controller, mode, &pilot, &scene),
            update,
            utterance,
        );

        self.output.notify(Notification::pilot(
            &scene.aircraft_name,
            display_callsign(&record),
            utterance,
        ));
        tracing::debug!("Dispatching {} messages to {} {}", messages.len(), code, mode);

        match self.chat.send(messages).await {
            Ok(reply) => {
                tracing::info!("{} {} replied", code, mode);
                self.store.record_reply(&code, reply.clone());
                self.output
                    .notify(Notification::atc(&code, reply.content.clone()));
                self.output.speak(&reply.content, language);
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Chat service failed for {}: {}", code, e);
                self.store.restore_context(&code, previous);
                self.output
                    .notify(Notification::error(format!("{}{}", airport_name, msg.no_reply)));
                Err(e.into())
            }
        }
    }
}

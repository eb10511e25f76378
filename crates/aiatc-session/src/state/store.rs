//! In-memory session store using DashMap.

use std::sync::{Mutex, MutexGuard, PoisonError};

use aiatc_core::{
    AirportCode, ChatMessage, ControllerIdentity, ControllerRegistry, ConversationContext,
    Language, ModeOverride,
};
use dashmap::{DashMap, DashSet};

/// Radio selections made by the pilot, plus the last proximity result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadioState {
    pub tuned_in: Option<AirportCode>,
    pub last_proximate: Option<AirportCode>,
    pub mode_override: ModeOverride,
    pub language: Language,
}

/// Session state - lives from simulator session start to teardown.
pub struct SessionStore {
    radio: Mutex<RadioState>,
    controllers: Mutex<ControllerRegistry>,
    contexts: DashMap<AirportCode, ConversationContext>,
    in_flight: DashSet<AirportCode>,
}

/// Context as it was before a turn, for rolling back a failed dispatch.
pub type TurnSnapshot = Option<ConversationContext>;

/// Marks an airport as having a chat call outstanding until dropped.
pub struct InFlightGuard<'a> {
    in_flight: &'a DashSet<AirportCode>,
    code: AirportCode,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.code);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SessionStore {
    pub fn new(language: Language) -> Self {
        Self {
            radio: Mutex::new(RadioState {
                language,
                ..RadioState::default()
            }),
            controllers: Mutex::new(ControllerRegistry::new()),
            contexts: DashMap::new(),
            in_flight: DashSet::new(),
        }
    }

    /// Copy of the current radio selections.
    pub fn radio(&self) -> RadioState {
        lock(&self.radio).clone()
    }

    pub fn tuned_in(&self) -> Option<AirportCode> {
        lock(&self.radio).tuned_in.clone()
    }

    pub fn set_tuned_in(&self, code: AirportCode) {
        lock(&self.radio).tuned_in = Some(code);
    }

    pub fn mode_override(&self) -> ModeOverride {
        lock(&self.radio).mode_override
    }

    pub fn set_mode_override(&self, selection: ModeOverride) {
        lock(&self.radio).mode_override = selection;
    }

    pub fn language(&self) -> Language {
        lock(&self.radio).language
    }

    pub fn set_language(&self, language: Language) {
        lock(&self.radio).language = language;
    }

    /// Record the nearest airport. Returns true when it changed.
    pub fn update_last_proximate(&self, code: &AirportCode) -> bool {
        let mut radio = lock(&self.radio);
        if radio.last_proximate.as_ref() == Some(code) {
            return false;
        }
        radio.last_proximate = Some(code.clone());
        true
    }

    pub fn ensure_controller(&self, code: &AirportCode) -> ControllerIdentity {
        lock(&self.controllers).ensure(code)
    }

    pub fn controller(&self, code: &AirportCode) -> Option<ControllerIdentity> {
        lock(&self.controllers).get(code).cloned()
    }

    pub fn context(&self, code: &AirportCode) -> Option<ConversationContext> {
        self.contexts.get(code).map(|ctx| ctx.clone())
    }

    /// Append a pilot turn, creating the context with `intro` on first contact.
    ///
    /// Returns the messages to dispatch and the prior context.
    pub fn begin_turn(
        &self,
        code: &AirportCode,
        intro: impl FnOnce() -> ChatMessage,
        update: ChatMessage,
        utterance: &str,
    ) -> (Vec<ChatMessage>, TurnSnapshot) {
        let previous = self.context(code);
        let mut ctx = self
            .contexts
            .entry(code.clone())
            .or_insert_with(|| ConversationContext::new(intro()));
        let messages = ctx.append_turn(update, utterance).to_vec();
        (messages, previous)
    }

    pub fn record_reply(&self, code: &AirportCode, reply: ChatMessage) {
        if let Some(mut ctx) = self.contexts.get_mut(code) {
            ctx.record_reply(reply);
        }
    }

    /// Put a context back the way it was before a failed turn.
    pub fn restore_context(&self, code: &AirportCode, previous: TurnSnapshot) {
        match previous {
            Some(ctx) => {
                self.contexts.insert(code.clone(), ctx);
            }
            None => {
                self.contexts.remove(code);
            }
        }
    }

    /// Claim the frequency for one outstanding chat call.
    pub fn try_claim(&self, code: &AirportCode) -> Option<InFlightGuard<'_>> {
        if !self.in_flight.insert(code.clone()) {
            return None;
        }
        Some(InFlightGuard {
            in_flight: &self.in_flight,
            code: code.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> AirportCode {
        AirportCode::parse(s).unwrap()
    }

    #[test]
    fn proximity_change_is_reported_once() {
        let store = SessionStore::new(Language::En);
        assert!(store.update_last_proximate(&code("LFPO")));
        assert!(!store.update_last_proximate(&code("LFPO")));
        assert!(store.update_last_proximate(&code("LFPG")));
        assert_eq!(store.radio().last_proximate, Some(code("LFPG")));
    }

    #[test]
    fn intro_is_built_only_on_first_turn() {
        let store = SessionStore::new(Language::En);
        let airport = code("KXYZ");
        let mut intros = 0;

        let (sent, previous) = store.begin_turn(
            &airport,
            || {
                intros += 1;
                ChatMessage::system("intro")
            },
            ChatMessage::system("update 1"),
            "hello",
        );
        assert_eq!(sent.len(), 3);
        assert!(previous.is_none());

        store.record_reply(&airport, ChatMessage::assistant("hi"));
        let (sent, previous) = store.begin_turn(
            &airport,
            || {
                intros += 1;
                ChatMessage::system("second intro")
            },
            ChatMessage::system("update 2"),
            "again",
        );
        assert_eq!(intros, 1);
        assert_eq!(sent[0].content, "intro");
        assert_eq!(previous.unwrap().len(), 4);
    }

    #[test]
    fn restore_undoes_failed_turn() {
        let store = SessionStore::new(Language::En);
        let airport = code("KXYZ");

        let (_, previous) = store.begin_turn(
            &airport,
            || ChatMessage::system("intro"),
            ChatMessage::system("update"),
            "hello",
        );
        store.restore_context(&airport, previous);
        assert!(store.context(&airport).is_none());
    }

    #[test]
    fn in_flight_guard_releases_on_drop() {
        let store = SessionStore::new(Language::En);
        let airport = code("KXYZ");
        let guard = store.try_claim(&airport);
        assert!(guard.is_some());
        assert!(store.try_claim(&airport).is_none());
        drop(guard);
        assert!(store.try_claim(&airport).is_some());
    }
}

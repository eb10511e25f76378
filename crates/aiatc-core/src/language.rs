//! Selectable radio languages and their localized text tables.
//!
//! Each language carries two tables: [`Messages`] for notices shown to the
//! pilot and [`Phrases`] for the fragments spliced into language-model
//! prompts. Prompt scaffolding itself stays in English; only the fragments
//! describing the scene are localized.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    #[default]
    En,
    Fr,
}

/// User-visible notices.
#[derive(Debug)]
pub struct Messages {
    pub no_frequency: &'static str,
    pub cancelled: &'static str,
    pub no_speech: &'static str,
    pub speech_error: &'static str,
    pub mode_switch: &'static str,
    pub language_switch: &'static str,
    pub in_range: &'static str,
    pub set_frequency: &'static str,
    pub to_tune_in: &'static str,
    pub tune_in: &'static str,
    pub frequency: &'static str,
    pub airport_not_found: &'static str,
    pub cannot_be_found: &'static str,
    pub closed: &'static str,
    pub out_of_range: &'static str,
    pub out_of_range_suffix: &'static str,
    pub busy: &'static str,
    pub no_reply: &'static str,
    pub enter_message: &'static str,
    pub enter_airport: &'static str,
}

/// Scene fragments used inside prompts.
#[derive(Debug)]
pub struct Phrases {
    /// Indexed by `CompassPoint as usize`.
    pub compass: [&'static str; 8],
    pub nautical_miles: &'static str,
    pub from_the_airport: &'static str,
    pub at_the_airport: &'static str,
    pub above_the_airport: &'static str,
    pub on_the_ground: &'static str,
    pub in_the_air: &'static str,
    pub moving_at: &'static str,
    pub stationary: &'static str,
    pub flying_at: &'static str,
    pub heading: &'static str,
    pub direction: &'static str,
    pub degrees: &'static str,
    pub day: &'static str,
    pub night: &'static str,
    pub snowy_day: &'static str,
    pub snowy_night: &'static str,
    pub respond_in: &'static str,
}

static EN_MESSAGES: Messages = Messages {
    no_frequency: "No frequency set. Tune in to an airport to set the frequency!",
    cancelled: "You cancelled the dialog",
    no_speech: "No speech recognized. Speak up?",
    speech_error: "Speech recognition error: ",
    mode_switch: "ATC mode switched to ",
    language_switch: "Language switched to ",
    in_range: "You are now in range of ",
    set_frequency: "Set your radio frequency to ",
    to_tune_in: " to tune in with them",
    tune_in: "Your radio is now tuned to ",
    frequency: " frequency. You will now talk to them.",
    airport_not_found: "Airport with code ",
    cannot_be_found: " can not be found!",
    closed: " seems to be closed right now. Try again later...",
    out_of_range: " is out of range. You need to be less than ",
    out_of_range_suffix: " nautical miles away from the airport to contact it.",
    busy: " is still answering your previous call. Stand by...",
    no_reply: " did not answer. Try again...",
    enter_message: "Please enter your message to the ATC:",
    enter_airport: "Enter airport ICAO code",
};

static FR_MESSAGES: Messages = Messages {
    no_frequency: "Aucune fréquence définie. Accordez-vous sur un aéroport pour définir la fréquence!",
    cancelled: "Vous avez annulé la boîte de dialogue",
    no_speech: "Aucune parole reconnue. Parlez plus fort?",
    speech_error: "Erreur de reconnaissance vocale: ",
    mode_switch: "Mode ATC basculé vers ",
    language_switch: "Langue changée en ",
    in_range: "Vous êtes maintenant à portée de ",
    set_frequency: "Définissez votre fréquence radio sur ",
    to_tune_in: " pour vous accorder avec eux",
    tune_in: "Votre radio est maintenant accordée à ",
    frequency: " fréquence. Vous allez maintenant parler avec eux.",
    airport_not_found: "L'aéroport avec le code ",
    cannot_be_found: " ne peut pas être trouvé!",
    closed: " semble être fermé en ce moment. Réessayez plus tard...",
    out_of_range: " est hors de portée. Vous devez être à moins de ",
    out_of_range_suffix: " milles nautiques de l'aéroport pour le contacter.",
    busy: " répond encore à votre appel précédent. Patientez...",
    no_reply: " n'a pas répondu. Réessayez...",
    enter_message: "Veuillez entrer votre message à l'ATC:",
    enter_airport: "Entrez le code ICAO de l'aéroport",
};

static EN_PHRASES: Phrases = Phrases {
    compass: [
        "north",
        "northeast",
        "east",
        "southeast",
        "south",
        "southwest",
        "west",
        "northwest",
    ],
    nautical_miles: "nautical miles",
    from_the_airport: "from the airport",
    at_the_airport: "at the airport",
    above_the_airport: "above the airport",
    on_the_ground: "on the ground",
    in_the_air: "in the air",
    moving_at: "moving at ",
    stationary: "stationary",
    flying_at: "flying at ",
    heading: "heading ",
    direction: "direction ",
    degrees: "degrees",
    day: "day",
    night: "night",
    snowy_day: "snowy day",
    snowy_night: "snowy night",
    respond_in: "You will respond in English. ",
};

static FR_PHRASES: Phrases = Phrases {
    compass: [
        "nord",
        "nord-est",
        "est",
        "sud-est",
        "sud",
        "sud-ouest",
        "ouest",
        "nord-ouest",
    ],
    nautical_miles: "milles nautiques",
    from_the_airport: "de l'aéroport",
    at_the_airport: "à l'aéroport",
    above_the_airport: "au-dessus de l'aéroport",
    on_the_ground: "au sol",
    in_the_air: "en l'air",
    moving_at: "se déplaçant à ",
    stationary: "stationnaire",
    flying_at: "volant à ",
    heading: "cap ",
    direction: "direction ",
    degrees: "degrés",
    day: "jour",
    night: "nuit",
    snowy_day: "jour enneigé",
    snowy_night: "nuit enneigée",
    respond_in: "Vous répondrez en français. ",
};

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Fr => "FR",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
        }
    }

    /// BCP 47 tag handed to speech recognition and synthesis.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Fr => "fr-FR",
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Language::En => &EN_MESSAGES,
            Language::Fr => &FR_MESSAGES,
        }
    }

    pub fn phrases(self) -> &'static Phrases {
        match self {
            Language::En => &EN_PHRASES,
            Language::Fr => &FR_PHRASES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownLanguage(s.to_string()))
    }
}

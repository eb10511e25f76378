//! Session runtime for the AI ATC companion: radio state, transmissions
//! and the background proximity check.

pub mod chat;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod loops;
pub mod output;
pub mod runtime;
pub mod simulator;
pub mod speech;
pub mod state;

pub use chat::{ChatError, ChatService, HttpChatClient};
pub use config::Config;
pub use engine::{AtcEngine, Collaborators};
pub use error::TransmitError;
pub use output::{ConsoleOutput, NoticeLevel, Notification, OutputSink};
pub use runtime::SessionRuntime;
pub use simulator::Simulator;
pub use speech::{SpeechError, SpeechRecognizer};

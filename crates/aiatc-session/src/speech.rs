//! Speech-to-text capture for voice transmissions.

use std::future::Future;
use std::time::Duration;

use aiatc_core::Language;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("no speech recognized")]
    NoSpeech,
    #[error("recognition timed out")]
    TimedOut,
    #[error("{0}")]
    Recognizer(String),
}

/// One-shot recognizer for a single utterance.
pub trait SpeechRecognizer: Send + Sync {
    fn recognize(&self, language: Language) -> impl Future<Output = Result<String, SpeechError>> + Send;
}

/// Capture one utterance, classifying silence and timeouts as failures.
///
/// Dropping the returned future cancels the capture.
pub async fn capture_transcript<R: SpeechRecognizer>(
    recognizer: &R,
    language: Language,
    timeout: Duration,
) -> Result<String, SpeechError> {
    let transcript = tokio::time::timeout(timeout, recognizer.recognize(language))
        .await
        .map_err(|_| SpeechError::TimedOut)??;

    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(SpeechError::NoSpeech);
    }
    Ok(transcript.to_string())
}

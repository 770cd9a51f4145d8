//! Recognition engine wrapper
//!
//! Wraps the device's vocabulary-constrained word recognizer as an
//! explicit session: `start` pushes the pending vocabulary, subscribes to
//! word events, and hands the session's channel to the caller; `stop`
//! tears the subscription down. One recognized word ends a session; the
//! engine never restarts on its own.

use crate::device::{Recognition, RobotDevice};
use crate::error::SpeechError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Vocabulary-constrained, one-shot-per-session word recognizer
pub struct RecognitionEngine {
    device: Arc<dyn RobotDevice>,
    vocabulary: Vec<String>,
    active: bool,
}

impl RecognitionEngine {
    pub fn new(device: Arc<dyn RobotDevice>) -> Self {
        Self {
            device,
            vocabulary: Vec::new(),
            active: false,
        }
    }

    /// Replace the word list used by the next session
    ///
    /// Must be called before `start`.
    pub fn set_vocabulary(&mut self, words: Vec<String>) {
        self.vocabulary = words;
    }

    /// Begin a listen session
    ///
    /// Pushes the vocabulary to the device and subscribes to word events.
    /// Returns the session's channel; it stays valid until `stop`. Starting
    /// while a session is active is a lifecycle bug and fails with
    /// [`SpeechError::AlreadyListening`].
    pub async fn start(&mut self) -> Result<mpsc::Receiver<Recognition>, SpeechError> {
        if self.active {
            return Err(SpeechError::AlreadyListening);
        }

        self.device.set_vocabulary(&self.vocabulary).await?;
        let events = self.device.subscribe_words().await?;
        self.active = true;
        tracing::debug!("Listen session started ({} words)", self.vocabulary.len());
        Ok(events)
    }

    /// End the listen session
    ///
    /// Idempotent: stopping when no session is active is a harmless no-op.
    /// Device unsubscribe failures are swallowed; the underlying
    /// subscription may already be gone on real hardware.
    pub async fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        if let Err(e) = self.device.unsubscribe_words().await {
            tracing::debug!("Recognizer unsubscribe failed (already torn down?): {}", e);
        } else {
            tracing::debug!("Listen session stopped");
        }
    }

    /// Whether a listen session is currently active
    pub fn is_active(&self) -> bool {
        self.active
    }
}

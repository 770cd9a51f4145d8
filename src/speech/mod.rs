//! Speech arbitration core
//!
//! The single-speaker gate ([`SpeechGate`]), the recognition session
//! wrapper ([`RecognitionEngine`]), the word→skill registry
//! ([`ListenerRegistry`]), and the state machine tying them together
//! ([`RecognitionCoordinator`]). Skills implement [`WordListener`] and
//! register a private vocabulary subset; the coordinator fans each
//! recognized word out to the listeners whose subset contains it.

pub mod coordinator;
pub mod engine;
pub mod gate;
pub mod registry;

pub use coordinator::RecognitionCoordinator;
pub use engine::RecognitionEngine;
pub use gate::SpeechGate;
pub use registry::{ListenerId, ListenerRegistry};

use crate::error::SkillError;

/// Callback contract every skill implements to receive recognized words
#[async_trait::async_trait]
pub trait WordListener: Send + Sync {
    /// Called with the best-match word and the full ranked candidate list
    ///
    /// Failures are logged by the dispatcher and never abort dispatch to
    /// the other listeners.
    async fn word_recognized(&self, word: &str, all_candidates: &[String])
        -> Result<(), SkillError>;
}

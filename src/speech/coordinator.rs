//! Recognition coordinator — the cycle state machine
//!
//! Ties the speak gate, the recognition engine, and the listener registry
//! together. One cycle: trigger → close the gate → listen with the union
//! vocabulary → word arrives → stop the engine → reopen the gate → fan the
//! word out to matching listeners. At most one cycle is in flight; a
//! trigger during an active cycle is dropped, not queued.
//!
//! Gate reopening and session teardown live on a cleanup path that runs on
//! every exit of the listening phase, so partial failures always leave the
//! system idle with the gate open.

use super::{ListenerId, ListenerRegistry, RecognitionEngine, SpeechGate, WordListener};
use crate::device::{Recognition, TouchButton};
use crate::error::SpeechError;
use crate::state::CyclePhase;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mutual-exclusion state machine around one recognition cycle
pub struct RecognitionCoordinator {
    gate: Arc<SpeechGate>,
    engine: tokio::sync::Mutex<RecognitionEngine>,
    registry: Mutex<ListenerRegistry>,
    /// At-most-one-concurrent-cycle flag
    busy: AtomicBool,
    phase: Mutex<CyclePhase>,
    /// Spoken when a touch trigger starts a cycle
    prompt: Option<String>,
}

impl RecognitionCoordinator {
    pub fn new(
        gate: Arc<SpeechGate>,
        engine: RecognitionEngine,
        prompt: Option<String>,
    ) -> Self {
        Self {
            gate,
            engine: tokio::sync::Mutex::new(engine),
            registry: Mutex::new(ListenerRegistry::new()),
            busy: AtomicBool::new(false),
            phase: Mutex::new(CyclePhase::Idle),
            prompt,
        }
    }

    /// Register a skill's word subset (replaces any previous registration)
    pub fn add_listener(
        &self,
        id: ListenerId,
        words: Vec<String>,
        handler: Arc<dyn WordListener>,
    ) {
        self.registry.lock().unwrap().add_listener(id, words, handler);
    }

    /// Unregister a skill
    pub fn remove_listener(&self, id: &ListenerId) -> Result<(), SpeechError> {
        self.registry.lock().unwrap().remove_listener(id)
    }

    /// Observable phase of the current cycle
    pub fn phase(&self) -> CyclePhase {
        *self.phase.lock().unwrap()
    }

    /// Whether a cycle is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// A touch button event from the robot
    ///
    /// A press starts a recognition cycle over the union vocabulary,
    /// speaking the configured prompt first. Releases are ignored, and so
    /// is a press while a cycle is already in flight.
    pub async fn on_touch_event(&self, button: TouchButton, pressed: bool) {
        if !pressed {
            return;
        }
        if !self.begin_cycle() {
            tracing::debug!("Touch {} dropped, recognition cycle in flight", button);
            return;
        }

        tracing::info!("Recognition cycle triggered by {} button", button);
        if let Some(prompt) = &self.prompt {
            if let Err(e) = self.gate.say(prompt).await {
                tracing::warn!("Prompt failed: {}", e);
            }
        }

        if let Err(e) = self.run_cycle(None).await {
            tracing::warn!("Recognition cycle failed: {}", e);
        }
        self.end_cycle();
    }

    /// Run one recognition cycle, fanning the word out to listeners
    ///
    /// Listens with the given vocabulary, or the registry union when
    /// `None`. Fails with [`SpeechError::Busy`] when a cycle is already in
    /// flight.
    pub async fn recognize(&self, vocabulary: Option<Vec<String>>) -> Result<(), SpeechError> {
        if !self.begin_cycle() {
            return Err(SpeechError::Busy);
        }
        let result = self.run_cycle(vocabulary).await;
        self.end_cycle();
        result
    }

    /// Ask one question: listen for exactly one of `words` and return it
    ///
    /// Same pause/start/stop/resume sequence as a full cycle, but the word
    /// is returned to the caller instead of being dispatched. Suspends the
    /// caller until a word arrives.
    pub async fn simple_recognize(&self, words: Vec<String>) -> Result<String, SpeechError> {
        if !self.begin_cycle() {
            return Err(SpeechError::Busy);
        }

        let result = async {
            let recognition = self.listen_once(words).await?;
            recognition
                .candidates
                .into_iter()
                .next()
                .ok_or(SpeechError::Interrupted)
        }
        .await;

        self.set_phase(CyclePhase::Idle);
        self.end_cycle();
        result
    }

    /// Tear the coordinator down: force the session closed and reopen the
    /// gate so any suspended `say` caller unblocks
    pub async fn shutdown(&self) {
        self.engine.lock().await.stop().await;
        self.gate.resume();
        self.set_phase(CyclePhase::Idle);
        self.busy.store(false, Ordering::SeqCst);
    }

    fn begin_cycle(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn end_cycle(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }

    fn set_phase(&self, phase: CyclePhase) {
        *self.phase.lock().unwrap() = phase;
    }

    async fn run_cycle(&self, vocabulary: Option<Vec<String>>) -> Result<(), SpeechError> {
        let vocabulary = match vocabulary {
            Some(words) => words,
            None => self.registry.lock().unwrap().union_vocabulary(),
        };

        let result = async {
            let recognition = self.listen_once(vocabulary).await?;
            self.set_phase(CyclePhase::Dispatching);
            self.dispatch(recognition).await;
            Ok(())
        }
        .await;

        self.set_phase(CyclePhase::Idle);
        result
    }

    /// The listening phase: gate closed, session active, one word awaited
    ///
    /// The gate is paused before the subscription starts and resumed after
    /// it stops, on every exit path.
    async fn listen_once(&self, vocabulary: Vec<String>) -> Result<Recognition, SpeechError> {
        if vocabulary.is_empty() {
            return Err(SpeechError::EmptyVocabulary);
        }

        self.gate.pause().await;
        let result = self.await_word(vocabulary).await;

        // Cleanup, success or failure: stop the session, then reopen the
        // gate. Stop errors are swallowed inside the engine; the resume
        // must happen regardless.
        self.engine.lock().await.stop().await;
        self.gate.resume();
        result
    }

    async fn await_word(&self, vocabulary: Vec<String>) -> Result<Recognition, SpeechError> {
        let mut events = {
            let mut engine = self.engine.lock().await;
            engine.set_vocabulary(vocabulary);
            engine.start().await?
        };

        self.set_phase(CyclePhase::Listening);
        events.recv().await.ok_or(SpeechError::Interrupted)
    }

    /// Fan a recognized word out to every listener registered for it
    async fn dispatch(&self, recognition: Recognition) {
        let Some(best) = recognition.candidates.first().cloned() else {
            tracing::debug!("Recognition event with no candidates, dropped");
            return;
        };

        let matches = self.registry.lock().unwrap().matching_listeners(&best);
        if matches.is_empty() {
            tracing::debug!("No listener registered for {:?}", best);
            return;
        }

        tracing::info!("Recognized {:?}, notifying {} listener(s)", best, matches.len());
        for (id, handler) in matches {
            if let Err(e) = handler.word_recognized(&best, &recognition.candidates).await {
                tracing::warn!("Listener {} failed on {:?}: {}", id, best, e);
            }
        }
    }
}

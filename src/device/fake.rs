//! Scripted in-memory device for unit tests
//!
//! Records every capability call in order and lets tests queue recognition
//! results, inject failures, and slow down the speak call to exercise the
//! gate's serialization.

use super::{Recognition, RobotDevice, TouchButton, TouchEvent};
use crate::error::DeviceError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Default)]
struct State {
    spoken: Vec<String>,
    speak_delay: Option<Duration>,
    speak_fails: bool,
    unsubscribe_fails: bool,
    vocabulary: Vec<String>,
    /// Recognitions delivered as soon as a word subscription starts
    queued_words: VecDeque<Recognition>,
    word_sink: Option<mpsc::Sender<Recognition>>,
    touch_sink: Option<mpsc::Sender<TouchEvent>>,
    calls: Vec<String>,
}

/// In-memory [`RobotDevice`] recording calls in order
pub struct FakeDevice {
    state: Mutex<State>,
    speaking_now: AtomicUsize,
    max_concurrent: AtomicUsize,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            speaking_now: AtomicUsize::new(0),
            max_concurrent: AtomicUsize::new(0),
        }
    }

    /// Every sentence passed to `speak`, in order
    pub fn spoken(&self) -> Vec<String> {
        self.state.lock().unwrap().spoken.clone()
    }

    /// Every capability call, in order ("speak", "subscribe_words", ...)
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Vocabulary from the most recent `set_vocabulary`
    pub fn vocabulary(&self) -> Vec<String> {
        self.state.lock().unwrap().vocabulary.clone()
    }

    /// Whether a word subscription is currently active
    pub fn word_subscribed(&self) -> bool {
        self.state.lock().unwrap().word_sink.is_some()
    }

    /// Largest number of overlapping `speak` calls observed
    pub fn max_concurrent_speaks(&self) -> usize {
        self.max_concurrent.load(Ordering::SeqCst)
    }

    /// Make `speak` take this long (to expose interleaving)
    pub fn delay_speak(&self, delay: Duration) {
        self.state.lock().unwrap().speak_delay = Some(delay);
    }

    /// Make every `speak` call fail
    pub fn fail_speak(&self) {
        self.state.lock().unwrap().speak_fails = true;
    }

    /// Make every `unsubscribe_words` call fail
    pub fn fail_unsubscribe(&self) {
        self.state.lock().unwrap().unsubscribe_fails = true;
    }

    /// Deliver this recognition as soon as the next word subscription starts
    pub fn queue_word<I, S>(&self, candidates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let recognition = Recognition {
            candidates: candidates.into_iter().map(Into::into).collect(),
        };
        self.state.lock().unwrap().queued_words.push_back(recognition);
    }

    /// Push a recognition into the active word subscription
    pub fn push_word<I, S>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let recognition = Recognition {
            candidates: candidates.into_iter().map(Into::into).collect(),
        };
        let sink = self.state.lock().unwrap().word_sink.clone();
        match sink {
            Some(sink) => sink.try_send(recognition).is_ok(),
            None => false,
        }
    }

    /// Push a touch event into the active touch subscription
    pub fn push_touch(&self, button: TouchButton, pressed: bool) -> bool {
        let sink = self.state.lock().unwrap().touch_sink.clone();
        match sink {
            Some(sink) => sink.try_send(TouchEvent { button, pressed }).is_ok(),
            None => false,
        }
    }

    fn record(&self, call: &str) {
        self.state.lock().unwrap().calls.push(call.to_string());
    }
}

impl Default for FakeDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RobotDevice for FakeDevice {
    async fn speak(&self, text: &str) -> Result<(), DeviceError> {
        self.record("speak");
        let (delay, fails) = {
            let state = self.state.lock().unwrap();
            (state.speak_delay, state.speak_fails)
        };

        let now = self.speaking_now.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.speaking_now.fetch_sub(1, Ordering::SeqCst);

        if fails {
            return Err(DeviceError::Rejected("speak failed".to_string()));
        }
        self.state.lock().unwrap().spoken.push(text.to_string());
        Ok(())
    }

    async fn set_vocabulary(&self, words: &[String]) -> Result<(), DeviceError> {
        self.record("set_vocabulary");
        self.state.lock().unwrap().vocabulary = words.to_vec();
        Ok(())
    }

    async fn subscribe_words(&self) -> Result<mpsc::Receiver<Recognition>, DeviceError> {
        self.record("subscribe_words");
        let (tx, rx) = mpsc::channel(8);
        let mut state = self.state.lock().unwrap();
        if let Some(recognition) = state.queued_words.pop_front() {
            let _ = tx.try_send(recognition);
        }
        state.word_sink = Some(tx);
        Ok(rx)
    }

    async fn unsubscribe_words(&self) -> Result<(), DeviceError> {
        self.record("unsubscribe_words");
        let mut state = self.state.lock().unwrap();
        state.word_sink.take();
        if state.unsubscribe_fails {
            return Err(DeviceError::Rejected("not subscribed".to_string()));
        }
        Ok(())
    }

    async fn subscribe_touch(&self) -> Result<mpsc::Receiver<TouchEvent>, DeviceError> {
        self.record("subscribe_touch");
        let (tx, rx) = mpsc::channel(8);
        self.state.lock().unwrap().touch_sink = Some(tx);
        Ok(rx)
    }

    async fn run_behaviour(&self, name: &str) -> Result<(), DeviceError> {
        self.record(&format!("run_behaviour:{}", name));
        Ok(())
    }

    async fn fade_leds(
        &self,
        group: &str,
        rgb: u32,
        _duration_secs: f32,
    ) -> Result<(), DeviceError> {
        self.record(&format!("fade_leds:{}:{:#010x}", group, rgb));
        Ok(())
    }
}

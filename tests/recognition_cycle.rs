//! End-to-end recognition cycle tests over the public API
//!
//! A scripted in-memory device stands in for the robot gateway; the
//! coordinator, gate, engine, and real skills are wired the way the
//! daemon wires them.

use robovox::config::LedsConfig;
use robovox::device::{Recognition, RobotDevice, TouchButton, TouchEvent};
use robovox::error::DeviceError;
use robovox::skills::{BehaviourSkill, LedsSkill};
use robovox::speech::{RecognitionCoordinator, RecognitionEngine, SpeechGate};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// In-memory device that replays queued recognitions on subscribe
#[derive(Default)]
struct ScriptedDevice {
    spoken: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    queued: Mutex<Vec<Recognition>>,
}

impl ScriptedDevice {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn queue_word(&self, candidates: &[&str]) {
        self.queued.lock().unwrap().push(Recognition {
            candidates: candidates.iter().map(|w| w.to_string()).collect(),
        });
    }

    fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RobotDevice for ScriptedDevice {
    async fn speak(&self, text: &str) -> Result<(), DeviceError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn set_vocabulary(&self, words: &[String]) -> Result<(), DeviceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set_vocabulary:{}", words.join(",")));
        Ok(())
    }

    async fn subscribe_words(&self) -> Result<mpsc::Receiver<Recognition>, DeviceError> {
        let (tx, rx) = mpsc::channel(8);
        for recognition in self.queued.lock().unwrap().drain(..) {
            tx.try_send(recognition).ok();
        }
        // Keep the channel open while the session runs
        tokio::spawn(async move {
            tx.closed().await;
        });
        Ok(rx)
    }

    async fn unsubscribe_words(&self) -> Result<(), DeviceError> {
        self.calls.lock().unwrap().push("unsubscribe_words".into());
        Ok(())
    }

    async fn subscribe_touch(&self) -> Result<mpsc::Receiver<TouchEvent>, DeviceError> {
        let (_tx, rx) = mpsc::channel(8);
        Ok(rx)
    }

    async fn run_behaviour(&self, name: &str) -> Result<(), DeviceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("run_behaviour:{}", name));
        Ok(())
    }

    async fn fade_leds(
        &self,
        group: &str,
        rgb: u32,
        _duration_secs: f32,
    ) -> Result<(), DeviceError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("fade_leds:{}:{:#010x}", group, rgb));
        Ok(())
    }
}

fn wire(device: &Arc<ScriptedDevice>) -> (Arc<SpeechGate>, Arc<RecognitionCoordinator>) {
    let gate = Arc::new(SpeechGate::new(device.clone()));
    let engine = RecognitionEngine::new(device.clone());
    let coordinator = Arc::new(RecognitionCoordinator::new(
        gate.clone(),
        engine,
        Some("Je suis prêt à recevoir des ordres".to_string()),
    ));
    (gate, coordinator)
}

#[tokio::test]
async fn touch_cycle_dispatches_to_the_right_skill() {
    let device = ScriptedDevice::new();
    let (_gate, coordinator) = wire(&device);

    coordinator.add_listener(
        BehaviourSkill::listener_id(),
        BehaviourSkill::vocabulary(),
        Arc::new(BehaviourSkill::new(device.clone())),
    );
    coordinator.add_listener(
        LedsSkill::listener_id(),
        LedsSkill::vocabulary(),
        Arc::new(LedsSkill::new(device.clone(), LedsConfig::default())),
    );

    device.queue_word(&["danse", "gauche"]);
    coordinator.on_touch_event(TouchButton::Middle, true).await;

    assert_eq!(device.spoken(), ["Je suis prêt à recevoir des ordres"]);
    let calls = device.calls();
    assert!(calls.contains(&"run_behaviour:dance_twist".to_string()));
    assert!(!calls.iter().any(|c| c.starts_with("fade_leds")));
    assert!(!coordinator.is_busy());
}

#[tokio::test]
async fn color_word_fades_the_leds() {
    let device = ScriptedDevice::new();
    let (gate, coordinator) = wire(&device);

    coordinator.add_listener(
        LedsSkill::listener_id(),
        LedsSkill::vocabulary(),
        Arc::new(LedsSkill::new(device.clone(), LedsConfig::default())),
    );

    device.queue_word(&["vert"]);
    coordinator.recognize(None).await.unwrap();

    assert!(device
        .calls()
        .contains(&"fade_leds:AllLeds:0x00009900".to_string()));
    // The gate is open again: speech goes straight through
    gate.say("et voilà").await.unwrap();
    assert_eq!(device.spoken(), ["et voilà"]);
}

#[tokio::test]
async fn simple_recognize_answers_one_question() {
    let device = ScriptedDevice::new();
    let (gate, coordinator) = wire(&device);

    device.queue_word(&["bleu"]);
    let word = coordinator
        .simple_recognize(vec!["bleu".to_string(), "rouge".to_string()])
        .await
        .unwrap();

    assert_eq!(word, "bleu");
    assert!(gate.is_open());
    assert!(!coordinator.is_busy());
}

//! Speak gate — pause/resume arbitration around the TTS device
//!
//! A single flag {OPEN, CLOSED} plus a serialization lock on the in-flight
//! speak call. `say` suspends its caller while the gate is closed and
//! serializes all callers so device calls never interleave. `pause`
//! acquires the serialization lock before closing the gate, so a `say`
//! that already passed the gate check finishes before the gate closes.

use crate::device::RobotDevice;
use crate::error::DeviceError;
use std::sync::Arc;
use tokio::sync::watch;

/// Mutual-exclusion gate guarding the robot's text-to-speech output
pub struct SpeechGate {
    device: Arc<dyn RobotDevice>,
    /// Held for the duration of one device speak call
    speaking: tokio::sync::Mutex<()>,
    /// true while the gate is open
    open: watch::Sender<bool>,
}

impl SpeechGate {
    pub fn new(device: Arc<dyn RobotDevice>) -> Self {
        let (open, _) = watch::channel(true);
        Self {
            device,
            speaking: tokio::sync::Mutex::new(()),
            open,
        }
    }

    /// Say the given sentence, waiting for authorization to speak
    ///
    /// Suspends until the gate is open, then performs the device call.
    /// Callers are serialized; fails only if the device call fails.
    pub async fn say(&self, text: &str) -> Result<(), DeviceError> {
        let _speaking = self.speaking.lock().await;

        let mut open = self.open.subscribe();
        while !*open.borrow_and_update() {
            tracing::debug!("Speak gate closed, waiting to say {:?}", text);
            if open.changed().await.is_err() {
                // Gate dropped mid-wait; only possible during teardown
                return Err(DeviceError::Disconnected);
            }
        }

        tracing::debug!("Saying {:?}", text);
        self.device.speak(text).await
    }

    /// Close the gate; the next `say` calls wait for `resume`
    ///
    /// Waits for an in-flight speak to finish first. No-op when already
    /// closed.
    pub async fn pause(&self) {
        if *self.open.borrow() {
            let _speaking = self.speaking.lock().await;
            self.open.send_replace(false);
            tracing::debug!("Speak gate closed");
        }
    }

    /// Reopen the gate and wake suspended `say` callers
    ///
    /// No-op when already open.
    pub fn resume(&self) {
        if !self.open.send_replace(true) {
            tracing::debug!("Speak gate reopened");
        }
    }

    /// Check whether the gate currently authorizes speaking
    pub fn is_open(&self) -> bool {
        *self.open.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeDevice;
    use std::time::Duration;

    fn gate() -> (Arc<FakeDevice>, SpeechGate) {
        let device = Arc::new(FakeDevice::new());
        let gate = SpeechGate::new(device.clone());
        (device, gate)
    }

    #[tokio::test]
    async fn test_say_passes_when_open() {
        let (device, gate) = gate();
        gate.say("bonjour").await.unwrap();
        assert_eq!(device.spoken(), ["bonjour"]);
    }

    #[tokio::test]
    async fn test_say_blocks_while_paused() {
        let (device, gate) = gate();
        let gate = Arc::new(gate);
        gate.pause().await;

        let speaker = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.say("bonjour").await })
        };

        // Give the say call time to reach the gate; the device must not
        // have been called while the gate is closed.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(device.spoken().is_empty());
        assert!(!speaker.is_finished());

        gate.resume();
        speaker.await.unwrap().unwrap();
        assert_eq!(device.spoken(), ["bonjour"]);
    }

    #[tokio::test]
    async fn test_pause_waits_for_inflight_say() {
        let (device, gate) = gate();
        let gate = Arc::new(gate);
        device.delay_speak(Duration::from_millis(100));

        let speaker = {
            let gate = gate.clone();
            tokio::spawn(async move { gate.say("longue phrase").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // pause() returns only after the running speak completed
        gate.pause().await;
        assert!(speaker.is_finished());
        assert_eq!(device.spoken(), ["longue phrase"]);
        assert!(!gate.is_open());
    }

    #[tokio::test]
    async fn test_pause_and_resume_are_idempotent() {
        let (_device, gate) = gate();

        gate.pause().await;
        gate.pause().await;
        assert!(!gate.is_open());

        gate.resume();
        gate.resume();
        assert!(gate.is_open());
    }

    #[tokio::test]
    async fn test_say_propagates_device_failure() {
        let (device, gate) = gate();
        device.fail_speak();
        assert!(gate.say("bonjour").await.is_err());
    }

    #[tokio::test]
    async fn test_callers_are_serialized() {
        let (device, gate) = gate();
        let gate = Arc::new(gate);
        device.delay_speak(Duration::from_millis(20));

        let mut handles = Vec::new();
        for text in ["un", "deux", "trois"] {
            let gate = gate.clone();
            handles.push(tokio::spawn(async move { gate.say(text).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // All three went through, one at a time
        assert_eq!(device.spoken().len(), 3);
        assert_eq!(device.max_concurrent_speaks(), 1);
    }
}

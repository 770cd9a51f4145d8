//! Robot device capability layer
//!
//! The rest of the crate never talks to robot hardware directly; it goes
//! through the [`RobotDevice`] trait. The production implementation is a
//! line-delimited JSON client for a robot gateway over TCP
//! ([`remote::RemoteDevice`]). Word and touch events are pushed by the
//! gateway and delivered through per-subscription channels.

#[cfg(test)]
pub mod fake;
pub mod remote;

use crate::config::DeviceConfig;
use crate::error::DeviceError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// A ranked recognition result pushed by the speech engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    /// Candidate words, best match first
    pub candidates: Vec<String>,
}

/// Touch buttons on the robot's head and chest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Front,
    Middle,
    Rear,
    Chest,
}

impl TouchButton {
    /// Parse a gateway button name; unknown names are ignored upstream
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "front" => Some(TouchButton::Front),
            "middle" => Some(TouchButton::Middle),
            "rear" => Some(TouchButton::Rear),
            "chest" => Some(TouchButton::Chest),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TouchButton::Front => "front",
            TouchButton::Middle => "middle",
            TouchButton::Rear => "rear",
            TouchButton::Chest => "chest",
        }
    }
}

impl std::fmt::Display for TouchButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A touch button press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub button: TouchButton,
    pub pressed: bool,
}

/// Capability interface to the robot hardware proxy
///
/// All calls are fallible remote calls. Unsubscribing from an already
/// torn-down subscription is expected to fail on real hardware; callers
/// treat that as non-fatal.
#[async_trait::async_trait]
pub trait RobotDevice: Send + Sync {
    /// Perform the device text-to-speech call
    async fn speak(&self, text: &str) -> Result<(), DeviceError>;

    /// Replace the recognizer's active word list
    async fn set_vocabulary(&self, words: &[String]) -> Result<(), DeviceError>;

    /// Subscribe to recognized-word events
    ///
    /// The returned channel is valid until [`unsubscribe_words`] or the
    /// connection drops.
    ///
    /// [`unsubscribe_words`]: RobotDevice::unsubscribe_words
    async fn subscribe_words(&self) -> Result<mpsc::Receiver<Recognition>, DeviceError>;

    /// End the recognized-word subscription
    async fn unsubscribe_words(&self) -> Result<(), DeviceError>;

    /// Subscribe to touch button events
    async fn subscribe_touch(&self) -> Result<mpsc::Receiver<TouchEvent>, DeviceError>;

    /// Run an installed behaviour by name
    async fn run_behaviour(&self, name: &str) -> Result<(), DeviceError>;

    /// Fade a LED group to an RGB color over the given duration
    async fn fade_leds(&self, group: &str, rgb: u32, duration_secs: f32)
        -> Result<(), DeviceError>;
}

/// Connect to the robot gateway named in the configuration
pub async fn connect(config: &DeviceConfig) -> Result<Arc<dyn RobotDevice>, DeviceError> {
    tracing::info!("Connecting to robot gateway at {}:{}", config.host, config.port);
    let device = remote::RemoteDevice::connect(&config.host, config.port).await?;
    Ok(Arc::new(device))
}

//! Hue skill — touch-driven lamp color changes over the bus
//!
//! A front or rear head-button press picks a lamp, the robot announces it
//! is ready, listens for a color word, and publishes the mapped OpenHAB
//! value to the lamp's topic. This is the synchronous "ask one question"
//! interaction: it rides on `simple_recognize` instead of registering a
//! word listener.

use crate::bus::MessageBus;
use crate::config::HueConfig;
use crate::device::TouchButton;
use crate::error::SkillError;
use crate::speech::{RecognitionCoordinator, SpeechGate};
use std::sync::Arc;

/// Color word → OpenHAB color value (English and French)
const COLOR_MAP: &[(&str, u8)] = &[
    ("red", 1),
    ("green", 2),
    ("yellow", 3),
    ("blue", 4),
    ("rouge", 1),
    ("vert", 2),
    ("jaune", 3),
    ("bleu", 4),
];

/// Default color: blue
const DEFAULT_COLOR: u8 = 4;

const READY_PHRASE: &str = "Je suis prêt à changer de couleur";

/// Drives Hue lamps on the smart-home bus
pub struct HueSkill {
    bus: MessageBus,
    gate: Arc<SpeechGate>,
    coordinator: Arc<RecognitionCoordinator>,
    config: HueConfig,
    topic_prefix: String,
}

impl HueSkill {
    pub fn new(
        bus: MessageBus,
        gate: Arc<SpeechGate>,
        coordinator: Arc<RecognitionCoordinator>,
        config: HueConfig,
        topic_prefix: String,
    ) -> Self {
        Self {
            bus,
            gate,
            coordinator,
            config,
            topic_prefix,
        }
    }

    /// The color words offered to `simple_recognize`
    pub fn color_words() -> Vec<String> {
        COLOR_MAP.iter().map(|(word, _)| word.to_string()).collect()
    }

    /// OpenHAB value for a color word (default color if unknown)
    pub fn color_value(color: &str) -> u8 {
        COLOR_MAP
            .iter()
            .find(|(word, _)| *word == color)
            .map(|(_, value)| *value)
            .unwrap_or(DEFAULT_COLOR)
    }

    /// Clamp a power percentage into the range OpenHAB accepts
    pub fn percent_value(value: i32) -> i32 {
        value.clamp(0, 100)
    }

    /// Topic carrying a lamp's color value
    pub fn color_topic(prefix: &str, lamp: u8) -> String {
        format!("{}/hue{}/color", prefix, lamp)
    }

    /// Topic carrying a lamp's power percentage
    pub fn percent_topic(prefix: &str, lamp: u8) -> String {
        format!("{}/hue{}/percent", prefix, lamp)
    }

    /// Change a lamp's color
    pub async fn color(&self, lamp: u8, color: &str) -> Result<(), SkillError> {
        let value = Self::color_value(color);
        self.bus
            .publish(
                &Self::color_topic(&self.topic_prefix, lamp),
                &value.to_string(),
            )
            .await?;
        Ok(())
    }

    /// Change a lamp's power percentage (clamped to 0–100)
    pub async fn percent(&self, lamp: u8, value: i32) -> Result<(), SkillError> {
        let value = Self::percent_value(value);
        self.bus
            .publish(
                &Self::percent_topic(&self.topic_prefix, lamp),
                &value.to_string(),
            )
            .await?;
        Ok(())
    }

    /// Which lamp a touch button drives, if any
    pub fn lamp_for(&self, button: TouchButton) -> Option<u8> {
        match button {
            TouchButton::Front => Some(self.config.front_lamp),
            TouchButton::Rear => Some(self.config.rear_lamp),
            _ => None,
        }
    }

    /// Run the touch-driven color interaction for the given button
    pub async fn on_touch(&self, button: TouchButton) -> Result<(), SkillError> {
        let Some(lamp) = self.lamp_for(button) else {
            return Ok(());
        };

        // Tell the user we're ready, then ask for the color
        if let Err(e) = self.gate.say(READY_PHRASE).await {
            tracing::warn!("Ready phrase failed: {}", e);
        }
        let color = self
            .coordinator
            .simple_recognize(Self::color_words())
            .await?;

        tracing::info!("Changing lamp {} to {:?}", lamp, color);
        self.color(lamp, &color).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_values_match_openhab_map() {
        assert_eq!(HueSkill::color_value("rouge"), 1);
        assert_eq!(HueSkill::color_value("green"), 2);
        assert_eq!(HueSkill::color_value("jaune"), 3);
        assert_eq!(HueSkill::color_value("violet"), DEFAULT_COLOR);
    }

    #[test]
    fn test_color_words_cover_both_languages() {
        let words = HueSkill::color_words();
        assert!(words.iter().any(|w| w == "bleu"));
        assert!(words.iter().any(|w| w == "blue"));
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(HueSkill::percent_value(-5), 0);
        assert_eq!(HueSkill::percent_value(150), 100);
        assert_eq!(HueSkill::percent_value(42), 42);
    }

    #[test]
    fn test_lamp_topics() {
        assert_eq!(
            HueSkill::color_topic("/nao/openhab", 1),
            "/nao/openhab/hue1/color"
        );
        assert_eq!(
            HueSkill::percent_topic("/nao/openhab", 2),
            "/nao/openhab/hue2/percent"
        );
    }
}

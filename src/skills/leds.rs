//! LED skill — color words change the robot's LEDs

use crate::config::LedsConfig;
use crate::device::RobotDevice;
use crate::error::SkillError;
use crate::speech::{ListenerId, WordListener};
use std::sync::Arc;

/// Color word → RGB value (English and French)
const COLOR_MAP: &[(&str, u32)] = &[
    ("red", 0x00FF0000),
    ("green", 0x00009900),
    ("blue", 0x00000099),
    ("yellow", 0x00FFFF00),
    ("rouge", 0x00FF0000),
    ("vert", 0x00009900),
    ("bleu", 0x00000099),
    ("jaune", 0x00FFFF00),
];

/// Default color: white
const DEFAULT_COLOR: u32 = 0x00FFFFFF;

/// Fades the robot's LEDs to the recognized color
pub struct LedsSkill {
    device: Arc<dyn RobotDevice>,
    config: LedsConfig,
}

impl LedsSkill {
    pub fn new(device: Arc<dyn RobotDevice>, config: LedsConfig) -> Self {
        Self { device, config }
    }

    pub fn listener_id() -> ListenerId {
        ListenerId::new("leds")
    }

    /// The color words this skill registers for
    pub fn vocabulary() -> Vec<String> {
        COLOR_MAP.iter().map(|(word, _)| word.to_string()).collect()
    }

    fn rgb_for(color: &str) -> u32 {
        COLOR_MAP
            .iter()
            .find(|(word, _)| *word == color)
            .map(|(_, rgb)| *rgb)
            .unwrap_or(DEFAULT_COLOR)
    }
}

#[async_trait::async_trait]
impl WordListener for LedsSkill {
    async fn word_recognized(
        &self,
        word: &str,
        _all_candidates: &[String],
    ) -> Result<(), SkillError> {
        let rgb = Self::rgb_for(word);
        tracing::info!("Fading {} to {:?} ({:#010x})", self.config.group, word, rgb);
        self.device
            .fade_leds(&self.config.group, rgb, self.config.fade_secs)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::fake::FakeDevice;

    #[test]
    fn test_color_mapping_covers_both_languages() {
        assert_eq!(LedsSkill::rgb_for("rouge"), LedsSkill::rgb_for("red"));
        assert_eq!(LedsSkill::rgb_for("bleu"), 0x00000099);
        assert_eq!(LedsSkill::rgb_for("magenta"), DEFAULT_COLOR);
    }

    #[tokio::test]
    async fn test_recognized_color_fades_leds() {
        let device = Arc::new(FakeDevice::new());
        let skill = LedsSkill::new(device.clone(), LedsConfig::default());

        skill
            .word_recognized("vert", &["vert".to_string()])
            .await
            .unwrap();
        assert_eq!(device.calls(), ["fade_leds:AllLeds:0x00009900"]);
    }
}

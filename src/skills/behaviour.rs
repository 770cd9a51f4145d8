//! Behaviour skill — spoken orders mapped to installed robot behaviours

use crate::device::RobotDevice;
use crate::error::SkillError;
use crate::speech::{ListenerId, WordListener};
use std::sync::Arc;

/// Order word → installed behaviour name
const BEHAVIOUR_MAP: &[(&str, &str)] = &[
    ("danse", "dance_twist"),
    ("droite", "show_right"),
    ("gauche", "show_left"),
    ("bonjour", "Hello"),
    ("hello", "Hello"),
    ("merci", "Salute_1"),
    ("navette", "SpaceShuttle"),
    ("applaudi", "Applause_1"),
    ("étire", "strech1"),
    ("bravo", "winner"),
];

/// Fallback behaviour for an unmapped order
const DEFAULT_BEHAVIOUR: &str = "Neutral";

/// Plays an installed behaviour when its order word is recognized
pub struct BehaviourSkill {
    device: Arc<dyn RobotDevice>,
}

impl BehaviourSkill {
    pub fn new(device: Arc<dyn RobotDevice>) -> Self {
        Self { device }
    }

    pub fn listener_id() -> ListenerId {
        ListenerId::new("behaviour")
    }

    /// The order words this skill registers for
    pub fn vocabulary() -> Vec<String> {
        BEHAVIOUR_MAP.iter().map(|(word, _)| word.to_string()).collect()
    }

    fn behaviour_for(word: &str) -> &'static str {
        BEHAVIOUR_MAP
            .iter()
            .find(|(order, _)| *order == word)
            .map(|(_, behaviour)| *behaviour)
            .unwrap_or(DEFAULT_BEHAVIOUR)
    }
}

#[async_trait::async_trait]
impl WordListener for BehaviourSkill {
    async fn word_recognized(
        &self,
        word: &str,
        _all_candidates: &[String],
    ) -> Result<(), SkillError> {
        let behaviour = Self::behaviour_for(word);
        tracing::info!("Launching behaviour {:?} for order {:?}", behaviour, word);
        self.device.run_behaviour(behaviour).await?;
        Ok(())
    }
}

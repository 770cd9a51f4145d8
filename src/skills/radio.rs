//! Radio skill — spoken orders drive the house radio over the bus

use crate::bus::MessageBus;
use crate::error::SkillError;
use crate::speech::{ListenerId, WordListener};

/// Order word → OpenHAB radio value
const RADIO_MAP: &[(&str, u8)] = &[("off", 0), ("radio", 1), ("change", 2)];

/// Default order: first radio channel
const DEFAULT_ORDER: u8 = 1;

/// Switches the house radio when one of its orders is recognized
pub struct RadioSkill {
    bus: MessageBus,
    topic: String,
}

impl RadioSkill {
    pub fn new(bus: MessageBus, topic_prefix: &str) -> Self {
        Self {
            bus,
            topic: Self::topic(topic_prefix),
        }
    }

    /// Topic carrying radio orders
    pub fn topic(prefix: &str) -> String {
        format!("{}/radio", prefix)
    }

    pub fn listener_id() -> ListenerId {
        ListenerId::new("radio")
    }

    /// The order words this skill registers for
    pub fn vocabulary() -> Vec<String> {
        RADIO_MAP.iter().map(|(word, _)| word.to_string()).collect()
    }

    /// OpenHAB value for an order word (default order if unknown)
    pub fn order_value(order: &str) -> u8 {
        RADIO_MAP
            .iter()
            .find(|(word, _)| *word == order)
            .map(|(_, value)| *value)
            .unwrap_or(DEFAULT_ORDER)
    }
}

#[async_trait::async_trait]
impl WordListener for RadioSkill {
    async fn word_recognized(
        &self,
        word: &str,
        _all_candidates: &[String],
    ) -> Result<(), SkillError> {
        let value = Self::order_value(word);
        tracing::info!("Radio order {:?} → {}", word, value);
        self.bus.publish(&self.topic, &value.to_string()).await?;
        Ok(())
    }
}

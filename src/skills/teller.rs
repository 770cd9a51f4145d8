//! Teller skill — retains house states from the bus and speaks them
//!
//! OpenHAB publishes door/temperature/weather updates under the teller's
//! topic filter; the skill keeps the last value of each and reports it
//! when the matching request word is recognized. Decimal points become
//! commas for better French TTS results.

use crate::error::SkillError;
use crate::speech::{ListenerId, SpeechGate, WordListener};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct States {
    door: Option<String>,
    temperature: Option<String>,
    weather: Option<String>,
}

/// Speaks the last known state of the house on request
pub struct TellerSkill {
    gate: Arc<SpeechGate>,
    states: Mutex<States>,
}

impl TellerSkill {
    pub fn new(gate: Arc<SpeechGate>) -> Self {
        Self {
            gate,
            states: Mutex::new(States::default()),
        }
    }

    pub fn listener_id() -> ListenerId {
        ListenerId::new("teller")
    }

    /// The request words this skill registers for
    pub fn vocabulary() -> Vec<String> {
        ["porte", "température", "meteo"]
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    /// Store an incoming house state
    ///
    /// Topics: `<prefix>/[door,temperature,weather]`; unknown items are
    /// ignored.
    pub fn handle_bus_message(&self, topic: &str, payload: &str) {
        let item = topic.rsplit('/').next().unwrap_or(topic);
        let mut states = self.states.lock().unwrap();
        match item {
            "door" => states.door = Some(payload.to_string()),
            "temperature" => states.temperature = Some(payload.replace('.', ",")),
            "weather" => states.weather = Some(payload.replace('.', ",")),
            _ => tracing::debug!("Ignoring bus item {:?}", item),
        }
    }

    /// Say something through the speak gate
    pub async fn say(&self, sentence: &str) -> Result<(), SkillError> {
        self.gate.say(sentence).await?;
        Ok(())
    }

    /// Say the last known state of the door
    pub async fn say_door(&self) -> Result<(), SkillError> {
        let door = self.states.lock().unwrap().door.clone();
        let state = match door.as_deref() {
            Some("CLOSED") => "fermée",
            Some("OPEN") => "ouverte",
            _ => "dans un état que je ne connais pas",
        };
        self.say(&format!("La porte est {}", state)).await
    }

    /// Say the last known interior temperature
    pub async fn say_temperature(&self) -> Result<(), SkillError> {
        let temperature = self.states.lock().unwrap().temperature.clone();
        let sentence = match temperature {
            Some(value) => format!("La température intérieure est de {} degrés celsius", value),
            None => "Je n'ai pas d'information sur la température intérieure.".to_string(),
        };
        self.say(&sentence).await
    }

    /// Say the last known exterior temperature
    pub async fn say_weather(&self) -> Result<(), SkillError> {
        let weather = self.states.lock().unwrap().weather.clone();
        let sentence = match weather {
            Some(value) => format!("La température extérieure est de {} degrés celsius", value),
            None => "Je n'ai pas d'information sur la température extérieure.".to_string(),
        };
        self.say(&sentence).await
    }
}

#[async_trait::async_trait]
impl WordListener for TellerSkill {
    async fn word_recognized(
        &self,
        word: &str,
        _all_candidates: &[String],
    ) -> Result<(), SkillError> {
        match word {
            "porte" => self.say_door().await,
            "température" => self.say_temperature().await,
            "meteo" => self.say_weather().await,
            _ => {
                tracing::debug!("Teller ignoring word {:?}", word);
                Ok(())
            }
        }
    }
}

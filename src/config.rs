//! Configuration loading and types for robovox
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/robovox/config.toml)
//! 3. CLI arguments (highest priority)

use crate::error::RobovoxError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Robovox Configuration
#
# Location: ~/.config/robovox/config.toml

[device]
# Robot gateway address (line-delimited JSON over TCP)
host = "nao.local"
port = 9559

[speech]
# Spoken when a touch button starts a recognition cycle.
# Comment out to listen silently.
prompt = "Je suis prêt à recevoir des ordres"

[bus]
# MQTT broker the smart-home side (OpenHAB) listens on
host = "localhost"
port = 1883
client_id = "robovox"
keepalive_secs = 60

# Prefix for outgoing actuation topics (hue, radio)
topic_prefix = "/nao/openhab"

[skills.behaviour]
enabled = true

[skills.leds]
enabled = true
# LED group passed to the device, and fade duration in seconds
group = "AllLeds"
fade_secs = 1.0

[skills.hue]
enabled = true
# Which lamp each touch button controls
front_lamp = 1
rear_lamp = 2

[skills.radio]
enabled = true

[skills.teller]
enabled = true
# Topic filter for incoming house states (door, temperature, weather)
filter = "/openhab/nao/+"
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub bus: BusConfig,

    #[serde(default)]
    pub skills: SkillsConfig,
}

/// Robot gateway connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_host")]
    pub host: String,

    #[serde(default = "default_device_port")]
    pub port: u16,
}

/// Speech arbitration settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Spoken when a touch trigger starts a cycle; None listens silently
    #[serde(default)]
    pub prompt: Option<String>,
}

/// MQTT broker connection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BusConfig {
    #[serde(default = "default_bus_host")]
    pub host: String,

    #[serde(default = "default_bus_port")]
    pub port: u16,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,

    /// Prefix for outgoing actuation topics
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
}

/// Per-skill settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SkillsConfig {
    #[serde(default)]
    pub behaviour: BehaviourConfig,

    #[serde(default)]
    pub leds: LedsConfig,

    #[serde(default)]
    pub hue: HueConfig,

    #[serde(default)]
    pub radio: RadioConfig,

    #[serde(default)]
    pub teller: TellerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BehaviourConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// LED group name passed to the device
    #[serde(default = "default_led_group")]
    pub group: String,

    /// Fade transition duration in seconds
    #[serde(default = "default_fade_secs")]
    pub fade_secs: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HueConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lamp driven by the front head button
    #[serde(default = "default_front_lamp")]
    pub front_lamp: u8,

    /// Lamp driven by the rear head button
    #[serde(default = "default_rear_lamp")]
    pub rear_lamp: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RadioConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TellerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Topic filter for incoming house states
    #[serde(default = "default_teller_filter")]
    pub filter: String,
}

fn default_device_host() -> String {
    "nao.local".to_string()
}

fn default_device_port() -> u16 {
    9559
}

fn default_bus_host() -> String {
    "localhost".to_string()
}

fn default_bus_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "robovox".to_string()
}

fn default_keepalive() -> u64 {
    60
}

fn default_topic_prefix() -> String {
    "/nao/openhab".to_string()
}

fn default_led_group() -> String {
    "AllLeds".to_string()
}

fn default_fade_secs() -> f32 {
    1.0
}

fn default_front_lamp() -> u8 {
    1
}

fn default_rear_lamp() -> u8 {
    2
}

fn default_teller_filter() -> String {
    "/openhab/nao/+".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_device_host(),
            port: default_device_port(),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            host: default_bus_host(),
            port: default_bus_port(),
            client_id: default_client_id(),
            keepalive_secs: default_keepalive(),
            topic_prefix: default_topic_prefix(),
        }
    }
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for LedsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            group: default_led_group(),
            fade_secs: default_fade_secs(),
        }
    }
}

impl Default for HueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            front_lamp: default_front_lamp(),
            rear_lamp: default_rear_lamp(),
        }
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for TellerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filter: default_teller_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            speech: SpeechConfig {
                prompt: Some("Je suis prêt à recevoir des ordres".to_string()),
            },
            bus: BusConfig::default(),
            skills: SkillsConfig::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "robovox")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Load configuration from the given path, the default location, or
/// built-in defaults when no file exists
pub fn load_config(path: Option<&Path>) -> Result<Config, RobovoxError> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_path(),
    };

    match path {
        Some(path) if path.exists() => {
            tracing::debug!("Loading config from {:?}", path);
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| {
                RobovoxError::Config(format!("Invalid config file {:?}: {}", path, e))
            })
        }
        _ => {
            tracing::debug!("No config file, using defaults");
            Ok(Config::default())
        }
    }
}

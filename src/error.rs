//! Error types for robovox
//!
//! Uses thiserror for ergonomic error definitions. Each subsystem has its
//! own enum; RobovoxError wraps them at the binary surface.

use thiserror::Error;

/// Top-level error type for the robovox application
#[derive(Error, Debug)]
pub enum RobovoxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Speech error: {0}")]
    Speech(#[from] SpeechError),

    #[error("Message bus error: {0}")]
    Bus(#[from] BusError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the robot device gateway
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Cannot connect to robot gateway at {0}: {1}")]
    Connection(String, String),

    #[error("Gateway protocol error: {0}")]
    Protocol(String),

    #[error("Gateway rejected command: {0}")]
    Rejected(String),

    #[error("Connection to robot gateway lost")]
    Disconnected,
}

/// Errors from the speech arbitration core
///
/// These are programming-error surfaces: a skill with a broken lifecycle
/// gets a hard error instead of a silent no-op.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("A recognition session is already active")]
    AlreadyListening,

    #[error("A recognition cycle is already in flight")]
    Busy,

    #[error("No listener registered under id '{0}'")]
    UnknownListener(String),

    #[error("Recognition started with an empty vocabulary (no listeners registered?)")]
    EmptyVocabulary,

    #[error("Recognition session ended before a word arrived")]
    Interrupted,

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Errors from the MQTT message bus
///
/// Connecting cannot fail up front: rumqttc establishes and re-establishes
/// the broker connection from its event loop, so only the client-side
/// operations surface errors.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Publish to '{0}' failed: {1}")]
    Publish(String, String),

    #[error("Subscribe to '{0}' failed: {1}")]
    Subscribe(String, String),
}

/// Errors surfaced by a skill's word-recognized callback
///
/// Caught and logged per listener during dispatch; one failing skill never
/// aborts dispatch to the others.
#[derive(Error, Debug)]
pub enum SkillError {
    #[error("Device call failed: {0}")]
    Device(#[from] DeviceError),

    #[error("Bus call failed: {0}")]
    Bus(#[from] BusError),

    #[error("Speech call failed: {0}")]
    Speech(#[from] SpeechError),
}

/// Result type alias using RobovoxError
pub type Result<T> = std::result::Result<T, RobovoxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_keep_their_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "signal handler");
        let error = RobovoxError::from(io);
        assert!(matches!(error, RobovoxError::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_bus_errors_name_the_topic() {
        let error = BusError::Publish("/nao/openhab/radio".to_string(), "full".to_string());
        assert_eq!(
            error.to_string(),
            "Publish to '/nao/openhab/radio' failed: full"
        );
    }
}

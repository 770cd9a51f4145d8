//! State machine phases for the recognition coordinator
//!
//! One cycle walks Idle → Listening → Dispatching → Idle. The BUSY flag
//! that drops re-entrant triggers lives in the coordinator itself; this
//! enum is the observable phase, mainly for logging and assertions.

/// Phase of the current (or absent) recognition cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Waiting for a trigger
    Idle,

    /// Speak gate closed, word subscription active
    Listening,

    /// Word received, fanning out to matching listeners
    Dispatching,
}

impl CyclePhase {
    /// Check if no cycle is in flight
    pub fn is_idle(&self) -> bool {
        matches!(self, CyclePhase::Idle)
    }

    /// Check if a word subscription is currently active
    pub fn is_listening(&self) -> bool {
        matches!(self, CyclePhase::Listening)
    }
}

impl Default for CyclePhase {
    fn default() -> Self {
        CyclePhase::Idle
    }
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CyclePhase::Idle => write!(f, "Idle"),
            CyclePhase::Listening => write!(f, "Listening"),
            CyclePhase::Dispatching => write!(f, "Dispatching"),
        }
    }
}

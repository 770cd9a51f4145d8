//! Skills — the domain logic behind recognized words
//!
//! Each skill owns a private vocabulary subset and reacts when one of its
//! words is recognized: behaviours and LEDs act on the robot through the
//! device capability, Hue and radio publish to the smart-home bus, the
//! teller retains house states from the bus and speaks them on request.
//! Skills are wired to the coordinator by the composition root in
//! `daemon.rs`; none of them is required by the speech core itself.

pub mod behaviour;
pub mod hue;
pub mod leds;
pub mod radio;
pub mod teller;

pub use behaviour::BehaviourSkill;
pub use hue::HueSkill;
pub use leds::LedsSkill;
pub use radio::RadioSkill;
pub use teller::TellerSkill;

//! Robovox: voice control for a NAO robot and a smart home
//!
//! This library provides the core functionality for:
//! - Arbitrating text-to-speech against speech recognition (speak gate)
//! - Running touch-triggered recognition cycles over a listener registry
//! - Talking to the robot through a line-delimited JSON TCP gateway
//! - Bridging spoken orders to a smart home over MQTT (rumqttc)
//! - Skills: behaviours, LEDs, Hue lamps, radio, house-state teller
//!
//! # Architecture
//!
//! ```text
//!                      ┌─────────────────────────────┐
//!                      │           Daemon            │
//!                      └─────────────────────────────┘
//!                            │                 │
//!              touch events  │                 │  bus messages
//!                            ▼                 ▼
//!               ┌─────────────────────┐   ┌──────────┐
//!               │     Recognition     │   │  Teller  │
//!               │     Coordinator     │   └──────────┘
//!               └─────────────────────┘
//!                  │        │       │
//!        pause/resume   session   dispatch
//!                  ▼        ▼       ▼
//!          ┌──────────┐ ┌────────┐ ┌──────────────────┐
//!          │  Speech  │ │ Recog. │ │     Listener     │
//!          │   Gate   │ │ Engine │ │     Registry     │
//!          └──────────┘ └────────┘ └──────────────────┘
//!                  │        │               │
//!                  ▼        ▼               ▼
//!          ┌──────────────────┐   ┌──────────────────────┐
//!          │   RobotDevice    │   │  Skills (behaviour,  │
//!          │  (TCP gateway)   │   │  leds, hue, radio)   │
//!          └──────────────────┘   └──────────────────────┘
//! ```

pub mod bus;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod device;
pub mod error;
pub mod skills;
pub mod speech;
pub mod state;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use daemon::Daemon;
pub use error::{Result, RobovoxError};

// Command-line interface definitions for robovox
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "robovox")]
#[command(author, version, about = "Voice control daemon for a NAO robot and a smart home")]
#[command(long_about = "
Robovox connects a NAO-class robot to a smart home over MQTT.
Touch a head button, speak an order, and the robot runs behaviours,
changes its LEDs, drives Hue lamps, switches the radio, or tells you
the state of the house.

SETUP:
  1. Start the robot gateway on the robot (default port 9559)
  2. Point [bus] at your MQTT broker (OpenHAB side)
  3. Run: robovox (to start the daemon)

USAGE:
  Middle head button or chest button: full recognition cycle.
  Front/rear head buttons: ask for a Hue lamp color.
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Override robot gateway address (host or host:port)
    #[arg(long, value_name = "ADDR")]
    pub robot: Option<String>,

    /// Override MQTT broker address (host or host:port)
    #[arg(long, value_name = "ADDR")]
    pub broker: Option<String>,

    /// Override the prompt spoken before listening (empty string disables it)
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// Make the robot say something and exit
    Say {
        /// Text to speak
        text: String,
    },

    /// Run one recognition cycle against the given words and print the result
    Listen {
        /// Candidate words to listen for
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Publish a Hue lamp color or brightness change directly
    Hue {
        /// Lamp number
        lamp: u8,

        /// Color word (red, green, yellow, blue or French equivalents)
        #[arg(required_unless_present = "percent")]
        color: Option<String>,

        /// Set the lamp's power percentage instead (clamped to 0-100)
        #[arg(long, value_name = "VALUE", conflicts_with = "color")]
        percent: Option<i32>,
    },

    /// Publish a radio order directly
    Radio {
        /// Order word: off, radio, change
        order: String,
    },

    /// Show current configuration
    Config,
}

//! Robovox - voice control for a NAO robot and a smart home
//!
//! Run with `robovox` or `robovox daemon` to start the daemon.
//! Use `robovox say <text>` to speak through the robot.
//! Use `robovox listen <words>...` to run one recognition cycle.

use clap::Parser;
use robovox::config::{self, Config};
use robovox::device::RobotDevice;
use robovox::skills::{HueSkill, RadioSkill};
use robovox::speech::{RecognitionCoordinator, RecognitionEngine, SpeechGate};
use robovox::{bus, device, Cli, Commands, Daemon};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("robovox={},warn", log_level))),
        )
        .with_target(false)
        .init();

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(robot) = cli.robot.as_deref() {
        apply_addr(robot, &mut config.device.host, &mut config.device.port);
    }
    if let Some(broker) = cli.broker.as_deref() {
        apply_addr(broker, &mut config.bus.host, &mut config.bus.port);
    }
    if let Some(prompt) = cli.prompt {
        config.speech.prompt = if prompt.is_empty() { None } else { Some(prompt) };
    }

    // Run the appropriate command
    match cli.command.unwrap_or(Commands::Daemon) {
        Commands::Daemon => {
            let mut daemon = Daemon::new(config);
            daemon.run().await?;
        }

        Commands::Say { text } => {
            let robot = device::connect(&config.device).await?;
            robot.speak(&text).await?;
        }

        Commands::Listen { words } => {
            let word = listen_once(&config, words).await?;
            println!("{}", word);
        }

        Commands::Hue { lamp, color, percent } => {
            let prefix = &config.bus.topic_prefix;
            let (topic, value) = match (percent, color) {
                (Some(value), _) => (
                    HueSkill::percent_topic(prefix, lamp),
                    HueSkill::percent_value(value).to_string(),
                ),
                (None, Some(color)) => (
                    HueSkill::color_topic(prefix, lamp),
                    HueSkill::color_value(&color).to_string(),
                ),
                // clap requires one of the two
                (None, None) => unreachable!(),
            };
            publish_one(&config, &topic, &value).await?;
        }

        Commands::Radio { order } => {
            let value = RadioSkill::order_value(&order);
            let topic = RadioSkill::topic(&config.bus.topic_prefix);
            publish_one(&config, &topic, &value.to_string()).await?;
        }

        Commands::Config => {
            show_config(&config)?;
        }
    }

    Ok(())
}

/// Apply a "host" or "host:port" override in place
fn apply_addr(addr: &str, host: &mut String, port: &mut u16) {
    match addr.rsplit_once(':') {
        Some((h, p)) => {
            if let Ok(p) = p.parse() {
                *host = h.to_string();
                *port = p;
            } else {
                *host = addr.to_string();
            }
        }
        None => *host = addr.to_string(),
    }
}

/// Run one recognition cycle against the given words
async fn listen_once(config: &Config, words: Vec<String>) -> anyhow::Result<String> {
    let robot = device::connect(&config.device).await?;
    let gate = Arc::new(SpeechGate::new(robot.clone()));
    let engine = RecognitionEngine::new(robot);
    let coordinator =
        RecognitionCoordinator::new(gate, engine, config.speech.prompt.clone());

    Ok(coordinator.simple_recognize(words).await?)
}

/// Publish a single message, leaving the event loop time to flush it
async fn publish_one(config: &Config, topic: &str, payload: &str) -> anyhow::Result<()> {
    let (bus, _rx) = bus::MessageBus::connect(&config.bus).await?;
    bus.publish(topic, payload).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("{} = {}", topic, payload);
    Ok(())
}

/// Show current configuration
fn show_config(config: &Config) -> anyhow::Result<()> {
    println!("# Current configuration\n");
    print!("{}", toml::to_string_pretty(config)?);
    println!(
        "\n# Config file: {:?}",
        Config::default_path().unwrap_or_else(|| "(not found)".into())
    );
    Ok(())
}

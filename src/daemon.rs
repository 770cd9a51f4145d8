//! Daemon module - composition root and main event loop
//!
//! Connects the robot gateway and the message bus, wires the speech core
//! (gate, engine, coordinator) and the skills together with explicit
//! constructor references, then routes touch events and bus messages
//! until shutdown.

use crate::bus::{BusMessage, MessageBus};
use crate::config::Config;
use crate::device::{self, RobotDevice, TouchButton, TouchEvent};
use crate::error::Result;
use crate::skills::{BehaviourSkill, HueSkill, LedsSkill, RadioSkill, TellerSkill};
use crate::speech::{RecognitionCoordinator, RecognitionEngine, SpeechGate};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

/// Main daemon that owns the wiring of all components
pub struct Daemon {
    config: Config,
}

impl Daemon {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the daemon until SIGINT/SIGTERM or the gateway drops
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting robovox daemon");

        let mut sigterm = signal(SignalKind::terminate())?;

        // Device and speech core
        let robot = device::connect(&self.config.device).await?;
        let gate = Arc::new(SpeechGate::new(robot.clone()));
        let engine = RecognitionEngine::new(robot.clone());
        let coordinator = Arc::new(RecognitionCoordinator::new(
            gate.clone(),
            engine,
            self.config.speech.prompt.clone(),
        ));

        // Message bus
        let (bus, mut bus_rx) = MessageBus::connect(&self.config.bus).await?;
        let prefix = self.config.bus.topic_prefix.clone();

        // Skills: each registers its private vocabulary subset
        let skills = self.config.skills.clone();

        if skills.behaviour.enabled {
            coordinator.add_listener(
                BehaviourSkill::listener_id(),
                BehaviourSkill::vocabulary(),
                Arc::new(BehaviourSkill::new(robot.clone())),
            );
        }
        if skills.leds.enabled {
            coordinator.add_listener(
                LedsSkill::listener_id(),
                LedsSkill::vocabulary(),
                Arc::new(LedsSkill::new(robot.clone(), skills.leds.clone())),
            );
        }
        if skills.radio.enabled {
            coordinator.add_listener(
                RadioSkill::listener_id(),
                RadioSkill::vocabulary(),
                Arc::new(RadioSkill::new(bus.clone(), &prefix)),
            );
        }

        let teller = if skills.teller.enabled {
            let teller = Arc::new(TellerSkill::new(gate.clone()));
            bus.subscribe(&skills.teller.filter).await?;
            coordinator.add_listener(
                TellerSkill::listener_id(),
                TellerSkill::vocabulary(),
                teller.clone(),
            );
            Some(teller)
        } else {
            None
        };

        let hue = skills.hue.enabled.then(|| {
            Arc::new(HueSkill::new(
                bus.clone(),
                gate.clone(),
                coordinator.clone(),
                skills.hue.clone(),
                prefix.clone(),
            ))
        });

        // Touch triggers
        let mut touch_rx = robot.subscribe_touch().await?;
        tracing::info!("Ready: touch a head button to give an order");

        loop {
            tokio::select! {
                event = touch_rx.recv() => {
                    match event {
                        Some(event) => self.route_touch(event, &coordinator, hue.as_ref()),
                        None => {
                            tracing::warn!("Gateway connection lost, shutting down");
                            break;
                        }
                    }
                }

                Some(BusMessage { topic, payload }) = bus_rx.recv() => {
                    tracing::debug!("Bus message on {}: {:?}", topic, payload);
                    if let Some(teller) = &teller {
                        teller.handle_bus_message(&topic, &payload);
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT, shutting down...");
                    break;
                }

                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, shutting down...");
                    break;
                }
            }
        }

        // Force the session closed and the gate open so no caller stays
        // suspended across shutdown.
        coordinator.shutdown().await;

        // Opportunistic teardown: disabled skills were never registered
        for id in [
            BehaviourSkill::listener_id(),
            LedsSkill::listener_id(),
            RadioSkill::listener_id(),
            TellerSkill::listener_id(),
        ] {
            if let Err(e) = coordinator.remove_listener(&id) {
                tracing::debug!("Listener already gone: {}", e);
            }
        }

        tracing::info!("Daemon stopped");
        Ok(())
    }

    /// Route a touch event to its interaction
    ///
    /// Front/rear drive the Hue color question; middle and chest start a
    /// full recognition cycle. Both run as tasks so the event loop keeps
    /// draining; a press during an active cycle is dropped by the
    /// coordinator, not queued here.
    fn route_touch(
        &self,
        event: TouchEvent,
        coordinator: &Arc<RecognitionCoordinator>,
        hue: Option<&Arc<HueSkill>>,
    ) {
        if !event.pressed {
            return;
        }
        tracing::debug!("Touch: {}", event.button);

        match event.button {
            TouchButton::Front | TouchButton::Rear => {
                if let Some(hue) = hue {
                    let hue = hue.clone();
                    let button = event.button;
                    tokio::spawn(async move {
                        if let Err(e) = hue.on_touch(button).await {
                            tracing::warn!("Hue interaction failed: {}", e);
                        }
                    });
                }
            }
            TouchButton::Middle | TouchButton::Chest => {
                let coordinator = coordinator.clone();
                let button = event.button;
                tokio::spawn(async move {
                    coordinator.on_touch_event(button, true).await;
                });
            }
        }
    }
}

//! TCP gateway client for the robot
//!
//! Speaks a line-delimited JSON protocol with the gateway process running
//! on the robot. Commands are acknowledged in order; word and touch events
//! are pushed by the gateway at any time and routed to the channel of the
//! matching subscription.
//!
//! Commands:  {"cmd":"say","text":"..."}        → {"ok":true}
//!            {"cmd":"subscribe","event":"word"} → {"ok":false,"error":"..."}
//! Events:    {"event":"word","candidates":["rouge"]}
//!            {"event":"touch","button":"front","pressed":true}

use super::{Recognition, RobotDevice, TouchButton, TouchEvent};
use crate::error::DeviceError;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

/// Buffered events per subscription before the gateway reader drops them
const EVENT_CHANNEL_CAPACITY: usize = 8;

#[derive(Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum Command<'a> {
    Say { text: &'a str },
    SetVocabulary { words: &'a [String] },
    Subscribe { event: EventKind },
    Unsubscribe { event: EventKind },
    RunBehaviour { name: &'a str },
    FadeLeds { group: &'a str, rgb: u32, duration: f32 },
}

#[derive(Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "snake_case")]
enum EventKind {
    Word,
    Touch,
}

#[derive(Deserialize)]
struct Ack {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum GatewayEvent {
    Word { candidates: Vec<String> },
    Touch { button: String, pressed: bool },
}

struct Inner {
    /// Write half, locked for the duration of one command line
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    /// Acknowledgement waiters, in command order
    pending: Mutex<VecDeque<oneshot::Sender<Result<(), DeviceError>>>>,
    /// Active word subscription, if any
    word_sink: Mutex<Option<mpsc::Sender<Recognition>>>,
    /// Active touch subscription, if any
    touch_sink: Mutex<Option<mpsc::Sender<TouchEvent>>>,
}

/// Robot gateway client over TCP
pub struct RemoteDevice {
    inner: Arc<Inner>,
}

impl RemoteDevice {
    /// Connect to the gateway and spawn the event reader
    pub async fn connect(host: &str, port: u16) -> Result<Self, DeviceError> {
        let addr = format!("{}:{}", host, port);
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| DeviceError::Connection(addr, e.to_string()))?;
        let (read, write) = stream.into_split();

        let inner = Arc::new(Inner {
            writer: tokio::sync::Mutex::new(write),
            pending: Mutex::new(VecDeque::new()),
            word_sink: Mutex::new(None),
            touch_sink: Mutex::new(None),
        });

        tokio::spawn(read_loop(inner.clone(), read));

        Ok(Self { inner })
    }

    /// Send one command line and wait for its acknowledgement
    async fn command(&self, cmd: Command<'_>) -> Result<(), DeviceError> {
        let line = serde_json::to_string(&cmd)
            .map_err(|e| DeviceError::Protocol(e.to_string()))?;

        let (ack_tx, ack_rx) = oneshot::channel();
        {
            // Enqueue the waiter while holding the writer so acknowledgement
            // order matches command order.
            let mut writer = self.inner.writer.lock().await;
            self.inner.pending.lock().unwrap().push_back(ack_tx);
            let write = async {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await
            };
            if let Err(e) = write.await {
                tracing::warn!("Gateway write failed: {}", e);
                // The waiter we just queued will never be answered
                self.inner.pending.lock().unwrap().pop_back();
                return Err(DeviceError::Disconnected);
            }
        }

        ack_rx.await.map_err(|_| DeviceError::Disconnected)?
    }
}

#[async_trait::async_trait]
impl RobotDevice for RemoteDevice {
    async fn speak(&self, text: &str) -> Result<(), DeviceError> {
        self.command(Command::Say { text }).await
    }

    async fn set_vocabulary(&self, words: &[String]) -> Result<(), DeviceError> {
        self.command(Command::SetVocabulary { words }).await
    }

    async fn subscribe_words(&self) -> Result<mpsc::Receiver<Recognition>, DeviceError> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        *self.inner.word_sink.lock().unwrap() = Some(tx);

        if let Err(e) = self.command(Command::Subscribe { event: EventKind::Word }).await {
            self.inner.word_sink.lock().unwrap().take();
            return Err(e);
        }
        Ok(rx)
    }

    async fn unsubscribe_words(&self) -> Result<(), DeviceError> {
        // Drop the sink first so a late event from the closing session
        // cannot reach a receiver the caller has already abandoned.
        self.inner.word_sink.lock().unwrap().take();
        self.command(Command::Unsubscribe { event: EventKind::Word }).await
    }

    async fn subscribe_touch(&self) -> Result<mpsc::Receiver<TouchEvent>, DeviceError> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        *self.inner.touch_sink.lock().unwrap() = Some(tx);

        if let Err(e) = self.command(Command::Subscribe { event: EventKind::Touch }).await {
            self.inner.touch_sink.lock().unwrap().take();
            return Err(e);
        }
        Ok(rx)
    }

    async fn run_behaviour(&self, name: &str) -> Result<(), DeviceError> {
        self.command(Command::RunBehaviour { name }).await
    }

    async fn fade_leds(
        &self,
        group: &str,
        rgb: u32,
        duration_secs: f32,
    ) -> Result<(), DeviceError> {
        self.command(Command::FadeLeds { group, rgb, duration: duration_secs })
            .await
    }
}

/// Read gateway lines until the connection drops, routing events to their
/// subscription channels and acknowledgements to their command waiters.
async fn read_loop(inner: Arc<Inner>, read: OwnedReadHalf) {
    let mut lines = BufReader::new(read).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => handle_line(&inner, &line),
            Ok(None) => {
                tracing::info!("Gateway closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("Gateway read error: {}", e);
                break;
            }
        }
    }

    // Fail every in-flight command and close event channels so waiters
    // unblock instead of hanging on a dead connection.
    for waiter in inner.pending.lock().unwrap().drain(..) {
        let _ = waiter.send(Err(DeviceError::Disconnected));
    }
    inner.word_sink.lock().unwrap().take();
    inner.touch_sink.lock().unwrap().take();
}

fn handle_line(inner: &Inner, line: &str) {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Unparseable gateway line {:?}: {}", line, e);
            return;
        }
    };

    if value.get("event").is_some() {
        match serde_json::from_value::<GatewayEvent>(value) {
            Ok(event) => route_event(inner, event),
            Err(e) => tracing::warn!("Malformed gateway event: {}", e),
        }
    } else {
        let ack = match serde_json::from_value::<Ack>(value) {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!("Malformed gateway acknowledgement: {}", e);
                return;
            }
        };
        let waiter = inner.pending.lock().unwrap().pop_front();
        match waiter {
            Some(waiter) => {
                let result = if ack.ok {
                    Ok(())
                } else {
                    Err(DeviceError::Rejected(
                        ack.error.unwrap_or_else(|| "unspecified".to_string()),
                    ))
                };
                let _ = waiter.send(result);
            }
            None => tracing::warn!("Gateway acknowledgement with no command in flight"),
        }
    }
}

fn route_event(inner: &Inner, event: GatewayEvent) {
    match event {
        GatewayEvent::Word { candidates } => {
            let sink = inner.word_sink.lock().unwrap().clone();
            match sink {
                Some(sink) => {
                    if let Err(e) = sink.try_send(Recognition { candidates }) {
                        tracing::debug!("Word event dropped: {}", e);
                    }
                }
                None => tracing::debug!("Word event with no active subscription, dropped"),
            }
        }
        GatewayEvent::Touch { button, pressed } => {
            let Some(button) = TouchButton::from_name(&button) else {
                tracing::debug!("Unknown touch button {:?}, ignored", button);
                return;
            };
            let sink = inner.touch_sink.lock().unwrap().clone();
            if let Some(sink) = sink {
                if let Err(e) = sink.try_send(TouchEvent { button, pressed }) {
                    tracing::debug!("Touch event dropped: {}", e);
                }
            }
        }
    }
}

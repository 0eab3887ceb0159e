//! Gateway client
//!
//! Holds one WebSocket session at a time: waits for Hello, identifies,
//! heartbeats on the server's interval and forwards decoded dispatch events.
//! Dropped sessions are re-established after a fixed delay.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use stats_common::ChatConfig;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, instrument, trace, warn};

use super::error::GatewayError;
use crate::protocol::{GatewayEvent, GatewayMessage, HelloPayload, IdentifyPayload, OpCode};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How a session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    /// Server asked for a reconnect or the stream ended
    Reconnect,
    /// The event consumer went away
    Shutdown,
}

/// Gateway client
#[derive(Debug, Clone)]
pub struct GatewayClient {
    url: String,
    token: String,
    reconnect_delay: Duration,
}

impl GatewayClient {
    /// Create a new gateway client from the chat configuration
    #[must_use]
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            url: config.gateway_url.clone(),
            token: config.token.clone(),
            reconnect_delay: config.reconnect_delay(),
        }
    }

    /// Keep a session open until the consumer goes away or a fatal close
    ///
    /// Events are not replayed across reconnects.
    pub async fn run(&self, events: mpsc::Sender<GatewayEvent>) -> Result<(), GatewayError> {
        loop {
            match self.session(&events).await {
                Ok(SessionEnd::Shutdown) => return Ok(()),
                Ok(SessionEnd::Reconnect) => info!("Gateway session ended, reconnecting"),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!(error = %e, "Gateway session failed"),
            }

            if events.is_closed() {
                return Ok(());
            }
            sleep(self.reconnect_delay).await;
        }
    }

    #[instrument(skip(self, events), fields(url = %self.url))]
    async fn session(&self, events: &mpsc::Sender<GatewayEvent>) -> Result<SessionEnd, GatewayError> {
        let (socket, _) = connect_async(self.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();
        info!("Gateway connected");

        let hello = wait_for_hello(&mut stream).await?;
        send(&mut sink, &GatewayMessage::identify(&IdentifyPayload::new(&self.token))?).await?;

        let mut heartbeat = interval(Duration::from_millis(hello.heartbeat_interval.max(1)));
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await;

        let mut sequence: Option<u64> = None;
        let mut acked = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if !acked {
                        return Err(GatewayError::HeartbeatTimeout);
                    }
                    acked = false;
                    send(&mut sink, &GatewayMessage::heartbeat(sequence)).await?;
                }
                frame = stream.next() => {
                    let Some(frame) = frame else {
                        return Ok(SessionEnd::Reconnect);
                    };

                    let text = match frame? {
                        Message::Text(text) => text,
                        Message::Close(frame) => {
                            let (code, reason) = frame
                                .map(|f| (u16::from(f.code), f.reason.to_string()))
                                .unwrap_or((1000, String::new()));
                            return Err(GatewayError::Closed { code, reason });
                        }
                        _ => continue,
                    };

                    let message = GatewayMessage::from_json(text.as_str())?;
                    trace!(frame = %message, "Gateway frame");

                    match message.op {
                        OpCode::Dispatch => {
                            if message.s.is_some() {
                                sequence = message.s;
                            }
                            if let Some(event) = message.into_event()? {
                                if events.send(event).await.is_err() {
                                    return Ok(SessionEnd::Shutdown);
                                }
                            }
                        }
                        OpCode::Heartbeat => {
                            send(&mut sink, &GatewayMessage::heartbeat(sequence)).await?;
                        }
                        OpCode::HeartbeatAck => acked = true,
                        OpCode::Reconnect => return Ok(SessionEnd::Reconnect),
                        OpCode::InvalidSession => return Err(GatewayError::InvalidSession),
                        op => debug!(op = %op, "Ignoring gateway frame"),
                    }
                }
            }
        }
    }
}

async fn wait_for_hello(
    stream: &mut futures_util::stream::SplitStream<Socket>,
) -> Result<HelloPayload, GatewayError> {
    while let Some(frame) = stream.next().await {
        match frame? {
            Message::Text(text) => {
                return GatewayMessage::from_json(text.as_str())?
                    .as_hello()
                    .ok_or(GatewayError::ExpectedHello);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(GatewayError::ExpectedHello)
}

async fn send(
    sink: &mut futures_util::stream::SplitSink<Socket, Message>,
    message: &GatewayMessage,
) -> Result<(), GatewayError> {
    sink.send(Message::text(message.to_json()?)).await?;
    Ok(())
}

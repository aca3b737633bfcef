//! WebSocket transport for the agent connection.
//!
//! One connection is opened per run at `{base}/ws/{mode}`. The connection
//! runs as a single spawned task that owns the socket: a `select!` loop
//! drains the unbounded outbound command queue into the sink and decodes
//! inbound text records into [`ConnectionEvent`]s. Malformed records are
//! logged and skipped rather than propagated - the protocol defines
//! unexpected input as non-fatal.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use tether_protocol::{AgentEvent, Command, Mode, WireMessage};

use crate::connection::{CommandChannel, ConnectionEvent, ConnectionId, Connector};
use crate::error::{Error, Result};

enum Outbound {
    Command(Command),
    Close,
}

/// Handle to a live connection task.
///
/// Dropping the handle (or calling [`CommandChannel::close`]) ends the task;
/// the task always emits a final [`ConnectionEvent::Closed`].
pub struct WsConnection {
    id: ConnectionId,
    outbound_tx: mpsc::UnboundedSender<Outbound>,
}

impl WsConnection {
    /// Starts a connection attempt to `url`, delivering lifecycle events on
    /// `events` stamped with `id`. Must be called within a tokio runtime.
    pub fn open(
        id: ConnectionId,
        url: String,
        events: mpsc::UnboundedSender<(ConnectionId, ConnectionEvent)>,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_connection(id, url, events, outbound_rx));
        Self { id, outbound_tx }
    }
}

impl CommandChannel for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn send(&self, command: Command) -> Result<()> {
        self.outbound_tx
            .send(Outbound::Command(command))
            .map_err(|_| Error::ChannelClosed)
    }

    fn close(&self) {
        // Failure means the task is already gone, which is the same outcome.
        let _ = self.outbound_tx.send(Outbound::Close);
    }
}

async fn run_connection(
    id: ConnectionId,
    url: String,
    events: mpsc::UnboundedSender<(ConnectionId, ConnectionEvent)>,
    mut outbound_rx: mpsc::UnboundedReceiver<Outbound>,
) {
    let ws = match connect_async(url.as_str()).await {
        Ok((ws, _response)) => ws,
        Err(err) => {
            tracing::error!(target: "tether", url = %url, error = %err, "connect failed");
            let _ = events.send((id, ConnectionEvent::Errored(err.to_string())));
            let _ = events.send((id, ConnectionEvent::Closed));
            return;
        }
    };

    tracing::debug!(target: "tether", url = %url, "connection open");
    let _ = events.send((id, ConnectionEvent::Opened));

    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(Outbound::Command(command)) => {
                    let payload = match serde_json::to_string(&command) {
                        Ok(payload) => payload,
                        Err(err) => {
                            tracing::error!(target: "tether", error = %err, "command encode failed");
                            continue;
                        }
                    };
                    tracing::debug!(target: "tether", %payload, "sending command");
                    if let Err(err) = sink.send(WsMessage::Text(payload)).await {
                        let _ = events.send((id, ConnectionEvent::Errored(err.to_string())));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = sink.send(WsMessage::Close(None)).await;
                    break;
                }
            },
            inbound = stream.next() => match inbound {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(event) = decode_text_record(&text) {
                        if events.send((id, ConnectionEvent::Event(event))).is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(WsMessage::Close(_))) => break,
                // Pings are answered by tungstenite on the next write;
                // binary frames are not part of this protocol.
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::warn!(target: "tether", error = %err, "read error");
                    let _ = events.send((id, ConnectionEvent::Errored(err.to_string())));
                    break;
                }
                None => break,
            },
        }
    }

    let _ = events.send((id, ConnectionEvent::Closed));
}

/// Parses and decodes one inbound text record.
///
/// Returns `None` - after logging - for records that are not JSON, carry a
/// malformed payload, or use an unknown tag.
fn decode_text_record(text: &str) -> Option<AgentEvent> {
    let message: WireMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(target: "tether", error = %err, record = %text, "unparseable record");
            return None;
        }
    };

    match AgentEvent::decode(message) {
        Ok(AgentEvent::Ignored) => {
            tracing::debug!(target: "tether", record = %text, "ignored unknown tag");
            None
        }
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(target: "tether", error = %err, record = %text, "undecodable payload");
            None
        }
    }
}

/// Opens WebSocket connections at endpoints parameterized by mode.
///
/// Each connection gets a fresh [`ConnectionId`], so events from a
/// torn-down connection remain distinguishable from its replacement's.
pub struct WsConnector {
    base_url: String,
    next_id: u64,
    events: mpsc::UnboundedSender<(ConnectionId, ConnectionEvent)>,
}

impl WsConnector {
    /// Creates a connector for `base_url` (a `ws://` or `wss://` origin).
    pub fn new(
        base_url: impl Into<String>,
        events: mpsc::UnboundedSender<(ConnectionId, ConnectionEvent)>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !base_url.starts_with("ws://") && !base_url.starts_with("wss://") {
            return Err(Error::InvalidEndpoint(base_url));
        }
        Ok(Self {
            base_url,
            next_id: 0,
            events,
        })
    }

    /// Endpoint for `mode`: `{base}/ws/{mode}`.
    pub fn endpoint(&self, mode: Mode) -> String {
        format!("{}/ws/{}", self.base_url, mode)
    }
}

impl Connector for WsConnector {
    fn open(&mut self, mode: Mode) -> Result<Box<dyn CommandChannel>> {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        let url = self.endpoint(mode);
        Ok(Box::new(WsConnection::open(id, url, self.events.clone())))
    }
}

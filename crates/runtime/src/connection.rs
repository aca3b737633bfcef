//! Connection lifecycle abstraction.
//!
//! The session controller reacts to a finite set of named lifecycle events
//! rather than owning any socket directly: opening a connection returns a
//! [`CommandChannel`] for the outbound direction, and everything inbound -
//! including the open and close notifications themselves - arrives later as
//! [`ConnectionEvent`]s on a channel the application owns.
//!
//! # Decoupling via Connector
//!
//! The [`Connector`] trait decouples the controller from the WebSocket
//! transport, so the dispatch and state-machine logic is testable by feeding
//! it synthetic events directly; `tether-core` holds mock implementations in
//! its tests and the real [`WsConnector`](crate::transport::WsConnector) is
//! wired in by the binary.

use tether_protocol::{AgentEvent, Command, Mode};

use crate::error::Result;

/// Identity of one connection, stamped on every event it delivers.
///
/// Replacing a connection tears the old one down asynchronously, so its
/// final events (a `Closed` at minimum) are still in flight on the shared
/// event channel when the replacement opens. The id lets the consumer
/// discard those instead of applying them to the new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

/// A lifecycle event delivered by the transport.
///
/// At most one of these is processed at a time; the connection task delivers
/// them in order, and `Closed` is always the final event of a connection.
/// Events arrive paired with the [`ConnectionId`] of the connection that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    /// The connection completed its handshake.
    Opened,
    /// A decoded inbound event from the agent.
    Event(AgentEvent),
    /// A transport-level failure. Informational: a `Closed` follows.
    Errored(String),
    /// The connection is gone (normal close or failure).
    Closed,
}

/// Outbound half of an open (or opening) connection.
///
/// Commands sent while the handshake is still in flight are queued and
/// flushed once the socket opens, so a start command issued together with
/// the connection attempt is never lost.
pub trait CommandChannel: Send {
    /// Identity of this connection, matching the stamp on its events.
    fn id(&self) -> ConnectionId;

    /// Queues a command for delivery to the agent.
    fn send(&self, command: Command) -> Result<()>;

    /// Requests a graceful close. Idempotent; the `Closed` event confirms.
    fn close(&self);
}

/// Opens connections to the agent backend, one per run.
pub trait Connector: Send {
    /// Opens a connection for `mode` and returns its outbound channel.
    ///
    /// Completion (or failure) of the handshake is reported asynchronously
    /// as [`ConnectionEvent`]s; this call only starts the attempt.
    fn open(&mut self, mode: Mode) -> Result<Box<dyn CommandChannel>>;
}

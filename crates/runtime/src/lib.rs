//! Tether Runtime - Agent connection lifecycle and transport
//!
//! This crate provides the low-level runtime infrastructure for talking to
//! the agent backend:
//!
//! - **Connection abstraction**: named lifecycle events plus the
//!   [`Connector`]/[`CommandChannel`] traits the session controller is
//!   written against
//! - **Transport**: one WebSocket per run over tokio-tungstenite, with an
//!   outbound command queue and an inbound decode loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ tether-core  │  SessionController, PresentationSink
//! └──────┬───────┘
//!        │ consumes Connector / ConnectionEvent
//! ┌──────▼───────┐
//! │tether-runtime│  This crate
//! │ ┌──────────┐ │
//! │ │ Conn     │ │  Lifecycle events + traits
//! │ └──────────┘ │
//! │ ┌──────────┐ │
//! │ │ Trans    │ │  WebSocket transport
//! │ └──────────┘ │
//! └──────────────┘
//! ```
//!
//! The traits keep the controller free of any real network dependency: its
//! tests drive it with synthetic [`ConnectionEvent`]s and a mock connector.

pub mod connection;
pub mod error;
pub mod transport;

pub use connection::{CommandChannel, ConnectionEvent, ConnectionId, Connector};
pub use error::{Error, Result};
pub use transport::{WsConnection, WsConnector};

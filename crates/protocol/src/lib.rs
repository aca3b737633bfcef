//! Wire types for the agent session protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with the agent backend over its WebSocket protocol. These types represent
//! the "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization/deserialization and
//!   boundary decoding
//! - **1:1 with protocol**: Match the backend's tag + payload records
//! - **Typed at the boundary**: The backend layers sentinel strings
//!   (`[BEGIN]`, `[STOP]`, ...) inside generic payload fields; those are
//!   resolved into [`AgentEvent`] variants here, exactly once, so nothing
//!   downstream ever matches on raw marker strings.
//!
//! The session state machine built on top of these types lives in
//! `tether-core`.

pub mod command;
pub mod event;
pub mod types;

pub use command::*;
pub use event::*;
pub use types::*;

//! Session control for a remote autonomous agent.
//!
//! This crate is the middle of the stack: it consumes typed agent
//! events from `tether-runtime`, keeps all session state (run state,
//! log model, last frame, pending permission), and drives a
//! [`PresentationSink`] that a frontend implements. Nothing in here
//! touches the network, which is what makes the whole state machine
//! testable with a mock connector and a recording sink.
//!
//! ```text
//!  operator calls ──▶ SessionController ──▶ PresentationSink
//!                          ▲
//!          ConnectionEvent │ (tether-runtime)
//! ```

pub mod controller;
pub mod frame;
pub mod log;
pub mod sink;

pub use controller::{ConnectionState, RunState, SessionController};
pub use frame::Frame;
pub use log::{LogEntry, LogStream};
pub use sink::{PresentationSink, StatusSeverity};

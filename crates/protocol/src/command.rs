//! Outbound commands sent to the agent backend.

use serde::{Deserialize, Serialize};

/// A command sent from the operator console to the agent.
///
/// Serializes to the backend's `{"action": ...}` records:
///
/// - `{"action": "start", "task": "<text>"}`
/// - `{"action": "stop"}`
/// - `{"action": "input", "content": "<decision>"}`
///
/// `Stop` is advisory: the run is not considered terminated until the agent
/// acknowledges with a stop status event or the connection closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Command {
    /// Dispatch a new task to the agent.
    Start { task: String },
    /// Ask the agent to stop the current run (cooperative).
    Stop,
    /// Relay an operator decision (permission grant/denial) to the agent.
    Input { content: String },
}

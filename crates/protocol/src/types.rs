//! Core protocol types used across the wire.
//!
//! These types represent primitive values and enums shared by the inbound
//! event stream and the outbound command channel.

use serde::{Deserialize, Serialize};

/// Agent mode selected by the operator.
///
/// Modes are mutually exclusive and parameterize the connection endpoint
/// (`/ws/gui`, `/ws/code`). Selecting a mode is only allowed while no run
/// is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Desktop-automation agent: narrates, screenshots, and clicks.
    Gui,
    /// Code-execution agent.
    Code,
}

impl Mode {
    /// Wire spelling of the mode, as used in the endpoint path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Gui => "gui",
            Mode::Code => "code",
        }
    }

    /// Uppercase label for operator-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Gui => "GUI",
            Mode::Code => "CODE",
        }
    }

    /// Whether frames are delivered to the presentation layer in this mode.
    ///
    /// Both current modes accept frames; selecting [`Mode::Code`] hides the
    /// visualizer until the first frame arrives, but does not reject frames.
    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Gui | Mode::Code)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOrigin {
    /// Emitted locally by the controller (status narration).
    System,
    /// Operator-originated text relayed back by the backend.
    User,
    /// Narrated agent output, usually streamed in fragments.
    Agent,
    /// Error text, local or agent-reported.
    Error,
}

/// Encoding of a frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameEncoding {
    Png,
    Jpeg,
}

impl FrameEncoding {
    /// Parses a MIME-style tag (`image/png`, `image/jpeg`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(FrameEncoding::Png),
            "image/jpeg" => Some(FrameEncoding::Jpeg),
            _ => None,
        }
    }

    /// MIME identifier for this encoding.
    pub fn mime(&self) -> &'static str {
        match self {
            FrameEncoding::Png => "image/png",
            FrameEncoding::Jpeg => "image/jpeg",
        }
    }
}

/// A pointer action reported by the agent.
///
/// Coordinates are in the native (intrinsic) resolution of the most recent
/// frame, independent of how that frame is scaled for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPoint {
    /// Action label (e.g. "click", "double_click").
    pub action: String,
    /// X coordinate in native frame pixels.
    pub x: f64,
    /// Y coordinate in native frame pixels.
    pub y: f64,
}

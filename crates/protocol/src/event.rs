//! Inbound event decoding.
//!
//! The backend delivers discrete JSON records of the form
//! `{"type": <tag>, "content": <payload>}`. A few tags carry sentinel
//! payload values (`[BEGIN]`, `[END]`, `[START]`, `[STOP]`, a permission
//! marker) that change the meaning of the record. [`AgentEvent::decode`]
//! resolves tag and sentinel in one place so the dispatch logic downstream
//! only ever matches on a typed enum.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{ActionPoint, FrameEncoding};

/// Stream boundary markers inside `ai_content` payloads.
const STREAM_BEGIN: &str = "[BEGIN]";
const STREAM_END: &str = "[END]";

/// Run boundary markers inside `status` payloads.
const RUN_START: &str = "[START]";
const RUN_STOP: &str = "[STOP]";

/// Marker inside `request` payloads signalling the agent is blocked on
/// operator approval.
const PERMISSION_MARKER: &str = "need_permission";

/// A raw inbound record as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Record tag (`ai_content`, `status`, `image/png`, ...).
    #[serde(rename = "type")]
    pub tag: String,
    /// Tag-dependent payload.
    #[serde(default)]
    pub content: Value,
}

/// Malformed payload for a recognized tag.
///
/// Unknown tags are never an error (they decode to [`AgentEvent::Ignored`]);
/// these variants cover recognized tags whose payload cannot be interpreted.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("'{tag}' payload is not a string")]
    ExpectedString { tag: String },

    #[error("frame payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("action_point payload malformed: {0}")]
    ActionPoint(#[source] serde_json::Error),
}

/// A decoded inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Open a new streaming agent log entry.
    StreamBegin,
    /// Explicit end of a streamed entry. Closing is implicit on the next
    /// non-append event, so this is a no-op downstream.
    StreamEnd,
    /// A fragment of streamed agent narration.
    StreamChunk(String),
    /// The agent confirmed the run is underway.
    RunStarted,
    /// The run finished or was stopped; the only event that ends a run.
    RunStopped,
    /// Informational status text, passed through verbatim.
    StatusNote(String),
    /// A visual snapshot replacing the previous one.
    Frame {
        encoding: FrameEncoding,
        bytes: Vec<u8>,
    },
    /// A pointer action in native frame coordinates.
    ActionPoint(ActionPoint),
    /// The agent is blocked awaiting operator approval.
    PermissionNeeded,
    /// A `request` payload with no defined behavior. Accepted and dropped.
    RequestNote(String),
    /// Operator-originated text echoed by the backend.
    UserText(String),
    /// An agent-reported error. Does not end the run by itself.
    AgentError(String),
    /// Unrecognized tag, skipped for forward compatibility.
    Ignored,
}

impl AgentEvent {
    /// Decodes a wire record into a typed event.
    ///
    /// Unknown tags yield [`AgentEvent::Ignored`]; an error means a
    /// recognized tag carried a payload it cannot carry.
    pub fn decode(message: WireMessage) -> Result<AgentEvent, DecodeError> {
        let WireMessage { tag, content } = message;

        let event = match tag.as_str() {
            "ai_content" => match expect_str(&tag, &content)? {
                STREAM_BEGIN => AgentEvent::StreamBegin,
                STREAM_END => AgentEvent::StreamEnd,
                chunk => AgentEvent::StreamChunk(chunk.to_string()),
            },
            "status" => match expect_str(&tag, &content)? {
                RUN_START => AgentEvent::RunStarted,
                RUN_STOP => AgentEvent::RunStopped,
                note => AgentEvent::StatusNote(note.to_string()),
            },
            "request" => {
                let payload = expect_str(&tag, &content)?;
                if payload.contains(PERMISSION_MARKER) {
                    AgentEvent::PermissionNeeded
                } else {
                    AgentEvent::RequestNote(payload.to_string())
                }
            }
            "action_point" => {
                let point = serde_json::from_value::<ActionPoint>(content)
                    .map_err(DecodeError::ActionPoint)?;
                AgentEvent::ActionPoint(point)
            }
            "text" => AgentEvent::UserText(expect_str(&tag, &content)?.to_string()),
            "error" => AgentEvent::AgentError(expect_str(&tag, &content)?.to_string()),
            mime => match FrameEncoding::from_mime(mime) {
                Some(encoding) => {
                    let bytes = BASE64.decode(expect_str(&tag, &content)?)?;
                    AgentEvent::Frame { encoding, bytes }
                }
                None => AgentEvent::Ignored,
            },
        };

        Ok(event)
    }
}

fn expect_str<'a>(tag: &str, content: &'a Value) -> Result<&'a str, DecodeError> {
    content.as_str().ok_or_else(|| DecodeError::ExpectedString {
        tag: tag.to_string(),
    })
}

//! Presentation contract between the session controller and whatever
//! renders it.
//!
//! The controller drives a [`PresentationSink`] imperatively and never
//! reads back from it. Every method must be safe to call redundantly:
//! hiding an overlay that is not shown, clearing an empty log, or
//! re-enabling controls that are already enabled are all no-ops on a
//! well-behaved sink.

use tether_protocol::{FrameEncoding, LogOrigin};

/// How prominent a status line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Success,
    Warning,
    Error,
}

/// Rendering surface driven by [`SessionController`](crate::SessionController).
///
/// Log entries arrive in two shapes. A call with `streaming = false` is
/// an atomic entry: close any open streamed entry and append a new one.
/// A call with `streaming = true` appends `text` to the currently open
/// streamed entry, opening a fresh one if none is open; an empty `text`
/// only opens.
pub trait PresentationSink {
    fn append_log(&mut self, origin: LogOrigin, text: &str, streaming: bool);

    /// Drop every log entry, including any open streamed one.
    fn clear_log(&mut self);

    /// Replace the displayed frame with a freshly decoded one.
    fn show_frame(&mut self, bytes: &[u8], encoding: FrameEncoding);

    fn hide_overlay(&mut self);

    /// Place the action marker at the given position, expressed as
    /// percentages of the displayed frame's extent.
    fn position_overlay(&mut self, x_percent: f64, y_percent: f64);

    fn show_permission_prompt(&mut self);

    fn hide_permission_prompt(&mut self);

    fn set_status(&mut self, text: &str, severity: StatusSeverity);

    /// `true` while the operator may edit the task and switch modes,
    /// `false` while a run is in flight.
    fn set_controls_enabled(&mut self, enabled: bool);
}

//! Session log model.
//!
//! The agent streams its prose as framed fragments, so the log has to
//! reconcile two kinds of append: atomic entries that arrive whole, and
//! streamed fragments that accrete onto one open entry until the stream
//! ends. [`LogStream`] keeps that book so the controller can stay a
//! plain dispatch table.

use tether_protocol::LogOrigin;

/// One rendered line of the session log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub origin: LogOrigin,
    pub text: String,
}

/// Ordered log with at most one open streamed entry at its tail.
#[derive(Debug, Default)]
pub struct LogStream {
    entries: Vec<LogEntry>,
    streaming: bool,
}

impl LogStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.streaming = false;
    }

    /// Open a fresh streamed agent entry, closing any previous one.
    pub fn begin_stream(&mut self) {
        self.entries.push(LogEntry {
            origin: LogOrigin::Agent,
            text: String::new(),
        });
        self.streaming = true;
    }

    /// Close the open streamed entry, if any.
    pub fn end_stream(&mut self) {
        self.streaming = false;
    }

    /// Append a fragment to the open streamed entry. A fragment that
    /// arrives with no stream open (a lost begin marker) opens one
    /// rather than being dropped.
    pub fn append_fragment(&mut self, fragment: &str) {
        if !self.streaming {
            self.begin_stream();
        }
        if let Some(last) = self.entries.last_mut() {
            last.text.push_str(fragment);
        }
    }

    /// Append an atomic entry, closing any open stream first.
    pub fn push(&mut self, origin: LogOrigin, text: impl Into<String>) {
        self.streaming = false;
        self.entries.push(LogEntry {
            origin,
            text: text.into(),
        });
    }
}

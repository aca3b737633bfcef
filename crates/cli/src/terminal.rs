//! Terminal rendering of the session.
//!
//! The session log goes to stdout; diagnostics stay on stderr via
//! `tracing`. Streamed agent prose is printed fragment by fragment on
//! one line, so the sink tracks whether a streamed entry is open and
//! terminates its line before anything else prints.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use tether::{PresentationSink, StatusSeverity};
use tether_protocol::{FrameEncoding, LogOrigin};
use tracing::warn;

const TARGET: &str = "tether::terminal";

pub struct TerminalSink {
    frame_dir: Option<PathBuf>,
    frame_count: u64,
    stream_open: bool,
}

impl TerminalSink {
    pub fn new(frame_dir: Option<PathBuf>) -> Self {
        Self {
            frame_dir,
            frame_count: 0,
            stream_open: false,
        }
    }

    fn close_stream_line(&mut self) {
        if self.stream_open {
            println!();
            self.stream_open = false;
        }
    }

    fn paint(origin: LogOrigin, text: &str) -> colored::ColoredString {
        match origin {
            LogOrigin::System => text.cyan(),
            LogOrigin::User => text.green(),
            LogOrigin::Agent => text.normal(),
            LogOrigin::Error => text.red(),
        }
    }

    fn note(text: &str) {
        println!("{}", text.dimmed());
    }
}

impl PresentationSink for TerminalSink {
    fn append_log(&mut self, origin: LogOrigin, text: &str, streaming: bool) {
        if streaming {
            if !self.stream_open {
                self.close_stream_line();
                print!("{}", "> ".bold());
                self.stream_open = true;
            }
            print!("{}", Self::paint(origin, text));
            let _ = std::io::stdout().flush();
        } else {
            self.close_stream_line();
            println!("{} {}", ">".bold(), Self::paint(origin, text));
        }
    }

    fn clear_log(&mut self) {
        self.close_stream_line();
        Self::note("────────────────────────────────");
    }

    fn show_frame(&mut self, bytes: &[u8], encoding: FrameEncoding) {
        self.close_stream_line();
        self.frame_count += 1;
        let Some(dir) = &self.frame_dir else {
            Self::note(&format!("[frame #{}: {} bytes]", self.frame_count, bytes.len()));
            return;
        };
        let ext = match encoding {
            FrameEncoding::Png => "png",
            FrameEncoding::Jpeg => "jpg",
        };
        let path = dir.join(format!("frame-{:04}.{ext}", self.frame_count));
        match std::fs::write(&path, bytes) {
            Ok(()) => Self::note(&format!("[frame saved to {}]", path.display())),
            Err(err) => warn!(target: TARGET, error = %err, path = %path.display(), "failed to save frame"),
        }
    }

    fn hide_overlay(&mut self) {}

    fn position_overlay(&mut self, x_percent: f64, y_percent: f64) {
        self.close_stream_line();
        Self::note(&format!("[marker at {x_percent:.1}%, {y_percent:.1}%]"));
    }

    fn show_permission_prompt(&mut self) {
        self.close_stream_line();
        println!(
            "{}",
            "Permission required. Type `allow` or `deny`.".yellow().bold()
        );
    }

    fn hide_permission_prompt(&mut self) {}

    fn set_status(&mut self, text: &str, severity: StatusSeverity) {
        self.close_stream_line();
        let dot = match severity {
            StatusSeverity::Success => "●".green(),
            StatusSeverity::Warning => "●".yellow(),
            StatusSeverity::Error => "●".red(),
        };
        println!("{dot} {text}");
    }

    fn set_controls_enabled(&mut self, _enabled: bool) {
        // The prompt is always available in a terminal; the controller
        // rejects what is invalid for the current state.
    }
}

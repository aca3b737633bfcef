//! The session controller: operator intent on one side, agent events on
//! the other, a presentation sink underneath.

use tether_protocol::{AgentEvent, Command, FrameEncoding, LogOrigin, Mode};
use tether_runtime::{CommandChannel, ConnectionEvent, ConnectionId, Connector};
use tracing::{debug, warn};

use crate::frame::Frame;
use crate::log::LogStream;
use crate::sink::{PresentationSink, StatusSeverity};

const TARGET: &str = "tether::controller";

/// Lifecycle of the channel to the agent backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Closed,
    Connecting,
    Open,
}

/// Whether a task run is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Drives one agent session.
///
/// The controller owns all session state: the channel to the backend,
/// the run state, the log model, the last decoded frame, and the
/// pending permission flag. It is fed from exactly two directions,
/// operator calls ([`set_mode`](Self::set_mode),
/// [`start_task`](Self::start_task), [`stop_task`](Self::stop_task),
/// [`submit_permission`](Self::submit_permission)) and connection
/// events ([`handle_connection`](Self::handle_connection)), and pushes
/// every observable consequence into its [`PresentationSink`].
pub struct SessionController<S: PresentationSink> {
    connector: Box<dyn Connector>,
    channel: Option<Box<dyn CommandChannel>>,
    sink: S,
    mode: Mode,
    connection_state: ConnectionState,
    run_state: RunState,
    log: LogStream,
    frame: Option<Frame>,
    permission_pending: bool,
}

impl<S: PresentationSink> SessionController<S> {
    pub fn new(connector: Box<dyn Connector>, sink: S, mode: Mode) -> Self {
        let mut controller = Self {
            connector,
            channel: None,
            sink,
            mode,
            connection_state: ConnectionState::Closed,
            run_state: RunState::Idle,
            log: LogStream::new(),
            frame: None,
            permission_pending: false,
        };
        controller.push_log(LogOrigin::System, "Ready to initialize.");
        controller.sink.set_controls_enabled(true);
        controller
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn log(&self) -> &LogStream {
        &self.log
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn permission_pending(&self) -> bool {
        self.permission_pending
    }

    /// Switch the agent mode for the next run. Rejected while a run is
    /// in flight.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.run_state == RunState::Running {
            self.push_log(
                LogOrigin::Error,
                "Please stop the current task before switching modes.",
            );
            return;
        }
        self.mode = mode;
        self.push_log(
            LogOrigin::System,
            format!("Switched to {} Agent mode.", mode.label()),
        );
    }

    /// Begin a run: tear down any previous channel, clear the log, open
    /// a connection for the current mode, and queue the start command.
    ///
    /// An empty task is rejected locally and never reaches the agent.
    pub fn start_task(&mut self, task: &str) {
        let task = task.trim();
        if task.is_empty() {
            self.sink
                .set_status("Please enter a task description.", StatusSeverity::Warning);
            return;
        }

        if let Some(channel) = self.channel.take() {
            channel.close();
        }

        self.log.clear();
        self.sink.clear_log();
        self.permission_pending = false;
        self.sink.hide_permission_prompt();
        self.push_log(LogOrigin::System, "Initializing Agent...");

        self.connection_state = ConnectionState::Connecting;
        let channel = match self.connector.open(self.mode) {
            Ok(channel) => channel,
            Err(err) => {
                self.connection_state = ConnectionState::Closed;
                self.push_log(LogOrigin::Error, format!("Connection failed: {err}"));
                return;
            }
        };

        if let Err(err) = channel.send(Command::Start {
            task: task.to_owned(),
        }) {
            self.connection_state = ConnectionState::Closed;
            self.push_log(LogOrigin::Error, format!("Connection failed: {err}"));
            return;
        }

        self.channel = Some(channel);
        self.run_state = RunState::Running;
        self.sink.set_controls_enabled(false);
    }

    /// Ask the agent to stop. The run stays `Running` until the agent
    /// confirms with its stop marker or the connection closes.
    pub fn stop_task(&mut self) {
        let Some(channel) = &self.channel else {
            return;
        };
        match channel.send(Command::Stop) {
            Ok(()) => self.push_log(LogOrigin::System, "Sending stop signal..."),
            Err(err) => self.push_log(LogOrigin::Error, format!("Connection failed: {err}")),
        }
    }

    /// Relay a permission decision to the agent and dismiss the prompt.
    /// Ignored unless a prompt is actually pending.
    pub fn submit_permission(&mut self, decision: &str) {
        if !self.permission_pending {
            return;
        }
        let Some(channel) = &self.channel else {
            return;
        };
        match channel.send(Command::Input {
            content: decision.to_owned(),
        }) {
            Ok(()) => {
                self.permission_pending = false;
                self.sink.hide_permission_prompt();
                self.push_log(LogOrigin::User, format!("Permission {decision}."));
            }
            Err(err) => self.push_log(LogOrigin::Error, format!("Connection failed: {err}")),
        }
    }

    /// Apply one connection lifecycle event.
    ///
    /// Starting a run replaces the previous connection, whose teardown
    /// events are still in flight on the shared channel. Anything not
    /// stamped with the live connection's id is from such a predecessor
    /// and is dropped, so a stale `Closed` cannot kill the new run and
    /// stale stream fragments cannot leak into its cleared log.
    pub fn handle_connection(&mut self, id: ConnectionId, event: ConnectionEvent) {
        if self.channel.as_ref().map(|channel| channel.id()) != Some(id) {
            debug!(target: TARGET, ?id, ?event, "dropping event from a replaced connection");
            return;
        }
        match event {
            ConnectionEvent::Opened => {
                self.connection_state = ConnectionState::Open;
                self.sink.set_status("Connected", StatusSeverity::Success);
            }
            ConnectionEvent::Event(event) => self.apply_event(event),
            ConnectionEvent::Errored(message) => {
                self.push_log(LogOrigin::Error, format!("Connection error: {message}"));
            }
            ConnectionEvent::Closed => {
                self.connection_state = ConnectionState::Closed;
                self.channel = None;
                self.run_state = RunState::Idle;
                self.permission_pending = false;
                self.sink.hide_permission_prompt();
                self.sink.set_status("Disconnected", StatusSeverity::Error);
                self.sink.set_controls_enabled(true);
            }
        }
    }

    fn apply_event(&mut self, event: AgentEvent) {
        match event {
            AgentEvent::StreamBegin => {
                self.log.begin_stream();
                self.sink.append_log(LogOrigin::Agent, "", true);
            }
            AgentEvent::StreamEnd => self.log.end_stream(),
            AgentEvent::StreamChunk(fragment) => {
                self.log.append_fragment(&fragment);
                self.sink.append_log(LogOrigin::Agent, &fragment, true);
            }
            AgentEvent::RunStarted => {
                self.sink.set_status("Running", StatusSeverity::Warning);
            }
            AgentEvent::RunStopped => {
                self.run_state = RunState::Idle;
                self.sink.set_status("Idle", StatusSeverity::Success);
                self.sink.set_controls_enabled(true);
                self.push_log(LogOrigin::System, "Task finished or stopped.");
            }
            AgentEvent::StatusNote(note) => {
                self.push_log(LogOrigin::System, format!("Status: {note}"));
            }
            AgentEvent::Frame { encoding, bytes } => self.apply_frame(encoding, bytes),
            AgentEvent::ActionPoint(point) => {
                if let Some(frame) = &self.frame {
                    let (x, y) = frame.overlay_percent(point.x, point.y);
                    self.sink.position_overlay(x, y);
                }
                self.push_log(
                    LogOrigin::System,
                    format!("Action: {} at ({}, {})", point.action, point.x, point.y),
                );
            }
            AgentEvent::PermissionNeeded => {
                self.permission_pending = true;
                self.sink.show_permission_prompt();
                self.push_log(LogOrigin::System, "Waiting for user permission...");
            }
            AgentEvent::RequestNote(note) => {
                // Informational only; the status channel carries the
                // authoritative run transitions.
                warn!(target: TARGET, %note, "unhandled request note");
            }
            AgentEvent::UserText(text) => self.push_log(LogOrigin::User, text),
            AgentEvent::AgentError(message) => self.push_log(LogOrigin::Error, message),
            AgentEvent::Ignored => {}
        }
    }

    fn apply_frame(&mut self, encoding: FrameEncoding, bytes: Vec<u8>) {
        if !self.mode.is_visual() {
            return;
        }
        match Frame::decode(encoding, bytes) {
            Some(frame) => {
                self.sink.show_frame(&frame.bytes, frame.encoding);
                self.sink.hide_overlay();
                self.frame = Some(frame);
            }
            None => warn!(target: TARGET, ?encoding, "dropping undecodable frame"),
        }
    }

    fn push_log(&mut self, origin: LogOrigin, text: impl Into<String>) {
        let text = text.into();
        self.log.push(origin, text.clone());
        self.sink.append_log(origin, &text, false);
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use tether_protocol::ActionPoint;
    use tether_runtime::{Error, Result};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum SinkCall {
        Log(LogOrigin, String, bool),
        ClearLog,
        Frame(FrameEncoding, usize),
        HideOverlay,
        Overlay(f64, f64),
        ShowPrompt,
        HidePrompt,
        Status(String, StatusSeverity),
        Controls(bool),
    }

    #[derive(Default, Clone)]
    struct RecordingSink {
        calls: Arc<Mutex<Vec<SinkCall>>>,
    }

    impl RecordingSink {
        fn calls(&self) -> Vec<SinkCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: SinkCall) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl PresentationSink for RecordingSink {
        fn append_log(&mut self, origin: LogOrigin, text: &str, streaming: bool) {
            self.record(SinkCall::Log(origin, text.to_owned(), streaming));
        }

        fn clear_log(&mut self) {
            self.record(SinkCall::ClearLog);
        }

        fn show_frame(&mut self, bytes: &[u8], encoding: FrameEncoding) {
            self.record(SinkCall::Frame(encoding, bytes.len()));
        }

        fn hide_overlay(&mut self) {
            self.record(SinkCall::HideOverlay);
        }

        fn position_overlay(&mut self, x_percent: f64, y_percent: f64) {
            self.record(SinkCall::Overlay(x_percent, y_percent));
        }

        fn show_permission_prompt(&mut self) {
            self.record(SinkCall::ShowPrompt);
        }

        fn hide_permission_prompt(&mut self) {
            self.record(SinkCall::HidePrompt);
        }

        fn set_status(&mut self, text: &str, severity: StatusSeverity) {
            self.record(SinkCall::Status(text.to_owned(), severity));
        }

        fn set_controls_enabled(&mut self, enabled: bool) {
            self.record(SinkCall::Controls(enabled));
        }
    }

    /// Id the mock connector assigns to the first connection it opens;
    /// subsequent opens count up from here.
    const FIRST: ConnectionId = ConnectionId(1);
    const SECOND: ConnectionId = ConnectionId(2);

    #[derive(Default, Clone)]
    struct MockConnector {
        opened: Arc<Mutex<Vec<Mode>>>,
        sent: Arc<Mutex<Vec<Command>>>,
        closed: Arc<Mutex<usize>>,
        fail_open: bool,
    }

    struct MockChannel {
        id: ConnectionId,
        sent: Arc<Mutex<Vec<Command>>>,
        closed: Arc<Mutex<usize>>,
    }

    impl CommandChannel for MockChannel {
        fn id(&self) -> ConnectionId {
            self.id
        }

        fn send(&self, command: Command) -> Result<()> {
            self.sent.lock().unwrap().push(command);
            Ok(())
        }

        fn close(&self) {
            *self.closed.lock().unwrap() += 1;
        }
    }

    impl Connector for MockConnector {
        fn open(&mut self, mode: Mode) -> Result<Box<dyn CommandChannel>> {
            self.opened.lock().unwrap().push(mode);
            if self.fail_open {
                return Err(Error::ConnectionFailed("refused".into()));
            }
            Ok(Box::new(MockChannel {
                id: ConnectionId(self.opened.lock().unwrap().len() as u64),
                sent: self.sent.clone(),
                closed: self.closed.clone(),
            }))
        }
    }

    fn controller(
        mode: Mode,
    ) -> (
        SessionController<RecordingSink>,
        RecordingSink,
        MockConnector,
    ) {
        let sink = RecordingSink::default();
        let connector = MockConnector::default();
        let controller = SessionController::new(Box::new(connector.clone()), sink.clone(), mode);
        (controller, sink, connector)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::RgbaImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn new_controller_announces_itself() {
        let (controller, sink, _) = controller(Mode::Gui);
        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(controller.connection_state(), ConnectionState::Closed);
        assert_eq!(
            sink.calls(),
            vec![
                SinkCall::Log(LogOrigin::System, "Ready to initialize.".into(), false),
                SinkCall::Controls(true),
            ]
        );
    }

    #[test]
    fn start_clears_log_then_opens_and_sends() {
        let (mut controller, sink, connector) = controller(Mode::Gui);
        controller.start_task("  book a flight  ");

        assert_eq!(controller.run_state(), RunState::Running);
        assert_eq!(*connector.opened.lock().unwrap(), vec![Mode::Gui]);
        assert_eq!(
            *connector.sent.lock().unwrap(),
            vec![Command::Start {
                task: "book a flight".into()
            }]
        );

        let calls = sink.calls();
        let clear_at = calls
            .iter()
            .position(|c| *c == SinkCall::ClearLog)
            .unwrap();
        let init_at = calls
            .iter()
            .position(|c| {
                *c == SinkCall::Log(LogOrigin::System, "Initializing Agent...".into(), false)
            })
            .unwrap();
        assert!(clear_at < init_at);
        assert_eq!(calls.last(), Some(&SinkCall::Controls(false)));
        assert_eq!(controller.log().entries().len(), 1);
    }

    #[test]
    fn empty_task_is_rejected_locally() {
        let (mut controller, sink, connector) = controller(Mode::Gui);
        controller.start_task("   ");

        assert_eq!(controller.run_state(), RunState::Idle);
        assert!(connector.opened.lock().unwrap().is_empty());
        assert!(sink.calls().contains(&SinkCall::Status(
            "Please enter a task description.".into(),
            StatusSeverity::Warning
        )));
    }

    #[test]
    fn restart_closes_the_previous_channel() {
        let (mut controller, _, connector) = controller(Mode::Gui);
        controller.start_task("first");
        controller.start_task("second");

        assert_eq!(*connector.closed.lock().unwrap(), 1);
        assert_eq!(connector.opened.lock().unwrap().len(), 2);
    }

    #[test]
    fn restart_ignores_stale_events_from_the_replaced_connection() {
        let (mut controller, sink, connector) = controller(Mode::Gui);
        controller.start_task("first");
        controller.start_task("second");

        // The first connection's teardown events arrive after the second
        // run has already started. They must not touch it.
        controller.handle_connection(
            FIRST,
            ConnectionEvent::Event(AgentEvent::StreamChunk("leftover".into())),
        );
        controller.handle_connection(FIRST, ConnectionEvent::Closed);

        assert_eq!(controller.run_state(), RunState::Running);
        assert!(
            controller
                .log()
                .entries()
                .iter()
                .all(|e| !e.text.contains("leftover"))
        );
        assert!(!sink.calls().contains(&SinkCall::Status(
            "Disconnected".into(),
            StatusSeverity::Error
        )));

        // The replacement channel is still live: its own events apply and
        // stop still reaches the backend.
        controller.handle_connection(SECOND, ConnectionEvent::Opened);
        assert_eq!(controller.connection_state(), ConnectionState::Open);
        controller.stop_task();
        assert_eq!(connector.sent.lock().unwrap().last(), Some(&Command::Stop));

        controller.handle_connection(SECOND, ConnectionEvent::Closed);
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn failed_open_surfaces_an_error_entry() {
        let sink = RecordingSink::default();
        let connector = MockConnector {
            fail_open: true,
            ..MockConnector::default()
        };
        let mut controller =
            SessionController::new(Box::new(connector.clone()), sink.clone(), Mode::Gui);
        controller.start_task("task");

        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(controller.connection_state(), ConnectionState::Closed);
        let last = controller.log().entries().last().unwrap().clone();
        assert_eq!(last.origin, LogOrigin::Error);
        assert!(last.text.starts_with("Connection failed:"));
    }

    #[test]
    fn mode_switch_is_rejected_while_running() {
        let (mut controller, _, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.set_mode(Mode::Code);

        assert_eq!(controller.mode(), Mode::Gui);
        assert_eq!(
            controller.log().entries().last().unwrap().text,
            "Please stop the current task before switching modes."
        );
    }

    #[test]
    fn mode_switch_narrates_when_idle() {
        let (mut controller, _, connector) = controller(Mode::Gui);
        controller.set_mode(Mode::Code);
        controller.start_task("fix the build");

        assert_eq!(controller.mode(), Mode::Code);
        assert_eq!(*connector.opened.lock().unwrap(), vec![Mode::Code]);
        assert!(
            controller
                .log()
                .entries()
                .iter()
                .any(|e| e.text == "Switched to CODE Agent mode.")
        );
    }

    #[test]
    fn stop_sends_once_and_stays_running_until_confirmed() {
        let (mut controller, _, connector) = controller(Mode::Gui);
        controller.start_task("task");
        controller.stop_task();

        assert_eq!(controller.run_state(), RunState::Running);
        assert_eq!(connector.sent.lock().unwrap().len(), 2);
        assert_eq!(connector.sent.lock().unwrap()[1], Command::Stop);
        assert_eq!(
            controller.log().entries().last().unwrap().text,
            "Sending stop signal..."
        );

        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::RunStopped));
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn stop_without_a_channel_is_a_no_op() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        let before = sink.calls().len();
        controller.stop_task();
        assert_eq!(sink.calls().len(), before);
    }

    #[test]
    fn streamed_fragments_become_one_agent_entry() {
        let (mut controller, _, _) = controller(Mode::Gui);
        controller.start_task("task");
        for event in [
            AgentEvent::RunStarted,
            AgentEvent::StreamBegin,
            AgentEvent::StreamChunk("Hello".into()),
            AgentEvent::StreamChunk(" world".into()),
            AgentEvent::StreamEnd,
            AgentEvent::RunStopped,
        ] {
            controller.handle_connection(FIRST, ConnectionEvent::Event(event));
        }

        let agent: Vec<_> = controller
            .log()
            .entries()
            .iter()
            .filter(|e| e.origin == LogOrigin::Agent)
            .collect();
        assert_eq!(agent.len(), 1);
        assert_eq!(agent[0].text, "Hello world");
        assert_eq!(controller.run_state(), RunState::Idle);
    }

    #[test]
    fn fragment_without_begin_still_lands_in_the_log() {
        let (mut controller, _, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::StreamChunk(
            "orphan".into(),
        )));
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::StreamChunk(
            " text".into(),
        )));

        let last = controller.log().entries().last().unwrap();
        assert_eq!(last.origin, LogOrigin::Agent);
        assert_eq!(last.text, "orphan text");
    }

    #[test]
    fn run_markers_drive_status_and_controls() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Opened);
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::RunStarted));
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::RunStopped));

        let calls = sink.calls();
        assert!(calls.contains(&SinkCall::Status("Connected".into(), StatusSeverity::Success)));
        assert!(calls.contains(&SinkCall::Status("Running".into(), StatusSeverity::Warning)));
        assert!(calls.contains(&SinkCall::Status("Idle".into(), StatusSeverity::Success)));
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                SinkCall::Status("Idle".into(), StatusSeverity::Success),
                SinkCall::Controls(true),
                SinkCall::Log(LogOrigin::System, "Task finished or stopped.".into(), false),
            ]
        );
    }

    #[test]
    fn closure_forces_idle_without_a_stop_marker() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::PermissionNeeded));
        controller.handle_connection(FIRST, ConnectionEvent::Closed);

        assert_eq!(controller.run_state(), RunState::Idle);
        assert_eq!(controller.connection_state(), ConnectionState::Closed);
        assert!(!controller.permission_pending());
        let calls = sink.calls();
        assert!(calls.contains(&SinkCall::Status(
            "Disconnected".into(),
            StatusSeverity::Error
        )));
        assert_eq!(calls.last(), Some(&SinkCall::Controls(true)));
    }

    #[test]
    fn connection_error_logs_but_does_not_end_the_run() {
        let (mut controller, _, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Errored("reset by peer".into()));

        assert_eq!(controller.run_state(), RunState::Running);
        let last = controller.log().entries().last().unwrap();
        assert_eq!(last.origin, LogOrigin::Error);
        assert_eq!(last.text, "Connection error: reset by peer");
    }

    #[test]
    fn frame_is_decoded_and_overlay_reset() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        let bytes = png_bytes(200, 100);
        let len = bytes.len();
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::Frame {
            encoding: FrameEncoding::Png,
            bytes,
        }));

        let frame = controller.frame().unwrap();
        assert_eq!((frame.width, frame.height), (200, 100));
        let calls = sink.calls();
        assert!(calls.contains(&SinkCall::Frame(FrameEncoding::Png, len)));
        assert_eq!(calls.last(), Some(&SinkCall::HideOverlay));
    }

    #[test]
    fn undecodable_frame_is_dropped() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::Frame {
            encoding: FrameEncoding::Png,
            bytes: b"garbage".to_vec(),
        }));

        assert!(controller.frame().is_none());
        assert!(
            !sink
                .calls()
                .iter()
                .any(|c| matches!(c, SinkCall::Frame(..)))
        );
    }

    #[test]
    fn action_point_maps_into_frame_percentages() {
        let (mut controller, sink, _) = controller(Mode::Code);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::Frame {
            encoding: FrameEncoding::Png,
            bytes: png_bytes(200, 100),
        }));
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::ActionPoint(
            ActionPoint {
                action: "click".into(),
                x: 50.0,
                y: 25.0,
            },
        )));

        assert!(sink.calls().contains(&SinkCall::Overlay(25.0, 25.0)));
        assert_eq!(
            controller.log().entries().last().unwrap().text,
            "Action: click at (50, 25)"
        );
    }

    #[test]
    fn action_point_without_a_frame_logs_but_skips_the_overlay() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::ActionPoint(
            ActionPoint {
                action: "click".into(),
                x: 10.0,
                y: 10.0,
            },
        )));

        assert!(
            !sink
                .calls()
                .iter()
                .any(|c| matches!(c, SinkCall::Overlay(..)))
        );
        assert_eq!(
            controller.log().entries().last().unwrap().text,
            "Action: click at (10, 10)"
        );
    }

    #[test]
    fn permission_round_trip() {
        let (mut controller, sink, connector) = controller(Mode::Gui);
        controller.start_task("task");
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::PermissionNeeded));

        assert!(controller.permission_pending());
        assert!(sink.calls().contains(&SinkCall::ShowPrompt));
        assert_eq!(
            controller.log().entries().last().unwrap().text,
            "Waiting for user permission..."
        );

        controller.submit_permission("approved");
        assert!(!controller.permission_pending());
        assert_eq!(
            connector.sent.lock().unwrap().last(),
            Some(&Command::Input {
                content: "approved".into()
            })
        );
        assert!(sink.calls().contains(&SinkCall::HidePrompt));
        let last = controller.log().entries().last().unwrap();
        assert_eq!(last.origin, LogOrigin::User);
        assert_eq!(last.text, "Permission approved.");
    }

    #[test]
    fn permission_without_a_pending_prompt_is_ignored() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        let before = sink.calls().len();
        controller.submit_permission("approved");
        assert_eq!(sink.calls().len(), before);
    }

    #[test]
    fn inert_events_change_nothing_visible() {
        let (mut controller, sink, _) = controller(Mode::Gui);
        controller.start_task("task");
        let before = sink.calls().len();
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::RequestNote(
            "stop_agent".into(),
        )));
        controller.handle_connection(FIRST, ConnectionEvent::Event(AgentEvent::Ignored));
        assert_eq!(sink.calls().len(), before);
    }

    #[test]
    fn status_note_and_text_and_error_land_in_the_log() {
        let (mut controller, _, _) = controller(Mode::Gui);
        controller.start_task("task");
        for event in [
            AgentEvent::StatusNote("warming up".into()),
            AgentEvent::UserText("approved earlier".into()),
            AgentEvent::AgentError("tool crashed".into()),
        ] {
            controller.handle_connection(FIRST, ConnectionEvent::Event(event));
        }

        let entries = controller.log().entries();
        let n = entries.len();
        assert_eq!(entries[n - 3].text, "Status: warming up");
        assert_eq!(entries[n - 3].origin, LogOrigin::System);
        assert_eq!(entries[n - 2].text, "approved earlier");
        assert_eq!(entries[n - 2].origin, LogOrigin::User);
        assert_eq!(entries[n - 1].text, "tool crashed");
        assert_eq!(entries[n - 1].origin, LogOrigin::Error);
    }
}

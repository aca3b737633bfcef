use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tether_protocol::Mode;

#[derive(Parser, Debug)]
#[command(name = "tether")]
#[command(about = "Terminal console for driving a remote autonomous agent")]
#[command(version)]
pub struct Cli {
    /// Agent backend origin (ws:// or wss://)
    #[arg(short, long, default_value = "ws://127.0.0.1:8000")]
    pub url: String,

    /// Agent mode to start in
    #[arg(short, long, value_enum, default_value = "gui")]
    pub mode: CliMode,

    /// Directory to save incoming frames into (omit to discard them)
    #[arg(long, value_name = "DIR")]
    pub frame_dir: Option<PathBuf>,

    /// Start this task immediately instead of waiting for a `start` command
    #[arg(value_name = "TASK")]
    pub task: Option<String>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Agent mode (clap-compatible enum)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CliMode {
    /// Drive a desktop GUI, streaming screenshots back
    #[default]
    Gui,
    /// Run in a code sandbox
    Code,
}

impl From<CliMode> for Mode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Gui => Mode::Gui,
            CliMode::Code => Mode::Code,
        }
    }
}

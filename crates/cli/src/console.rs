//! Interactive console loop: operator commands from stdin on one side,
//! connection events from the runtime on the other, a single
//! [`SessionController`] in the middle.

use anyhow::Context;
use colored::Colorize;
use tether::SessionController;
use tether_protocol::Mode;
use tether_runtime::WsConnector;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::terminal::TerminalSink;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let connector = WsConnector::new(cli.url.as_str(), events_tx)
        .with_context(|| format!("invalid backend url {}", cli.url))?;

    if let Some(dir) = &cli.frame_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create frame directory {}", dir.display()))?;
    }

    let sink = TerminalSink::new(cli.frame_dir.clone());
    let mut controller = SessionController::new(Box::new(connector), sink, cli.mode.into());

    if let Some(task) = &cli.task {
        controller.start_task(task);
    } else {
        print_help();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some((id, event)) => controller.handle_connection(id, event),
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if !dispatch(&mut controller, line.trim()) {
                    break;
                }
            }
        }
    }

    controller.stop_task();
    Ok(())
}

/// Returns `false` when the operator asked to quit.
fn dispatch(controller: &mut SessionController<TerminalSink>, line: &str) -> bool {
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match word {
        "" => {}
        "start" => controller.start_task(rest),
        "stop" => controller.stop_task(),
        "mode" => match rest {
            "gui" => controller.set_mode(Mode::Gui),
            "code" => controller.set_mode(Mode::Code),
            _ => eprintln!("{}", "usage: mode <gui|code>".yellow()),
        },
        "allow" => controller.submit_permission("approved"),
        "deny" => controller.submit_permission("denied"),
        "help" => print_help(),
        "quit" | "exit" => return false,
        _ => eprintln!(
            "{}",
            format!("unknown command `{word}`; try `help`").yellow()
        ),
    }
    true
}

fn print_help() {
    println!(
        "{}",
        "commands: start <task> | stop | mode <gui|code> | allow | deny | quit".dimmed()
    );
}

//! Operator commands read from stdin.
//!
//! A terminal has no pointer, so card activation is `inspect <job_id>`
//! and dismissing the overlay is `close`.

use std::io::BufRead;
use std::thread;

use jobwatch_client::dashboard::UiCommand;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ui(UiCommand),
    Quit,
}

/// Parse one input line. Blank or unrecognised lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let arg = words.next();

    match (verb, arg) {
        ("inspect" | "i", Some(job_id)) => Some(Command::Ui(UiCommand::Inspect(job_id.to_string()))),
        ("close" | "c", None) => Some(Command::Ui(UiCommand::CloseDetail)),
        ("quit" | "q", None) => Some(Command::Quit),
        _ => None,
    }
}

/// Forward parsed commands from `reader` until EOF, `quit`, or `cancel`.
///
/// Blocking: run it on its own thread, never on the runtime. A read that
/// is still pending when the dashboard stops does not hold up exit; the
/// thread is detached and ends with the process. `quit` cancels
/// `cancel`, which stops the whole dashboard.
pub fn read_commands<R>(reader: R, commands: mpsc::Sender<UiCommand>, cancel: CancellationToken)
where
    R: BufRead,
{
    for line in reader.lines() {
        if cancel.is_cancelled() {
            return;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read command input");
                return;
            }
        };

        match parse_command(&line) {
            Some(Command::Ui(command)) => {
                if commands.blocking_send(command).is_err() {
                    return;
                }
            }
            Some(Command::Quit) => {
                tracing::info!("Quit requested");
                cancel.cancel();
                return;
            }
            None if line.trim().is_empty() => {}
            None => tracing::info!(input = %line.trim(), "Unknown command; use `inspect <job_id>`, `close` or `quit`"),
        }
    }

    tracing::debug!("Command input closed");
}

/// Start [`read_commands`] over stdin on a detached thread named
/// `jobwatch-stdin`.
pub fn spawn_stdin_reader(
    commands: mpsc::Sender<UiCommand>,
    cancel: CancellationToken,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("jobwatch-stdin".into())
        .spawn(move || read_commands(std::io::stdin().lock(), commands, cancel))
}

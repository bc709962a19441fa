//! End-to-end shutdown tests for the `jobwatch` binary.
//!
//! Each test keeps the child's stdin pipe open, as an idle operator's
//! terminal would be, and points it at a port nothing listens on so the
//! connection manager sits in its reconnect loop.

#![cfg(unix)]

use std::io::Write;
use std::net::TcpListener;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const STARTUP_GRACE: Duration = Duration::from_millis(1500);
const EXIT_TIMEOUT: Duration = Duration::from_secs(8);

fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn spawn_jobwatch() -> Child {
    Command::new(env!("CARGO_BIN_EXE_jobwatch"))
        .env("JOBWATCH_ORIGIN", closed_origin())
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn jobwatch")
}

fn wait_for_exit(child: &mut Child) -> Option<ExitStatus> {
    let deadline = Instant::now() + EXIT_TIMEOUT;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().expect("poll jobwatch") {
            return Some(status);
        }
        thread::sleep(Duration::from_millis(50));
    }
    None
}

fn assert_exits(mut child: Child, what: &str) {
    // Hold stdin open until the child is gone.
    let stdin = child.stdin.take();
    let status = wait_for_exit(&mut child);
    if status.is_none() {
        let _ = child.kill();
        let _ = child.wait();
    }
    drop(stdin);
    assert!(status.is_some(), "jobwatch still running {EXIT_TIMEOUT:?} after {what} with stdin open");
}

// ---------------------------------------------------------------------------
// Test: SIGINT stops the process while stdin is idle
// ---------------------------------------------------------------------------

#[test]
fn interrupt_exits_with_stdin_open() {
    let child = spawn_jobwatch();
    thread::sleep(STARTUP_GRACE);

    let sent = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("run kill");
    assert!(sent.success());

    assert_exits(child, "SIGINT");
}

// ---------------------------------------------------------------------------
// Test: `quit` stops the process
// ---------------------------------------------------------------------------

#[test]
fn quit_command_exits() {
    let mut child = spawn_jobwatch();
    thread::sleep(STARTUP_GRACE);

    let stdin = child.stdin.as_mut().expect("piped stdin");
    stdin.write_all(b"quit\n").unwrap();
    stdin.flush().unwrap();

    assert_exits(child, "`quit`");
}

//! Shared integration-test harness for running the `swanclock` binary.

#![allow(dead_code)]

use std::io::Write;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, Command};

/// Default timeout for waiting on a child.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Flags that make a countdown finish quickly and quietly.
pub const FAST: [&str; 5] = [
    "--tick-interval",
    "20ms",
    "--no-pacing",
    "--display",
    "none",
];

/// Path to the compiled binary.
#[must_use]
pub fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_swanclock")
}

/// Runs the binary to completion with stdin closed.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    std::process::Command::new(bin())
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run swanclock")
}

/// Runs the binary to completion, feeding `input` on stdin and then
/// closing it.
#[allow(clippy::missing_panics_doc)]
pub fn run_with_input(args: &[&str], input: &str) -> Output {
    let mut child = std::process::Command::new(bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn swanclock");

    let mut stdin = child.stdin.take().expect("stdin not captured");
    stdin
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    drop(stdin);

    child.wait_with_output().expect("failed to wait for swanclock")
}

/// A running countdown driven interactively over stdin.
///
/// The child process is killed on drop.
pub struct SwanclockProcess {
    child: Child,
    stdin: ChildStdin,
    stderr: BufReader<ChildStderr>,
}

impl SwanclockProcess {
    /// Spawns `swanclock run` with the given extra arguments.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_run(args: &[&str]) -> Self {
        let mut child = Command::new(bin())
            .arg("run")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn swanclock");

        let stdin = child.stdin.take().expect("stdin not captured");
        let stderr = child.stderr.take().expect("stderr not captured");

        Self {
            child,
            stdin,
            stderr: BufReader::new(stderr),
        }
    }

    /// OS process id.
    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Reads stderr lines until one contains `needle`.
    ///
    /// Panics on EOF or if nothing matches within `timeout`.
    #[allow(clippy::missing_panics_doc)]
    pub async fn wait_for_stderr(&mut self, needle: &str, timeout: Duration) -> String {
        let mut line = String::new();
        let result = tokio::time::timeout(timeout, async {
            loop {
                line.clear();
                let n = self
                    .stderr
                    .read_line(&mut line)
                    .await
                    .expect("read_line I/O error");
                assert!(n > 0, "unexpected EOF waiting for {needle:?}");
                if line.contains(needle) {
                    return line.clone();
                }
            }
        })
        .await;
        result.unwrap_or_else(|_| panic!("timed out waiting for {needle:?} on stderr"))
    }

    /// Writes one line to stdin.
    #[allow(clippy::missing_panics_doc)]
    pub async fn send_line(&mut self, line: &str) {
        self.stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("failed to write to stdin");
        self.stdin.flush().await.expect("failed to flush stdin");
    }

    /// Waits for exit and returns the status code with everything printed
    /// on stdout.
    #[allow(clippy::missing_panics_doc)]
    pub async fn finish(self) -> (Option<i32>, String) {
        let Self {
            mut child, stdin, ..
        } = self;
        drop(stdin);

        let mut stdout = child.stdout.take().expect("stdout not captured");
        let mut out = String::new();
        let status = tokio::time::timeout(DEFAULT_TIMEOUT, async {
            stdout
                .read_to_string(&mut out)
                .await
                .expect("failed to read stdout");
            child.wait().await.expect("failed to wait for child")
        })
        .await
        .expect("swanclock did not exit in time");

        (status.code(), out)
    }
}

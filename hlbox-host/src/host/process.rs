//! Streaming execution of the game client.
//!
//! The client is started as `<interpreter> <client args> --json <args>` and
//! prints one JSON value per line on stdout. [`ClientRunner::call`] turns that
//! output into a [`JsonLineStream`]: a lazy, single-pass [`Stream`] of parsed
//! values with at most one value buffered ahead of the consumer.
//!
//! Dropping the stream before the client finishes kills the client.

use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use futures::Stream;
use hlbox_core::{HostConfig, ParseFailurePolicy};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, trace, warn};

use crate::error::{ProcessError, StreamError};
use crate::handoff::{self, Slot, SlotReceiver, SlotSender};

// ============================================================================
// Client Runner
// ============================================================================

/// Starts the game client and streams its JSON output.
#[derive(Debug, Clone)]
pub struct ClientRunner {
    interpreter: String,
    /// Module selector and JSON flag, placed before the caller's arguments.
    base_args: Vec<String>,
    parse_failure: ParseFailurePolicy,
}

impl ClientRunner {
    /// Creates a runner from host configuration.
    pub fn from_config(config: &HostConfig) -> Self {
        Self {
            interpreter: config.interpreter.clone(),
            base_args: config.client_command_args::<&str>(&[]),
            parse_failure: config.parse_failure,
        }
    }

    /// Sets the parse failure policy.
    #[must_use]
    pub fn with_parse_failure(mut self, policy: ParseFailurePolicy) -> Self {
        self.parse_failure = policy;
        self
    }

    /// Full argument list passed to the interpreter.
    pub fn command_args<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        self.base_args
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .collect()
    }

    /// Spawns the client with `args` and returns a stream of its output.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self, args), fields(cmd = %self.interpreter))]
    pub fn call<S: AsRef<str>>(&self, args: &[S]) -> Result<JsonLineStream, ProcessError> {
        let cmd_path = self.which().ok_or_else(|| {
            warn!(cmd = %self.interpreter, "Command not found");
            ProcessError::NotFound(self.interpreter.clone())
        })?;

        let full_args = self.command_args(args);
        debug!(args = ?full_args, "Spawning client");

        let mut child = Command::new(&cmd_path)
            .args(&full_args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                cmd: self.interpreter.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(ProcessError::MissingStdout)?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(drain_stderr(stderr));
        }

        let pid = child.id();
        let (sender, slots) = handoff::channel();
        let reader = tokio::spawn(pump_stdout(child, stdout, sender, self.parse_failure));

        Ok(JsonLineStream { slots, reader, pid })
    }

    /// Check if the interpreter exists on PATH.
    pub fn command_exists(&self) -> bool {
        self.which().is_some()
    }

    /// Find the path to the interpreter.
    pub fn which(&self) -> Option<PathBuf> {
        which::which(&self.interpreter).ok()
    }
}

impl Default for ClientRunner {
    fn default() -> Self {
        Self::from_config(&HostConfig::default())
    }
}

// ============================================================================
// JSON Line Stream
// ============================================================================

/// Parsed JSON values from a running client, one per stdout line.
#[derive(Debug)]
pub struct JsonLineStream {
    slots: SlotReceiver<Value, StreamError>,
    reader: JoinHandle<()>,
    pid: Option<u32>,
}

impl JsonLineStream {
    /// Waits for the next value, or for the reason the stream ended.
    pub async fn next_event(&mut self) -> Slot<Value, StreamError> {
        self.slots.recv().await
    }

    /// OS process id of the client, if it was still running at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }
}

impl Stream for JsonLineStream {
    type Item = Value;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Value>> {
        Pin::new(&mut self.slots).poll_next(cx)
    }
}

impl Drop for JsonLineStream {
    fn drop(&mut self) {
        // The reader owns the child; aborting it drops the child, which kills it.
        self.reader.abort();
    }
}

// ============================================================================
// Reader Tasks
// ============================================================================

/// Reads stdout line by line and hands each parsed value to the consumer.
///
/// Lines are split on raw bytes so a line that is not UTF-8 goes through the
/// parse failure policy instead of ending the read.
async fn pump_stdout(
    mut child: Child,
    stdout: ChildStdout,
    slots: SlotSender<Value, StreamError>,
    policy: ParseFailurePolicy,
) {
    let mut lines = BufReader::new(stdout).split(b'\n');

    loop {
        let line = match lines.next_segment().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                slots.fail(StreamError::Io(e)).await;
                return;
            }
        };

        let value = match parse_line(&line) {
            None => {
                trace!("Skipping blank line");
                continue;
            }
            Some(Ok(value)) => value,
            Some(Err(source)) => {
                let line = String::from_utf8_lossy(strip_cr(&line)).into_owned();
                match policy {
                    ParseFailurePolicy::Skip => {
                        warn!(line = %line, error = %source, "Skipping invalid JSON line");
                        continue;
                    }
                    ParseFailurePolicy::Terminate => {
                        slots.fail(StreamError::Parse { line, source }).await;
                        return;
                    }
                }
            }
        };

        if slots.deliver(value).await.is_err() {
            debug!("Consumer dropped the stream, stopping client");
            return;
        }
    }

    slots.close().await;

    match child.wait().await {
        Ok(status) => debug!(status = %status, "Client exited"),
        Err(e) => warn!(error = %e, "Failed to wait for client"),
    }
}

/// Forwards the client's stderr to the log so the pipe never fills up.
///
/// Keeps reading until EOF; closing the pipe early would kill the client on
/// its next write.
async fn drain_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).split(b'\n');
    loop {
        match lines.next_segment().await {
            Ok(Some(line)) => {
                debug!(stderr = %String::from_utf8_lossy(strip_cr(&line)), "Client stderr");
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Stopped reading client stderr");
                break;
            }
        }
    }
}

/// Drops one trailing `\r`, so CRLF counts as a single delimiter.
fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parses one stdout line. Blank lines yield `None`.
fn parse_line(line: &[u8]) -> Option<Result<Value, serde_json::Error>> {
    let line = strip_cr(line);
    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    Some(serde_json::from_slice(line))
}

// ============================================================================
// Tests
// ============================================================================

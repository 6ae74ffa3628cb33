//! IPC bridge: stdin reader and stdout command emitter.
//!
//! A blocking stdin reader thread sends deserialized host events through an
//! mpsc channel, plus a helper to emit JSON-line commands on stdout. stdout
//! carries protocol traffic only; all logging goes to stderr.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc;
use tracing::{debug, error};

use super::{HostCommand, HostEvent};

/// Emit a `HostCommand` as a JSON line on stdout and flush.
pub fn emit(command: &HostCommand) {
    let json = match serde_json::to_string(command) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to serialize command: {}", e);
            return;
        }
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore write/flush errors — pipe may be closed.
    let _ = writeln!(handle, "{}", json);
    let _ = handle.flush();
}

/// Convenience helper for emitting error commands.
pub fn emit_error(message: &str) {
    emit(&HostCommand::Error {
        message: message.to_string(),
    });
}

/// Spawn a blocking thread that reads JSON lines from stdin, deserializes
/// them into `HostEvent`, and forwards them through the returned channel.
///
/// The thread exits when stdin is closed (browser host gone) or on
/// unrecoverable read error.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<HostEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let stdin = io::stdin();
        let reader = stdin.lock();
        for line in reader.lines() {
            match line {
                Ok(text) => {
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<HostEvent>(trimmed) {
                        Ok(event) => {
                            debug!(?event, "Received event from host");
                            if tx.send(event).is_err() {
                                break; // Receiver dropped — main task is gone.
                            }
                        }
                        Err(e) => {
                            error!("Invalid JSON event: {} — input: {}", e, trimmed);
                            emit_error(&format!("Invalid JSON event: {}", e));
                        }
                    }
                }
                Err(e) => {
                    error!("stdin read error: {}", e);
                    break; // stdin closed
                }
            }
        }
        debug!("stdin reader thread exiting");
    });

    rx
}

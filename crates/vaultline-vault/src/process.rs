//! Subprocess execution with a wall-clock limit.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{VaultError, VaultResult};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished command.
#[derive(Debug)]
pub(crate) struct CommandOutput {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl CommandOutput {
    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_owned()
    }
}

/// Run `cmd` to completion, feeding `input` on stdin.
///
/// Output pipes are drained on background threads so a chatty child can
/// never block on a full pipe while we wait on it. When `timeout` elapses
/// the child is killed and reaped. The deadline also bounds collecting the
/// output, since a process the child left behind can hold the pipes open
/// after the child itself has exited.
pub(crate) fn run_with_timeout(
    mut cmd: Command,
    label: &str,
    input: Option<&[u8]>,
    timeout: Duration,
) -> VaultResult<CommandOutput> {
    // An unrepresentable deadline means no limit.
    let deadline = Instant::now().checked_add(timeout);
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            VaultError::BinaryNotFound(cmd.get_program().to_string_lossy().into_owned())
        },
        _ => VaultError::Io(e),
    })?;
    debug!(command = label, pid = child.id(), "spawned vault command");

    if let (Some(bytes), Some(mut stdin)) = (input, child.stdin.take()) {
        // A child that exits without reading stdin closes the pipe first.
        if let Err(e) = stdin.write_all(bytes)
            && e.kind() != io::ErrorKind::BrokenPipe
        {
            kill_and_reap(&mut child);
            return Err(VaultError::Io(e));
        }
    }

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if deadline.is_some_and(|d| Instant::now() >= d) => {
                warn!(command = label, "vault command timed out, killing it");
                kill_and_reap(&mut child);
                return Err(VaultError::Timeout {
                    command: label.to_owned(),
                    timeout_secs: timeout.as_secs(),
                });
            },
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(VaultError::Io(e));
            },
        }
    };

    Ok(CommandOutput {
        status,
        stdout: collect(stdout, deadline, label, timeout)?,
        stderr: collect(stderr, deadline, label, timeout)?,
    })
}

type PipeResult = io::Result<Vec<u8>>;

fn drain<R>(pipe: Option<R>) -> Option<Receiver<PipeResult>>
where
    R: Read + Send + 'static,
{
    pipe.map(|mut reader| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = reader.read_to_end(&mut buf).map(|_| buf);
            // The receiver is gone once the caller gave up waiting.
            let _ = tx.send(result);
        });
        rx
    })
}

/// Wait for a drained pipe, giving up at `deadline`.
fn collect(
    pipe: Option<Receiver<PipeResult>>,
    deadline: Option<Instant>,
    label: &str,
    timeout: Duration,
) -> VaultResult<Vec<u8>> {
    let Some(rx) = pipe else {
        return Ok(Vec::new());
    };
    let received = match deadline {
        Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    match received {
        Ok(result) => result.map_err(VaultError::Io),
        Err(RecvTimeoutError::Timeout) => {
            warn!(command = label, "vault command output still open at deadline");
            Err(VaultError::Timeout {
                command: label.to_owned(),
                timeout_secs: timeout.as_secs(),
            })
        },
        Err(RecvTimeoutError::Disconnected) => Err(VaultError::Io(io::Error::other(
            "output reader thread panicked",
        ))),
    }
}

fn kill_and_reap(child: &mut Child) {
    if let Err(e) = child.kill() {
        debug!(error = %e, "kill failed, child already exited");
    }
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout_and_status() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello; echo oops >&2; exit 3"]);
        let out = run_with_timeout(cmd, "sh", None, Duration::from_secs(10)).unwrap();
        assert_eq!(out.status.code(), Some(3));
        assert_eq!(out.stdout, b"hello\n");
        assert_eq!(out.stderr_text(), "oops");
    }

    #[test]
    fn test_feeds_stdin() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "read line; echo \"got $line\""]);
        let out =
            run_with_timeout(cmd, "sh", Some(b"secret\n"), Duration::from_secs(10)).unwrap();
        assert!(out.status.success());
        assert_eq!(out.stdout, b"got secret\n");
    }

    #[test]
    fn test_timeout_kills_child() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 30"]);
        let started = Instant::now();
        let err = run_with_timeout(cmd, "sleep", None, Duration::from_millis(200)).unwrap_err();
        assert!(matches!(err, VaultError::Timeout { ref command, .. } if command == "sleep"));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_background_process_holding_output_times_out() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "sleep 8 & echo token"]);
        let started = Instant::now();
        let err = run_with_timeout(cmd, "op signin", None, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, VaultError::Timeout { ref command, .. } if command == "op signin"));
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_missing_binary() {
        let cmd = Command::new("/nonexistent/vaultline-op");
        let err = run_with_timeout(cmd, "op", None, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, VaultError::BinaryNotFound(_)));
    }
}

use std::ffi::OsString;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{ReelError, ReelResult};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Per-invocation controls for [`run_tool`].
#[derive(Clone, Debug, Default)]
pub struct RunOpts {
    /// Aborts the child when cancelled.
    pub cancel: CancelToken,
    /// Kill the child once it has run this long.
    pub timeout: Option<Duration>,
}

impl RunOpts {
    /// Options with the given cancel token and an optional deadline in seconds.
    ///
    /// A negative, zero or non-finite deadline is a [`ReelError::Config`].
    pub fn new(cancel: CancelToken, timeout_sec: Option<f64>) -> ReelResult<Self> {
        let timeout = match timeout_sec {
            Some(sec) if sec > 0.0 => Some(Duration::try_from_secs_f64(sec).map_err(|e| {
                ReelError::config(format!("invalid tool deadline {sec}s: {e}"))
            })?),
            Some(sec) => {
                return Err(ReelError::config(format!(
                    "tool deadline must be > 0, got {sec}s"
                )));
            }
            None => None,
        };
        Ok(Self { cancel, timeout })
    }
}

/// Captured result of a tool that ran to completion (successfully or not).
#[derive(Debug)]
pub struct ToolOutput {
    /// Exit status.
    pub status: ExitStatus,
    /// Everything written to stdout.
    pub stdout: Vec<u8>,
    /// Everything written to stderr.
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Stderr decoded lossily and trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// Stdout decoded lossily and trimmed.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }
}

/// Reasons a tool did not produce a [`ToolOutput`].
#[derive(thiserror::Error, Debug)]
pub enum ToolFailure {
    /// The executable could not be started.
    #[error("failed to spawn '{program}' (is it installed and on PATH?): {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        source: std::io::Error,
    },
    /// Waiting on the child or reading its pipes failed.
    #[error("{0}")]
    Io(String),
    /// The cancel token fired; the child was killed.
    #[error("cancelled while '{0}' was running")]
    Cancelled(String),
    /// The deadline elapsed; the child was killed.
    #[error("'{program}' exceeded its {limit_sec:.1}s deadline and was killed")]
    TimedOut {
        /// Program that was killed.
        program: String,
        /// Deadline in seconds.
        limit_sec: f64,
    },
}

impl ToolFailure {
    /// Map into the caller's error kind. Cancellation always stays [`ReelError::Cancelled`].
    pub fn into_reel(self, wrap: impl FnOnce(String) -> ReelError) -> ReelError {
        let msg = self.to_string();
        match self {
            Self::Cancelled(_) => ReelError::cancelled(msg),
            _ => wrap(msg),
        }
    }
}

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drain> {
    pipe.map(|mut p| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            p.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
    })
}

fn join_drain(handle: Option<Drain>, what: &str) -> Result<Vec<u8>, ToolFailure> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| ToolFailure::Io(format!("{what} drain thread panicked")))?
            .map_err(|e| ToolFailure::Io(format!("{what} read failed: {e}"))),
        None => Ok(Vec::new()),
    }
}

fn kill_and_reap(child: &mut Child, stdout: Option<Drain>, stderr: Option<Drain>) {
    if let Err(e) = child.kill() {
        tracing::warn!("failed to kill child process: {e}");
    }
    let _ = child.wait();
    let _ = join_drain(stdout, "stdout");
    let _ = join_drain(stderr, "stderr");
}

/// Run one external tool to completion, capturing stdout and stderr.
///
/// The child is polled rather than waited on so that `opts.cancel` and `opts.timeout` can
/// terminate it. A non-zero exit is *not* an error here; callers inspect
/// [`ToolOutput::status`] and decide.
pub fn run_tool(
    program: &Path,
    args: &[OsString],
    opts: &RunOpts,
) -> Result<ToolOutput, ToolFailure> {
    let name = program.display().to_string();
    if opts.cancel.is_cancelled() {
        return Err(ToolFailure::Cancelled(name));
    }

    tracing::debug!(command = %describe_command(program, args), "spawning tool");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ToolFailure::Spawn {
            program: name.clone(),
            source,
        })?;

    let stdout_drain = drain(child.stdout.take());
    let stderr_drain = drain(child.stderr.take());
    let started = Instant::now();

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                kill_and_reap(&mut child, stdout_drain, stderr_drain);
                return Err(ToolFailure::Io(format!("failed to wait for '{name}': {e}")));
            }
        }
        if opts.cancel.is_cancelled() {
            kill_and_reap(&mut child, stdout_drain, stderr_drain);
            return Err(ToolFailure::Cancelled(name));
        }
        if let Some(limit) = opts.timeout
            && started.elapsed() >= limit
        {
            kill_and_reap(&mut child, stdout_drain, stderr_drain);
            return Err(ToolFailure::TimedOut {
                program: name,
                limit_sec: limit.as_secs_f64(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let stdout = join_drain(stdout_drain, "stdout")?;
    let stderr = join_drain(stderr_drain, "stderr")?;
    tracing::debug!(%status, elapsed_ms = started.elapsed().as_millis() as u64, "tool exited");
    Ok(ToolOutput {
        status,
        stdout,
        stderr,
    })
}

/// Human-readable rendering of a command line, for logs.
pub fn describe_command(program: &Path, args: &[OsString]) -> String {
    let mut out = program.display().to_string();
    for arg in args {
        let s = arg.to_string_lossy();
        out.push(' ');
        if s.is_empty() || s.contains([' ', '\'', '"', ';', '[', ']']) {
            out.push('\'');
            out.push_str(&s.replace('\'', r"'\''"));
            out.push('\'');
        } else {
            out.push_str(&s);
        }
    }
    out
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` can be invoked.
pub fn is_tool_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Remove a partially written output file, ignoring "not found".
pub(crate) fn discard_partial(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(path = %path.display(), "discarded partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "failed to discard partial output: {e}"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/process.rs"]
mod tests;

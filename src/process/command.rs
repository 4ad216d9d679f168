//! Running external tool processes.
//!
//! Tools are started directly, without a shell, so that paths containing
//! spaces or shell metacharacters reach the tool untouched.

use crate::error::{DrainageError, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running process is checked for cancellation and timeout.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Result of executing a process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether the process exited with code 0.
    pub success: bool,

    /// Whether the process was killed because cancellation was requested.
    pub canceled: bool,

    /// Whether the process was killed because it exceeded the timeout.
    pub timed_out: bool,
}

/// Options for process execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Timeout (None = no timeout).
    pub timeout: Option<Duration>,
}

/// Output line from a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Execute a process, collecting its output.
pub fn execute(program: &str, args: &[OsString], options: &CommandOptions) -> Result<CommandResult> {
    execute_streaming(program, args, options, &mut |_| {}, &|| false)
}

/// Execute a process, passing each output line to `callback` as it arrives.
///
/// `is_canceled` is polled while the process runs; once it returns true the
/// process is killed and the result is marked as cancelled.
pub fn execute_streaming(
    program: &str,
    args: &[OsString],
    options: &CommandOptions,
    callback: &mut dyn FnMut(OutputLine),
    is_canceled: &dyn Fn() -> bool,
) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DrainageError::ToolNotFound {
                executable: program.to_string(),
            }
        } else {
            DrainageError::Io(e)
        }
    })?;

    let (tx, rx) = mpsc::channel();

    let stdout_handle = match child.stdout.take() {
        Some(out) => spawn_reader(out, tx.clone(), OutputLine::Stdout),
        None => thread::spawn(String::new),
    };
    let stderr_handle = match child.stderr.take() {
        Some(err) => spawn_reader(err, tx, OutputLine::Stderr),
        None => thread::spawn(String::new),
    };

    let mut canceled = false;
    let mut timed_out = false;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => callback(line),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if !canceled && !timed_out {
            stop_if_requested(
                &mut child,
                program,
                options,
                start,
                is_canceled,
                &mut canceled,
                &mut timed_out,
            );
        }
    }

    // The pipes can close before the process exits.
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if !canceled && !timed_out {
            stop_if_requested(
                &mut child,
                program,
                options,
                start,
                is_canceled,
                &mut canceled,
                &mut timed_out,
            );
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();
    let duration = start.elapsed();

    Ok(CommandResult {
        exit_code: status.code(),
        stdout: stdout_output,
        stderr: stderr_output,
        duration,
        success: status.success() && !canceled && !timed_out,
        canceled,
        timed_out,
    })
}

/// Kill `child` when cancellation was requested or the timeout has passed.
fn stop_if_requested(
    child: &mut Child,
    program: &str,
    options: &CommandOptions,
    start: Instant,
    is_canceled: &dyn Fn() -> bool,
    canceled: &mut bool,
    timed_out: &mut bool,
) {
    if is_canceled() {
        tracing::debug!("killing {} after cancellation", program);
        *canceled = true;
        let _ = child.kill();
    } else if options.timeout.is_some_and(|limit| start.elapsed() >= limit) {
        tracing::debug!("killing {} after timeout", program);
        *timed_out = true;
        let _ = child.kill();
    }
}

fn spawn_reader<R>(
    source: R,
    tx: Sender<OutputLine>,
    wrap: fn(String) -> OutputLine,
) -> thread::JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let reader = BufReader::new(source);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx.send(wrap(line));
        }
        output
    })
}

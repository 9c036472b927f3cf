// src/exec/process.rs

//! Single component process runner.
//!
//! Spawns one command line, routes its output to the spec's sink, waits for
//! termination with no timeout and classifies the outcome. A hung child
//! therefore keeps its executor slot until it exits.
//!
//! On unix every child leads its own process group; dropping the runner
//! future kills the whole group.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result, anyhow};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::result::ProcessExecutionResult;
use crate::exec::sink::{ColorStream, OutputSink, open_log_file};
use crate::exec::spec::ExecutionSpec;

/// Characters that only make sense to a shell.
const SHELL_SYNTAX: &[char] = &[
    '|', '&', ';', '<', '>', '(', ')', '$', '`', '*', '?', '[', ']', '{', '}', '~', '#', '\n',
];

/// Shell builtins and keywords that have no executable of their own.
const SHELL_BUILTINS: &[&str] = &[
    ".", "alias", "break", "case", "cd", "continue", "eval", "exec", "exit", "export", "for",
    "if", "read", "return", "set", "shift", "source", "trap", "ulimit", "umask", "unset",
    "until", "wait", "while",
];

/// How a command line is handed to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run through the platform shell (`sh -c` / `cmd /C`).
    Shell(String),
    /// Plain argv: exec the program directly.
    Direct { program: String, args: Vec<String> },
}

impl Invocation {
    /// Decide how to execute `command_line`.
    ///
    /// Lines using shell syntax, builtins or leading `VAR=value`
    /// assignments go through the shell. Everything else is split with
    /// `shell-words` and executed directly, so a missing program surfaces as
    /// a spawn error instead of a shell exit code 127.
    pub fn parse(command_line: &str) -> Result<Self> {
        let trimmed = command_line.trim();
        if trimmed.contains(SHELL_SYNTAX) {
            return Ok(Invocation::Shell(trimmed.to_string()));
        }

        let mut words = shell_words::split(trimmed)
            .with_context(|| format!("parsing command line `{trimmed}`"))?;
        if words.is_empty() {
            return Err(anyhow!("empty command line"));
        }

        let program = words.remove(0);
        if SHELL_BUILTINS.contains(&program.as_str()) || program.contains('=') {
            return Ok(Invocation::Shell(trimmed.to_string()));
        }

        Ok(Invocation::Direct {
            program,
            args: words,
        })
    }

    fn to_command(&self) -> Command {
        match self {
            Invocation::Shell(line) => {
                if cfg!(windows) {
                    let mut c = Command::new("cmd");
                    c.arg("/C").arg(line);
                    c
                } else {
                    let mut c = Command::new("sh");
                    c.arg("-c").arg(line);
                    c
                }
            }
            Invocation::Direct { program, args } => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
        }
    }
}

/// Run a single component to completion and classify how it ended.
///
/// Never returns an error: anything that prevents the process from being
/// started or awaited becomes [`ProcessExecutionResult::SpawnFailure`].
pub async fn run_process(spec: &ExecutionSpec) -> ProcessExecutionResult {
    info!(
        component = %spec.component_name(),
        cmd = %spec.command(),
        cwd = %spec.working_directory().display(),
        "starting component process"
    );

    match run_process_inner(spec).await {
        Ok(status) => {
            let result = classify_exit_status(status);
            info!(
                component = %spec.component_name(),
                success = result.is_success(),
                outcome = %result,
                "component process terminated"
            );
            result
        }
        Err(err) => {
            warn!(
                component = %spec.component_name(),
                error = %format!("{err:#}"),
                "component process could not be run"
            );
            ProcessExecutionResult::SpawnFailure(format!("{err:#}"))
        }
    }
}

async fn run_process_inner(spec: &ExecutionSpec) -> Result<ExitStatus> {
    let invocation = Invocation::parse(spec.command())?;
    debug!(component = %spec.component_name(), ?invocation, "resolved invocation");

    let mut cmd = invocation.to_command();
    cmd.current_dir(spec.working_directory())
        .stdin(Stdio::null())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    match spec.sink() {
        OutputSink::LogFile(path) => {
            let file = open_log_file(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            let stderr_file = file
                .try_clone()
                .with_context(|| format!("duplicating log file handle {}", path.display()))?;
            cmd.stdout(Stdio::from(file)).stderr(Stdio::from(stderr_file));
        }
        OutputSink::ColorStream(_) => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }

    let mut child = cmd.spawn().with_context(|| {
        format!("spawning process for component '{}'", spec.component_name())
    })?;
    let group = ProcessGroup::of(&child);
    // Release the parent's copies of the log file handles.
    drop(cmd);

    let status = match spec.sink() {
        OutputSink::LogFile(_) => child.wait().await,
        OutputSink::ColorStream(stream) => {
            let stdout = child.stdout.take();
            let stderr = child.stderr.take();

            let (status, _, _) = tokio::join!(
                child.wait(),
                forward_lines(stdout, stream),
                forward_lines(stderr, stream),
            );
            status
        }
    };
    group.release();

    status.with_context(|| {
        format!("waiting for process of component '{}'", spec.component_name())
    })
}

/// Process group of a spawned child.
///
/// If the wait is abandoned (the runner future is dropped on interrupt),
/// the whole group gets `SIGKILL`, so grandchildren started through
/// `sh -c` die together with the shell.
struct ProcessGroup {
    #[cfg(unix)]
    pgid: Option<nix::unistd::Pid>,
}

impl ProcessGroup {
    fn of(child: &tokio::process::Child) -> Self {
        #[cfg(unix)]
        {
            let pgid = child
                .id()
                .and_then(|id| i32::try_from(id).ok())
                .map(nix::unistd::Pid::from_raw);
            Self { pgid }
        }
        #[cfg(not(unix))]
        {
            let _ = child;
            Self {}
        }
    }

    /// The child terminated on its own; leave the group alone.
    fn release(mut self) {
        #[cfg(unix)]
        {
            self.pgid = None;
        }
        #[cfg(not(unix))]
        let _ = &mut self;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        #[cfg(unix)]
        if let Some(pgid) = self.pgid.take() {
            use nix::sys::signal::{Signal, killpg};
            match killpg(pgid, Signal::SIGKILL) {
                Ok(()) => debug!(pgid = pgid.as_raw(), "killed abandoned process group"),
                Err(e) => debug!(pgid = pgid.as_raw(), error = %e, "process group already gone"),
            }
        }
    }
}

/// Copy a child pipe to the color stream line by line until EOF.
///
/// Bytes are decoded lossily so binary noise never stops the forwarding.
async fn forward_lines<R>(pipe: Option<R>, stream: &ColorStream)
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return;
    };

    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                if let Err(e) = stream.write_line(line) {
                    warn!(component = %stream.component(), error = %e, "failed to write output line");
                }
            }
            Err(e) => {
                debug!(component = %stream.component(), error = %e, "output pipe closed with error");
                break;
            }
        }
    }
}

/// Map an OS exit status onto the tagged result.
pub fn classify_exit_status(status: ExitStatus) -> ProcessExecutionResult {
    if let Some(code) = status.code() {
        return ProcessExecutionResult::ExitCode(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ProcessExecutionResult::Signal(signal_name(signal));
        }
    }

    ProcessExecutionResult::SpawnFailure(format!("unrecognised exit status: {status}"))
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    nix::sys::signal::Signal::try_from(signal)
        .map(|s| s.as_str().to_string())
        .unwrap_or_else(|_| format!("signal {signal}"))
}

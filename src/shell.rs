//! # Shell Executor
//!
//! Every side effect `pr-mirror` has on the world goes through this module:
//! the `git` and `gh` command-line tools are run as subprocesses and their
//! exit status decides whether the next step runs.
//!
//! ## Design
//!
//! Commands are described by a [`ShellCommand`] value (program, arguments,
//! working directory, per-call environment overrides) and executed by a
//! [`CommandRunner`]. The trait is the seam that lets tests record the exact
//! command sequence without spawning anything; [`SystemRunner`] is the real
//! implementation backed by `std::process::Command`.
//!
//! The runner exposes three entry points:
//!
//! - [`CommandRunner::run`] captures stdout and returns it trimmed.
//! - [`CommandRunner::run_verbose`] lets the child write straight to the
//!   terminal.
//! - [`CommandRunner::run_sensitive`] captures stdout into a [`Secret`]. The
//!   debug trace and any failure replace the command text and captured output
//!   with [`REDACTED`].
//!
//! Environment overrides are never part of the rendered command text, so a
//! token passed to a child process through its environment cannot reach the
//! logs or an error message.

use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Marker substituted for anything a sensitive invocation could leak.
pub const REDACTED: &str = "[REDACTED]";

/// A single subprocess invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl ShellCommand {
    /// Start describing an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run the command inside `dir` instead of the current directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for this invocation only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Names of the environment overrides, in insertion order.
    pub fn env_keys(&self) -> impl Iterator<Item = &str> {
        self.envs.iter().map(|(key, _)| key.as_str())
    }

    /// Value of an environment override, if set.
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    fn to_std(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.cwd {
            command.current_dir(dir);
        }
        command.envs(
            self.envs
                .iter()
                .map(|(key, value)| (OsStr::new(key), OsStr::new(value))),
        );
        command
    }
}

impl fmt::Display for ShellCommand {
    /// Renders the command line with shell quoting. Environment overrides are
    /// left out.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let argv = self.argv();
        match shlex::try_join(argv.iter().copied()) {
            Ok(line) => f.write_str(&line),
            Err(_) => f.write_str(&argv.join(" ")),
        }
    }
}

impl fmt::Debug for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellCommand")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("cwd", &self.cwd)
            .field("env", &self.env_keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Output of a sensitive invocation. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", REDACTED)
    }
}

/// Runs [`ShellCommand`]s - allows mocking in tests
pub trait CommandRunner {
    /// Run `command` with captured output and return its trimmed stdout.
    fn run(&self, command: &ShellCommand) -> Result<String>;

    /// Run `command` with stdio inherited from this process.
    fn run_verbose(&self, command: &ShellCommand) -> Result<()>;

    /// Run `command` with captured output, treating the command line and
    /// everything it prints as confidential.
    fn run_sensitive(&self, command: &ShellCommand) -> Result<Secret>;
}

/// The default implementation of [`CommandRunner`], which spawns real
/// processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ShellCommand) -> Result<String> {
        Trace::Plain.capture(command)
    }

    fn run_verbose(&self, command: &ShellCommand) -> Result<()> {
        debug!("Executing: {}", command);
        let status = command
            .to_std()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Trace::Plain.spawn_failure(command, &e))?;

        if !status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                reason: status.to_string(),
                stdout: None,
                stderr: None,
            });
        }
        Ok(())
    }

    fn run_sensitive(&self, command: &ShellCommand) -> Result<Secret> {
        Trace::Redacted.capture(command).map(Secret)
    }
}

/// How much of an invocation may appear in traces and errors.
#[derive(Clone, Copy)]
enum Trace {
    Plain,
    Redacted,
}

impl Trace {
    fn capture(self, command: &ShellCommand) -> Result<String> {
        debug!("Executing: {}", self.describe(command));
        let output = command
            .to_std()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_failure(command, &e))?;

        if !output.status.success() {
            return Err(self.exit_failure(command, &output));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn describe(self, command: &ShellCommand) -> String {
        match self {
            Trace::Plain => command.to_string(),
            Trace::Redacted => REDACTED.to_string(),
        }
    }

    fn scrub(self, bytes: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(bytes);
        match self {
            _ if text.trim().is_empty() => None,
            Trace::Plain => Some(text.into_owned()),
            Trace::Redacted => Some(REDACTED.to_string()),
        }
    }

    fn spawn_failure(self, command: &ShellCommand, error: &io::Error) -> Error {
        Error::CommandFailed {
            command: self.describe(command),
            reason: format!("failed to start: {}", error),
            stdout: None,
            stderr: None,
        }
    }

    fn exit_failure(self, command: &ShellCommand, output: &Output) -> Error {
        Error::CommandFailed {
            command: self.describe(command),
            reason: output.status.to_string(),
            stdout: self.scrub(&output.stdout),
            stderr: self.scrub(&output.stderr),
        }
    }
}

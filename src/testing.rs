//! Test doubles shared by the unit tests.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::shell::{CommandRunner, Secret, ShellCommand};

/// Which runner entry point a call went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Capture,
    Verbose,
    Sensitive,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub mode: Mode,
    pub command: ShellCommand,
}

impl Call {
    /// Arguments joined with single spaces, without any quoting.
    pub fn line(&self) -> String {
        self.command.argv().join(" ")
    }
}

/// Records every command instead of running it.
///
/// Captured calls return the output registered for the longest matching argv
/// prefix, or an empty string. Calls matching a registered failure prefix
/// return `Error::CommandFailed`. `git clone` creates its target directory so
/// workspace cleanup has something to remove.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Call>>,
    responses: Vec<(Vec<String>, String)>,
    failures: Vec<Vec<String>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner answering the auth queries and the branch lookup the way a
    /// logged-in `gh` and a fresh mirror clone would.
    pub fn authenticated(username: &str, branch: &str) -> Self {
        Self::new()
            .respond(&["gh", "auth", "token"], "ghp_testtoken")
            .respond(&["gh", "api", "user"], username)
            .respond(&["git", "rev-parse"], branch)
    }

    pub fn respond(mut self, prefix: &[&str], output: &str) -> Self {
        self.responses.push((owned(prefix), output.to_string()));
        self
    }

    pub fn fail_on(mut self, prefix: &[&str]) -> Self {
        self.failures.push(owned(prefix));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::line).collect()
    }

    /// Lines of the calls whose program is `program`.
    pub fn lines_for(&self, program: &str) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|call| call.command.program() == program)
            .map(Call::line)
            .collect()
    }

    fn record(&self, mode: Mode, command: &ShellCommand) -> Result<String> {
        self.calls.borrow_mut().push(Call {
            mode,
            command: command.clone(),
        });

        let argv = command.argv();
        if let (["git", "clone", .., target], Some(cwd)) = (argv.as_slice(), command.cwd()) {
            std::fs::create_dir_all(cwd.join(target))?;
        }
        if self.failures.iter().any(|prefix| matches(&argv, prefix)) {
            return Err(Error::CommandFailed {
                command: argv.join(" "),
                reason: "exit status: 1".to_string(),
                stdout: None,
                stderr: Some("simulated failure".to_string()),
            });
        }

        Ok(self
            .responses
            .iter()
            .filter(|(prefix, _)| matches(&argv, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, output)| output.clone())
            .unwrap_or_default())
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ShellCommand) -> Result<String> {
        self.record(Mode::Capture, command)
    }

    fn run_verbose(&self, command: &ShellCommand) -> Result<()> {
        self.record(Mode::Verbose, command).map(|_| ())
    }

    fn run_sensitive(&self, command: &ShellCommand) -> Result<Secret> {
        self.record(Mode::Sensitive, command).map(Secret::new)
    }
}

fn owned(prefix: &[&str]) -> Vec<String> {
    prefix.iter().map(|part| part.to_string()).collect()
}

fn matches(argv: &[&str], prefix: &[String]) -> bool {
    argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, p)| *a == p.as_str())
}

//! CLI argument parsing and invocation dispatch

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use log::{Level, LevelFilter};

use pr_mirror::orchestrator::{self, Outcome};
use pr_mirror::output::{OutputConfig, Status};
use pr_mirror::prompt::StdinPrompter;
use pr_mirror::request::{RequestInputs, DEFAULT_BASE};
use pr_mirror::shell::SystemRunner;
use pr_mirror::workspace::Workspace;

/// Optional file of `KEY=value` defaults, read from the current directory.
pub const ENV_FILE: &str = ".env";

const EXAMPLES: &str = "\
Environment Variables (also read from ./.env):
  DEFAULT_ORG      Default GitHub organization
  DEFAULT_REPO     Default repository name
  DEFAULT_BASE     Default base branch
  DEBUG            Set to 'true' for verbose logging

Examples:
  # Mirror a new PR
  prmirror -n 123 -b main -o myorg -r myrepo

  # Sync an existing mirrored PR
  prmirror -n 123 -b main -o myorg -r myrepo -s

  # With DEFAULT_ORG, DEFAULT_REPO and DEFAULT_BASE exported
  prmirror -n 123";

/// PR Mirror - Mirror a fork pull request into a first-party tracking branch
#[derive(Parser, Debug)]
#[command(name = "prmirror")]
#[command(version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Base branch the companion PR targets
    #[arg(short, long, value_name = "BRANCH", env = "DEFAULT_BASE", default_value = DEFAULT_BASE)]
    base: String,

    /// PR number to mirror (required)
    #[arg(short, long, value_name = "NUMBER", allow_negative_numbers = true)]
    number: Option<i64>,

    /// GitHub organization
    #[arg(short, long, value_name = "ORG", env = "DEFAULT_ORG")]
    org: Option<String>,

    /// GitHub repository name
    #[arg(short, long, value_name = "REPO", env = "DEFAULT_REPO")]
    repo: Option<String>,

    /// Sync an existing mirror branch instead of creating one
    #[arg(short, long)]
    sync: bool,

    /// Remove the mirror-repo workspace and exit
    #[arg(short, long)]
    clean: bool,

    /// Remove the mirror-repo workspace after the action
    #[arg(short = 'd', long = "deleteAfterAction", visible_alias = "delete-after-action")]
    delete_after_action: bool,

    /// Show the resolved request and ask for confirmation first
    #[arg(short, long)]
    verify: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto", value_parser = ["auto", "always", "never"])]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    /// Execute the invocation and map its result to an exit code
    pub fn execute(self) -> ExitCode {
        if let Some(shell) = self.completions {
            clap_complete::generate(shell, &mut Cli::command(), "prmirror", &mut io::stdout());
            return ExitCode::SUCCESS;
        }

        init_logging(self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        let workspace = match Workspace::in_current_dir() {
            Ok(workspace) => workspace,
            Err(err) => return report_error(&output, &err),
        };

        let result = orchestrator::execute(
            self.inputs(),
            &SystemRunner,
            &workspace,
            &mut StdinPrompter,
        );

        match result {
            Ok(outcome) => {
                report_outcome(&output, &outcome, &workspace);
                ExitCode::SUCCESS
            }
            Err(err) => report_error(&output, &err),
        }
    }

    /// Flag values with environment fallbacks already applied by clap.
    fn inputs(&self) -> RequestInputs {
        RequestInputs {
            base: self.base.clone(),
            number: self.number,
            org: self.org.clone().unwrap_or_default(),
            repo: self.repo.clone().unwrap_or_default(),
            sync: self.sync,
            verify: self.verify,
            clean: self.clean,
            delete_after_action: self.delete_after_action,
        }
    }
}

/// Print a clap error and pick the exit code.
///
/// Help and version requests succeed; every real parse failure exits 1.
pub fn report_parse_error(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report_outcome(output: &OutputConfig, outcome: &Outcome, workspace: &Workspace) {
    let line = match outcome {
        Outcome::Cleaned { removed: true } => output.status(
            Status::Success,
            &format!("Removed workspace {}", workspace.path().display()),
        ),
        Outcome::Cleaned { removed: false } => output.status(
            Status::Info,
            &format!("No workspace to remove at {}", workspace.path().display()),
        ),
        Outcome::Declined => output.status(Status::Info, "Aborted. No changes were made."),
        Outcome::Mirrored { branch } => output.status(
            Status::Success,
            &format!("Success! Mirrored into {} and opened a pull request.", branch),
        ),
        Outcome::Synced { branch } => {
            output.status(Status::Success, &format!("Success! Synced {}.", branch))
        }
    };
    println!("\n{}", line);
}

fn report_error(output: &OutputConfig, err: &pr_mirror::error::Error) -> ExitCode {
    eprintln!("\n{}", output.status(Status::Failure, &format!("Error: {}", err)));
    if err.is_usage() {
        eprintln!("\n{}", Cli::command().render_help());
    }
    ExitCode::FAILURE
}

/// Load `path` into the process environment.
///
/// A missing file is ignored. Variables already set in the environment keep
/// their values.
pub fn load_env_file(path: &Path) -> Result<(), dotenvy::Error> {
    match dotenvy::from_path(path) {
        Err(err) if err.not_found() => Ok(()),
        result => result,
    }
}

/// Whether the `DEBUG=true` switch is set.
fn debug_enabled() -> bool {
    std::env::var("DEBUG").is_ok_and(|v| v.eq_ignore_ascii_case("true"))
}

fn init_logging(level: LevelFilter) {
    let level = if debug_enabled() {
        level.max(LevelFilter::Debug)
    } else {
        level
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Warn => writeln!(buf, "warning: {}", record.args()),
            Level::Error => writeln!(buf, "error: {}", record.args()),
            Level::Debug | Level::Trace => writeln!(buf, "[DEBUG] {}", record.args()),
        })
        .try_init();
}

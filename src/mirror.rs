//! Mirror and Sync operations
//!
//! Both operations start from a fresh clone of the target repository in the
//! workspace and fetch the source pull request's head into the local branch
//! `pr-temp`. They then differ only in how the mirror branch is produced:
//!
//! - [`mirror`] creates `mirror/pr-<n>` from the PR head and pushes it with
//!   upstream tracking.
//! - [`sync`] checks out the existing `mirror/pr-<n>`, hard-resets it to the
//!   PR head and force-pushes it.
//!
//! Each step is one `git` invocation; the first failure aborts the rest and
//! leaves the workspace as it is for the next run's cleanup.

use std::path::PathBuf;

use log::info;

use crate::error::Result;
use crate::request::MirrorRequest;
use crate::shell::{CommandRunner, ShellCommand};
use crate::workspace::{Workspace, WORKSPACE_DIR};

/// Local branch the PR head is fetched into.
pub const TEMP_BRANCH: &str = "pr-temp";

/// SSH remote of `org/repo` on GitHub.
pub fn remote_url(org: &str, repo: &str) -> String {
    format!("git@github.com:{}/{}", org, repo)
}

/// Name of the tracking branch for PR `number`.
pub fn mirror_branch(number: u64) -> String {
    format!("mirror/pr-{}", number)
}

/// Message of the empty commit added when a mirror is created.
pub fn tracking_message(number: u64) -> String {
    format!("chore: mirror pr-{}", number)
}

/// Message of the empty commit added when a mirror is re-synced.
pub fn sync_message(number: u64) -> String {
    format!("chore: mirror pr-{} (sync)", number)
}

/// Create `mirror/pr-<n>` from the PR head and push it.
pub fn mirror(
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    request: &MirrorRequest,
) -> Result<()> {
    let git = prepare(runner, workspace, request)?;
    let branch = mirror_branch(request.number);

    info!("Creating mirror branch...");
    runner.run_verbose(&git.command(["checkout", TEMP_BRANCH]))?;
    runner.run_verbose(&git.command(["checkout", "-b", branch.as_str()]))?;

    info!("Creating tracking commit...");
    runner.run_verbose(&git.commit(&tracking_message(request.number)))?;
    runner.run_verbose(&git.command(["push", "-u", "origin", branch.as_str()]))?;

    Ok(())
}

/// Reset the existing `mirror/pr-<n>` to the current PR head and force-push.
pub fn sync(
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    request: &MirrorRequest,
) -> Result<()> {
    let git = prepare(runner, workspace, request)?;
    let branch = mirror_branch(request.number);

    info!("Checking out {}...", branch);
    runner.run_verbose(&git.command(["checkout", branch.as_str()]))?;

    info!("Resetting branch to match PR head...");
    runner.run_verbose(&git.command(["reset", "--hard", TEMP_BRANCH]))?;

    info!("Creating sync commit...");
    runner.run_verbose(&git.commit(&sync_message(request.number)))?;

    info!("Force-pushing changes...");
    runner.run_verbose(&git.command(["push", "-f", "origin", branch.as_str()]))?;

    Ok(())
}

/// Steps shared by both operations: clean, clone, fetch the PR head.
fn prepare(
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    request: &MirrorRequest,
) -> Result<Git> {
    workspace.cleanup()?;

    info!("Cloning repository {}...", request.slug());
    let url = remote_url(&request.org, &request.repo);
    let clone = ShellCommand::new("git")
        .args(["clone", url.as_str(), WORKSPACE_DIR])
        .current_dir(workspace.base());
    runner.run_verbose(&clone)?;

    let git = Git::in_workspace(workspace);
    info!("Fetching PR #{}...", request.number);
    let refspec = format!("pull/{}/head:{}", request.number, TEMP_BRANCH);
    runner.run_verbose(&git.command(["fetch", "origin", refspec.as_str()]))?;

    Ok(git)
}

/// Builds `git` invocations that run inside the clone.
struct Git {
    dir: PathBuf,
}

impl Git {
    fn in_workspace(workspace: &Workspace) -> Self {
        Self {
            dir: workspace.path(),
        }
    }

    fn command<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> ShellCommand {
        ShellCommand::new("git").args(args).current_dir(&self.dir)
    }

    /// Empty, signed-off and GPG-signed commit.
    fn commit(&self, message: &str) -> ShellCommand {
        self.command(["commit", "--allow-empty", "-sS", "-m", message])
    }
}

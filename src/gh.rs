//! The `gh` command-line client: presence check and pull request creation.

use log::info;

use crate::auth::AuthIdentity;
use crate::error::Result;
use crate::request::MirrorRequest;
use crate::shell::{CommandRunner, ShellCommand};
use crate::workspace::Workspace;

/// Name of the review-tool binary looked up on `PATH`.
pub const GH: &str = "gh";

/// Whether `gh` can be found on `PATH`.
///
/// A failed lookup means "not installed" and is never an error.
pub fn is_installed(runner: &dyn CommandRunner) -> bool {
    runner.run(&ShellCommand::new("which").arg(GH)).is_ok()
}

/// Title of the companion pull request for PR `number`.
pub fn pr_title(number: u64) -> String {
    format!("chore: Mirror PR-{}", number)
}

/// Open a pull request from the branch checked out in the workspace against
/// `request.base`, assigned to the authenticated reviewer.
pub fn create_pr(
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    request: &MirrorRequest,
    auth: &AuthIdentity,
) -> Result<()> {
    let dir = workspace.path();
    let head = runner.run(
        &ShellCommand::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(&dir),
    )?;

    info!("Creating pull request {} -> {}...", head, request.base);
    let create = ShellCommand::new(GH)
        .args(["pr", "create", "-a", auth.username.as_str()])
        .args(["-B", request.base.as_str(), "--fill-verbose"])
        .args(["-H", head.as_str()])
        .args(["-R", request.slug().as_str()])
        .args(["-t", pr_title(request.number).as_str()])
        .current_dir(&dir);

    runner.run_verbose(&auth.apply(create))
}

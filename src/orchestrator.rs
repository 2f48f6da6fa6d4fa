//! Orchestrator for a complete invocation
//!
//! This module sequences one run of the tool, from resolved inputs to a final
//! [`Outcome`]:
//!
//! 1. `--clean`: remove the workspace and stop. Nothing is validated.
//! 2. Validate the inputs (number, `gh` availability, org, repo).
//! 3. `--verify`: show the request and wait for confirmation.
//! 4. Resolve the reviewer identity through `gh`.
//! 5. Dispatch to Sync, or to Mirror followed by PR creation.
//! 6. `--deleteAfterAction`: remove the workspace, whether or not step 5
//!    succeeded.
//!
//! Every failure is returned as an [`Error`]; mapping outcomes and errors to
//! exit codes is left to the binary.

use log::{debug, warn};

use crate::auth::{self, AuthIdentity};
use crate::error::Result;
use crate::gh;
use crate::mirror;
use crate::prompt::Prompter;
use crate::request::{MirrorRequest, RequestInputs};
use crate::shell::CommandRunner;
use crate::workspace::Workspace;

/// How an invocation ended without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `--clean` ran; `removed` is false when there was nothing to delete.
    Cleaned { removed: bool },
    /// The user did not confirm the verify prompt. Nothing was changed.
    Declined,
    /// A new mirror branch was pushed and its pull request opened.
    Mirrored { branch: String },
    /// The existing mirror branch was reset and force-pushed.
    Synced { branch: String },
}

/// Execute one invocation.
pub fn execute(
    inputs: RequestInputs,
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    if inputs.clean {
        let removed = workspace.cleanup()?;
        return Ok(Outcome::Cleaned { removed });
    }

    let request = inputs.validate(|| gh::is_installed(runner))?;
    debug!("Resolved request: {:?}", request);

    if request.verify && !prompter.confirm(&request)? {
        return Ok(Outcome::Declined);
    }

    let identity = auth::resolve(runner)?;
    debug!("Authenticated as {}", identity.username);

    let result = dispatch(runner, workspace, &request, &identity);

    if request.delete_after_action {
        finish_cleanup(workspace, result)
    } else {
        result
    }
}

fn dispatch(
    runner: &dyn CommandRunner,
    workspace: &Workspace,
    request: &MirrorRequest,
    identity: &AuthIdentity,
) -> Result<Outcome> {
    let branch = mirror::mirror_branch(request.number);
    if request.sync {
        mirror::sync(runner, workspace, request)?;
        Ok(Outcome::Synced { branch })
    } else {
        mirror::mirror(runner, workspace, request)?;
        gh::create_pr(runner, workspace, request, identity)?;
        Ok(Outcome::Mirrored { branch })
    }
}

/// Remove the workspace after the action. The action's own error takes
/// precedence over a cleanup failure.
fn finish_cleanup(workspace: &Workspace, result: Result<Outcome>) -> Result<Outcome> {
    match (workspace.cleanup(), result) {
        (Ok(_), result) => result,
        (Err(cleanup), Ok(_)) => Err(cleanup),
        (Err(cleanup), Err(action)) => {
            warn!("{}", cleanup);
            Err(action)
        }
    }
}

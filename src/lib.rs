//! # PR Mirror Library
//!
//! This library mirrors a pull request opened from a fork into a first-party
//! tracking branch `mirror/pr-<number>` of the same repository, opens a
//! companion pull request for it, and re-syncs that branch when the source
//! pull request changes. It is used by the `prmirror` command-line tool.
//!
//! All of the work is done by the `git` and `gh` command-line tools; this crate
//! only decides which commands to run, in which order, and stops at the first
//! one that fails.
//!
//! ## Core Concepts
//!
//! - **Shell Executor (`shell`)**: runs subprocesses through the
//!   [`shell::CommandRunner`] trait, with a separate entry point for commands
//!   whose output is a credential.
//! - **Workspace (`workspace`)**: the `mirror-repo` clone under the current
//!   directory.
//! - **Authentication (`auth`)**: the reviewer identity reported by `gh`.
//! - **Operations (`mirror`, `gh`)**: Mirror, Sync and PR Creation.
//! - **Requests (`request`, `prompt`)**: validated inputs and the optional
//!   confirmation step.
//! - **Orchestrator (`orchestrator`)**: one full invocation, returning an
//!   [`orchestrator::Outcome`] or the first error.
//!
//! ## Execution Flow
//!
//! 1. Validate the request and check that `gh` is installed.
//! 2. Optionally ask the user to confirm.
//! 3. Resolve the `gh` token and login.
//! 4. Either clone, fetch, branch, commit and push a new mirror branch, then
//!    open its pull request; or clone, fetch, reset and force-push the
//!    existing one.
//! 5. Optionally remove the workspace.

pub mod auth;
pub mod error;
pub mod gh;
pub mod mirror;
pub mod orchestrator;
pub mod output;
pub mod prompt;
pub mod request;
pub mod shell;
pub mod workspace;

#[cfg(test)]
mod testing;

//! Authentication Resolver
//!
//! The reviewer identity comes from whoever is logged in to the `gh` CLI. It
//! is resolved fresh for every invocation and handed to the calls that need
//! it as an [`AuthIdentity`] value; nothing is written to the process
//! environment.

use crate::error::Result;
use crate::shell::{CommandRunner, Secret, ShellCommand};

/// Environment variable the token is exposed under to `gh` children.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable the login handle is exposed under to `gh` children.
pub const USERNAME_ENV: &str = "GITHUB_UNAME";

/// The authenticated reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub token: Secret,
    pub username: String,
}

impl AuthIdentity {
    /// Scope the credentials to a single invocation.
    pub fn apply(&self, command: ShellCommand) -> ShellCommand {
        command
            .env(TOKEN_ENV, self.token.expose())
            .env(USERNAME_ENV, self.username.as_str())
    }
}

/// Query `gh` for the current token and login.
///
/// The token query runs through [`CommandRunner::run_sensitive`], so a failure
/// there never reveals what `gh` printed.
pub fn resolve(runner: &dyn CommandRunner) -> Result<AuthIdentity> {
    let token = runner.run_sensitive(&ShellCommand::new("gh").args(["auth", "token"]))?;
    let username = runner.run(&ShellCommand::new("gh").args(["api", "user", "--jq", ".login"]))?;
    Ok(AuthIdentity { token, username })
}

//! Request values for a single invocation.
//!
//! [`RequestInputs`] holds what the command line and the environment supplied,
//! unchecked. [`RequestInputs::validate`] turns it into a [`MirrorRequest`],
//! whose fields are guaranteed to be usable by the git and gh operations.

use crate::error::{Error, Result};

/// Base branch used when neither `--base` nor `DEFAULT_BASE` is given.
pub const DEFAULT_BASE: &str = "main";

/// Environment fallback for `--base`.
pub const BASE_ENV: &str = "DEFAULT_BASE";
/// Environment fallback for `--org`.
pub const ORG_ENV: &str = "DEFAULT_ORG";
/// Environment fallback for `--repo`.
pub const REPO_ENV: &str = "DEFAULT_REPO";

/// Flag and environment values after fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInputs {
    pub base: String,
    pub number: Option<i64>,
    pub org: String,
    pub repo: String,
    pub sync: bool,
    pub verify: bool,
    pub clean: bool,
    pub delete_after_action: bool,
}

impl Default for RequestInputs {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            number: None,
            org: String::new(),
            repo: String::new(),
            sync: false,
            verify: false,
            clean: false,
            delete_after_action: false,
        }
    }
}

impl RequestInputs {
    /// Check the inputs in the order a user would fix them.
    ///
    /// `tool_present` is only consulted once the PR number is known to be
    /// valid, so an invalid number never triggers a subprocess.
    pub fn validate(self, tool_present: impl FnOnce() -> bool) -> Result<MirrorRequest> {
        if self.base.trim().is_empty() {
            return Err(Error::usage("BASE branch is required"));
        }

        let number = match self.number {
            Some(n) if n > 0 => n.unsigned_abs(),
            _ => {
                return Err(Error::usage(
                    "PR Number is required and must be greater than 0",
                ))
            }
        };

        if !tool_present() {
            return Err(Error::usage("The github cli tool 'gh' must be installed"));
        }

        if self.org.trim().is_empty() {
            return Err(Error::usage("Organization is required"));
        }

        if self.repo.trim().is_empty() {
            return Err(Error::usage("Repository is required"));
        }

        Ok(MirrorRequest {
            base: self.base,
            number,
            org: self.org,
            repo: self.repo,
            sync: self.sync,
            verify: self.verify,
            clean: self.clean,
            delete_after_action: self.delete_after_action,
        })
    }
}

/// A validated request: `number > 0`, `base`, `org` and `repo` non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    pub base: String,
    pub number: u64,
    pub org: String,
    pub repo: String,
    pub sync: bool,
    pub verify: bool,
    pub clean: bool,
    pub delete_after_action: bool,
}

impl MirrorRequest {
    /// `org/repo`, the form `gh -R` expects.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    /// Human-readable name of the action this request dispatches to.
    pub fn mode(&self) -> &'static str {
        if self.sync {
            "sync"
        } else {
            "mirror"
        }
    }
}

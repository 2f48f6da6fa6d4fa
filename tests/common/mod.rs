//! Shared test utilities for the end-to-end tests.
//!
//! The binary only ever talks to `git`, `gh` and `which`, so these tests put
//! small shell stand-ins for those tools first on `PATH`. Every stub appends
//! the arguments it was called with to a log file, which the tests read back
//! to check which commands ran and in which order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! #[serial]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.command().args(["-n", "42", "-o", "Org", "-r", "Repo"]).assert().success();
//!     assert_eq!(fixture.calls()[0], "which gh");
//! }
//! ```

#![allow(dead_code)]

use assert_fs::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;
    pub use serial_test::serial;

    pub use super::stubs;
    pub use super::TestFixture;
}

/// Token printed by the `gh auth token` stub.
pub const STUB_TOKEN: &str = "ghp_stubtoken0123456789";

/// Login printed by the `gh api user` stub.
pub const STUB_USER: &str = "someuser";

/// Shell stand-ins for the external tools.
pub mod stubs {
    /// `git`: logs its arguments, creates the clone target and answers
    /// `rev-parse` with `$PRM_STUB_BRANCH`.
    pub const GIT: &str = r#"#!/bin/sh
printf 'git %s\n' "$*" >> "$PRM_STUB_LOG"
if [ "$PRM_STUB_FAIL" = "git $1" ]; then
  echo "stub failure: git $*" >&2
  exit 1
fi
case "$1" in
  clone) mkdir -p "$3" ;;
  rev-parse) echo "${PRM_STUB_BRANCH:-mirror/pr-42}" ;;
esac
exit 0
"#;

    /// `gh`: logs its arguments, prints a token and a login, and records the
    /// credentials it was given when creating a pull request.
    pub const GH: &str = r#"#!/bin/sh
printf 'gh %s\n' "$*" >> "$PRM_STUB_LOG"
if [ "$PRM_STUB_FAIL" = "gh $1" ]; then
  echo "ghp_leakedsecret"
  echo "ghp_leakedsecret" >&2
  exit 1
fi
case "$1" in
  auth) echo "ghp_stubtoken0123456789" ;;
  api) echo "someuser" ;;
  pr) printf 'env GITHUB_TOKEN=%s GITHUB_UNAME=%s\n' "$GITHUB_TOKEN" "$GITHUB_UNAME" >> "$PRM_STUB_LOG" ;;
esac
exit 0
"#;

    /// `which`: logs its arguments and defers to the shell builtin.
    pub const WHICH: &str = r#"#!/bin/sh
printf 'which %s\n' "$*" >> "$PRM_STUB_LOG"
command -v "$1"
"#;
}

/// A temporary working directory plus a `bin/` directory of tool stubs.
///
/// The binary runs with the working directory as its current directory, so
/// the workspace it manages is `<work>/mirror-repo`.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture with `git`, `gh` and `which` stubs installed.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        for dir in ["work", "bin", "bin-no-gh"] {
            fixture.temp_dir.child(dir).create_dir_all().unwrap();
        }
        fixture.install("bin", "git", stubs::GIT);
        fixture.install("bin", "gh", stubs::GH);
        fixture.install("bin", "which", stubs::WHICH);
        fixture.install("bin-no-gh", "which", stubs::WHICH);
        fixture
    }

    fn install(&self, dir: &str, name: &str, script: &str) {
        let child = self.temp_dir.child(dir).child(name);
        child.write_str(script).expect("Failed to write stub");
        make_executable(child.path());
    }

    /// Directory the binary runs in.
    pub fn work_dir(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    /// The `mirror-repo` workspace inside the working directory.
    pub fn workspace(&self) -> PathBuf {
        self.work_dir().join("mirror-repo")
    }

    /// Create a workspace with some content in it, as a previous run would.
    pub fn with_workspace(self) -> Self {
        let git_dir = self.workspace().join(".git");
        fs::create_dir_all(&git_dir).unwrap();
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n").unwrap();
        self
    }

    fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("calls.log")
    }

    /// Every stub invocation so far, one line each.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Invocations of one tool.
    pub fn calls_to(&self, tool: &str) -> Vec<String> {
        let prefix = format!("{} ", tool);
        self.calls()
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect()
    }

    /// Create a command for the binary with the stubs first on `PATH`.
    ///
    /// Ambient defaults that would change the outcome are removed, and
    /// colour is disabled so status markers are plain text.
    pub fn command(&self) -> assert_cmd::Command {
        let system_path = std::env::var("PATH").unwrap_or_default();
        let path = format!("{}:{}", self.temp_dir.path().join("bin").display(), system_path);
        self.command_with_path(path)
    }

    /// Create a command whose `PATH` holds only a `which` stub, so `gh`
    /// cannot be found.
    pub fn command_without_gh(&self) -> assert_cmd::Command {
        let path = self.temp_dir.path().join("bin-no-gh").display().to_string();
        self.command_with_path(path)
    }

    fn command_with_path(&self, path: String) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("prmirror");
        cmd.current_dir(self.work_dir())
            .env("PATH", path)
            .env("PRM_STUB_LOG", self.log_path())
            .env("NO_COLOR", "1")
            .env_remove("DEFAULT_BASE")
            .env_remove("DEFAULT_ORG")
            .env_remove("DEFAULT_REPO")
            .env_remove("DEBUG")
            .env_remove("RUST_LOG")
            .env_remove("PRM_STUB_FAIL")
            .env_remove("PRM_STUB_BRANCH");
        cmd
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path inside the fixture's temporary directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

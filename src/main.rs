//! # PR Mirror CLI
//!
//! This is the binary entry point for the `prmirror` command-line tool.
//!
//! Its primary responsibilities are:
//! - Loading `DEFAULT_*` values from a `.env` file in the current directory.
//! - Parsing command-line arguments using `clap`.
//! - Initialising logging.
//! - Running the invocation and translating its outcome or error into output
//!   and an exit code.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    if let Err(err) = cli::load_env_file(Path::new(cli::ENV_FILE)) {
        eprintln!("error: failed to load {}: {}", cli::ENV_FILE, err);
        return ExitCode::FAILURE;
    }

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return cli::report_parse_error(&err),
    };
    cli.execute()
}

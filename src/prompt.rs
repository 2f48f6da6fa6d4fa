//! Verify confirmation.
//!
//! With `--verify` the resolved request is printed and the user must answer
//! `y` or `yes` (any case, surrounding whitespace ignored) before anything is
//! cloned or pushed. Every other answer, including an empty line or end of
//! input, declines. There is no timeout on the wait.

use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::request::MirrorRequest;

/// Asks the user to confirm a request - allows scripting answers in tests
pub trait Prompter {
    fn confirm(&mut self, request: &MirrorRequest) -> Result<bool>;
}

/// Whether `answer` counts as a yes.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

/// Print the request summary to `output` and read one answer line from
/// `input`.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    request: &MirrorRequest,
) -> io::Result<bool> {
    writeln!(output, "About to {} with:", request.mode())?;
    writeln!(output, "  base:   {}", request.base)?;
    writeln!(output, "  number: {}", request.number)?;
    writeln!(output, "  org:    {}", request.org)?;
    writeln!(output, "  repo:   {}", request.repo)?;
    write!(output, "\nProceed? (y/N): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// Prompts on the process's terminal.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&mut self, request: &MirrorRequest) -> Result<bool> {
        confirm_with(&mut io::stdin().lock(), &mut io::stdout(), request)
            .map_err(|source| Error::Prompt { source })
    }
}

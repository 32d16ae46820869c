//! Operator confirmation prompts
//!
//! The publisher asks twice at most: whether to continue after tag creation
//! fails, and whether to overwrite an already-published version.

use crate::core::error::{PublishError, PublishResult};
use std::io::{self, BufRead, Write};

/// Source of yes/no answers
pub trait Prompter {
  /// Show `prompt`, return true only for an explicit yes
  fn confirm(&mut self, prompt: &str) -> PublishResult<bool>;
}

/// Prompter reading answers from a line-oriented reader (stdin in production)
///
/// The terminal stays in cooked mode, so an answer is a whole line rather than
/// a single keypress. Only its first character is looked at, and the newline
/// the terminal echoes is supplied by hand when input ends without one.
pub struct LinePrompter<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }
}

impl LinePrompter<io::StdinLock<'static>, io::Stdout> {
  /// Prompter bound to the process's stdin and stdout
  pub fn stdio() -> Self {
    Self::new(io::stdin().lock(), io::stdout())
  }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
  fn confirm(&mut self, prompt: &str) -> PublishResult<bool> {
    write!(self.output, "{} [y/N] ", prompt)?;
    self.output.flush()?;

    let mut answer = String::new();
    let read = self.input.read_line(&mut answer)?;
    if read == 0 || !answer.ends_with('\n') {
      // No newline was echoed by the terminal
      writeln!(self.output)?;
    }

    Ok(is_yes(&answer))
  }
}

/// Only the first character of the answer counts
pub fn is_yes(answer: &str) -> bool {
  matches!(answer.chars().next(), Some('y' | 'Y'))
}

/// Ask `prompt`; a "no" becomes a fatal `Declined` error describing `consequence`
pub fn confirm_or_abort(prompter: &mut dyn Prompter, prompt: &str, consequence: &str) -> PublishResult<()> {
  if prompter.confirm(prompt)? {
    Ok(())
  } else {
    Err(PublishError::Declined {
      consequence: consequence.to_string(),
    })
  }
}

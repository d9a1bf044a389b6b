//! External-compiler filters.

use super::{ProcessContext, Processor};
use crate::utils::exec::Cmd;
use anyhow::{Context, Result};

/// Pipes content to a program's stdin and takes its stdout as the result.
///
/// The calling thread blocks until the program exits; there is no timeout.
#[derive(Debug, Clone)]
pub struct ExternalProcessor {
    command: Vec<String>,
}

impl ExternalProcessor {
    /// `command[0]` is the program, the rest are its arguments.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            command: command.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// CoffeeScript compiler reading from stdin.
    pub fn coffee() -> Self {
        Self::new(["coffee", "-s", "-c"])
    }

    /// Less compiler reading from stdin.
    pub fn less() -> Self {
        Self::new(["lessc", "-"])
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }
}

impl Processor for ExternalProcessor {
    fn process(&self, _cx: &ProcessContext<'_>, content: &str, _tag: &str) -> Result<String> {
        let output = Cmd::from_slice(&self.command).stdin(content).run()?;
        String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` produced non-UTF-8 output", self.program()))
    }

    fn check_available(&self) -> Result<()> {
        which::which(self.program())
            .map(|_| ())
            .with_context(|| format!("the command `{}` was not found on your PATH", self.program()))
    }
}

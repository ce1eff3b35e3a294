//! Line-based interactive prompts.

use regex::Regex;
use std::io::{self, BufRead, Write};

/// Asks questions on `output` and reads answers from `input`.
///
/// Generic over the streams so the `add` flow can be driven from tests.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over arbitrary streams.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line that is not a question.
    ///
    /// # Errors
    ///
    /// Fails if writing to the output fails.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn read_answer(&mut self) -> io::Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before all questions were answered",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Ask once; the answer may be empty.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and when the input ends.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.read_answer()
    }

    /// Ask until the answer is non-empty.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and when the input ends.
    pub fn ask_non_empty(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        loop {
            let answer = self.read_answer()?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            write!(self.output, "Input must not be empty. Please try again: ")?;
        }
    }

    /// Ask until the answer compiles as a regular expression.
    ///
    /// An empty answer is accepted and means "not supported".
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and when the input ends.
    pub fn ask_regex(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        loop {
            let answer = self.read_answer()?;
            if Regex::new(&answer).is_ok() {
                return Ok(answer);
            }
            write!(
                self.output,
                "Input must be a valid regular expression. Please try again: "
            )?;
        }
    }

    /// Ask a yes/no question defaulting to no.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors and when the input ends.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} [y/N]: "))?;
        let yes = answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes");
        Ok(yes)
    }
}

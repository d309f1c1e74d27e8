//! Line-based interactive prompts.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use book_ripper::selection::RangePrompt;

/// Asks questions on `output` and reads one-line answers from `input`.
pub(crate) struct LinePrompter<R, W> {
    input: R,
    pub(super) output: W,
}

impl LinePrompter<BufReader<Stdin>, Stdout> {
    /// Prompter bound to the process terminal.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns the trimmed answer.
    ///
    /// End of input is an error so an unattended run never loops on empty
    /// answers.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no answer on standard input",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Asks until the answer is non-empty.
    pub fn ask_required(&mut self, question: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// Yes/no question. Anything not starting with `y` or `Y` is a no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{question} (y/n) "))?;
        Ok(answer.starts_with(['y', 'Y']))
    }
}

impl<R, W> RangePrompt for LinePrompter<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn ask_range(&mut self, total_pages: u32) -> io::Result<String> {
        self.ask(&format!(
            "Enter a page range (e.g. 1-{total_pages}), or leave blank for all {total_pages} pages: "
        ))
    }
}

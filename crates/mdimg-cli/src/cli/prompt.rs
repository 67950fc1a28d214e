//! Line-oriented prompt over any reader/writer pair (stdin/stdout in the binary).

use mdimg_core::setup::Prompt;
use std::io::{self, BufRead, Write};

pub struct StdioPrompt<R, W> {
    input: R,
    output: W,
}

impl StdioPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompt for StdioPrompt<R, W> {
    /// End of input reads as an empty answer.
    fn ask(&mut self, message: &str) -> io::Result<String> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

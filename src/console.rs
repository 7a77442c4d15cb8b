//! Line-oriented terminal I/O for the interactive session.
//!
//! [`Console`] is generic over its reader and writer so whole sessions can be
//! replayed from a byte buffer in tests.

use crate::ui::{Line, Tone};
use crossterm::style::Stylize;
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(color: bool) -> Self {
        Console::new(io::stdin().lock(), io::stdout(), color)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, color: bool) -> Self {
        Self { input, output, color }
    }

    /// Prints `label` without a newline and reads one line of input.
    /// Returns `None` once input is exhausted.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        // Undecodable bytes come through as U+FFFD rather than an error.
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = String::from_utf8_lossy(&raw);
        Ok(Some(answer.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks a y/n question; only `y` or `yes` counts as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<Option<bool>> {
        Ok(self.prompt(question)?.map(|answer| is_yes(&answer)))
    }

    pub fn show(&mut self, line: &Line) -> io::Result<()> {
        if !self.color {
            return writeln!(self.output, "{}", line.text);
        }
        let text = line.text.as_str();
        match line.tone {
            Tone::Plain => writeln!(self.output, "{}", text),
            Tone::Heading => writeln!(self.output, "{}", text.bold()),
            Tone::Notice => writeln!(self.output, "{}", text.yellow()),
            Tone::Error => writeln!(self.output, "{}", text.red()),
        }
    }

    pub fn show_all(&mut self, lines: &[Line]) -> io::Result<()> {
        lines.iter().try_for_each(|line| self.show(line))
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

//! Terminal I/O for the wizard.
//!
//! The elicitation core talks to the user exclusively through the [`Terminal`]
//! trait: a blocking line prompt with a displayed default, plus leveled
//! output. [`ConsoleTerminal`] is the real implementation over stdio; unit
//! tests use the scripted terminal in [`testing`].
//!
//! All wizard output goes to stderr so that stdout stays clean for
//! machine-readable command summaries.

use crate::Result;
use crossterm::style::Stylize;
use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Write};

/// Leveled terminal I/O consumed by the elicitation core.
pub trait Terminal {
    /// Show `text` (and the default, when present) and block for one line of
    /// input. An empty response resolves to the default when one is declared.
    fn prompt(&mut self, text: &str, default: Option<&str>) -> Result<String>;

    /// Informational message.
    fn info(&mut self, text: &str);

    /// Warning message.
    fn warn(&mut self, text: &str);

    /// Error message.
    fn error(&mut self, text: &str);

    /// Success message.
    fn success(&mut self, text: &str);
}

/// Terminal over a line reader and a writer.
///
/// Generic over its streams so the prompt/default logic is testable against
/// in-memory buffers; [`ConsoleTerminal::stdio`] wires it to the process
/// streams.
pub struct ConsoleTerminal<R, W> {
    reader: R,
    writer: W,
    color: bool,
}

impl ConsoleTerminal<BufReader<Stdin>, io::Stderr> {
    /// Terminal over stdin/stderr, colored when stderr is a tty.
    pub fn stdio() -> Self {
        let stderr = io::stderr();
        let color = stderr.is_terminal();
        Self {
            reader: BufReader::new(io::stdin()),
            writer: stderr,
            color,
        }
    }
}

impl<R: BufRead, W: Write> ConsoleTerminal<R, W> {
    /// Terminal over arbitrary streams (used by tests), uncolored.
    pub fn with_streams(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            color: false,
        }
    }

    /// Enable or disable colored output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Consume the terminal, returning the writer (used by tests).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn emit(&mut self, prefix: &str, text: &str) {
        // Leveled output is best-effort; a broken stderr should not abort the run.
        let _ = writeln!(self.writer, "{} {}", prefix, text);
        let _ = self.writer.flush();
    }
}

impl<R: BufRead, W: Write> Terminal for ConsoleTerminal<R, W> {
    fn prompt(&mut self, text: &str, default: Option<&str>) -> Result<String> {
        let shown = match default {
            Some(d) => format!("{} [{}]", text, d),
            None => text.to_string(),
        };
        if self.color {
            write!(self.writer, "{} ", shown.bold())?;
        } else {
            write!(self.writer, "{} ", shown)?;
        }
        self.writer.flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "unexpected end of input while prompting",
            )
            .into());
        }

        let response = line.trim_end_matches(['\r', '\n']);
        if response.is_empty() {
            if let Some(d) = default {
                return Ok(d.to_string());
            }
        }
        Ok(response.to_string())
    }

    fn info(&mut self, text: &str) {
        let prefix = if self.color {
            format!("{}", "#".cyan())
        } else {
            "#".to_string()
        };
        self.emit(&prefix, text);
    }

    fn warn(&mut self, text: &str) {
        let prefix = if self.color {
            format!("{}", "#".yellow())
        } else {
            "#".to_string()
        };
        self.emit(&prefix, text);
    }

    fn error(&mut self, text: &str) {
        let prefix = if self.color {
            format!("{}", "#".red())
        } else {
            "#".to_string()
        };
        self.emit(&prefix, text);
    }

    fn success(&mut self, text: &str) {
        let prefix = if self.color {
            format!("{}", "#".green())
        } else {
            "#".to_string()
        };
        self.emit(&prefix, text);
    }
}

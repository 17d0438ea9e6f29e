//! Terminal display sink.
//!
//! Draws each frame as its own line on stderr, coloured with ANSI escapes
//! when colour is enabled. Stdout stays reserved for the console prompt.

use std::io::{IsTerminal, Write};

use crate::cli::args::ColorChoice;
use crate::error::DisplayError;

use super::{DisplayFrame, DisplaySink, Tone};

const RESET: &str = "\x1b[0m";

/// Line-oriented display writing to any [`Write`] target.
pub struct TerminalDisplay {
    writer: Box<dyn Write + Send>,
    ansi: bool,
}

impl TerminalDisplay {
    /// Creates a display over an arbitrary writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, ansi: bool) -> Self {
        Self { writer, ansi }
    }

    /// Creates a display on stderr, resolving `color` against the stream.
    #[must_use]
    pub fn stderr(color: ColorChoice) -> Self {
        let ansi = color.resolve(std::io::stderr().is_terminal());
        Self::new(Box::new(std::io::stderr()), ansi)
    }

    const fn colour(tone: Tone) -> &'static str {
        match tone {
            Tone::Normal => "\x1b[97m",
            // 256-colour orange
            Tone::Attention => "\x1b[38;5;208m",
            Tone::Warning => "\x1b[91m",
        }
    }
}

impl std::fmt::Debug for TerminalDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalDisplay")
            .field("ansi", &self.ansi)
            .finish_non_exhaustive()
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, frame: &DisplayFrame) -> Result<(), DisplayError> {
        if self.ansi {
            writeln!(
                self.writer,
                "{}[ {} ]{RESET}",
                Self::colour(frame.tone),
                frame.text
            )?;
        } else {
            writeln!(self.writer, "[ {} ]", frame.text)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

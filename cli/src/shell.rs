use std::fmt::Display;
use std::io::{IsTerminal, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
}

/// Status output on stderr, cargo style: a coloured, right-aligned status
/// word followed by a message.
pub struct Shell {
    err: StandardStream,
    verbosity: Verbosity,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Shell {
        let choice = if std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };

        Shell {
            err: StandardStream::stderr(choice),
            verbosity: Verbosity::Normal,
        }
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Print a status line unless quiet.
    pub fn print(
        &mut self,
        status: &dyn Display,
        message: Option<&dyn Display>,
        color: Color,
        justified: bool,
    ) -> anyhow::Result<()> {
        match self.verbosity {
            Verbosity::Quiet => Ok(()),
            Verbosity::Normal => self.write_status(status, message, color, justified),
        }
    }

    pub fn status<T: Display, U: Display>(&mut self, status: T, message: U) -> anyhow::Result<()> {
        self.print(&status, Some(&message), Color::Green, true)
    }

    pub fn status_with_color<T: Display, U: Display>(
        &mut self,
        status: T,
        message: U,
        color: Color,
    ) -> anyhow::Result<()> {
        self.print(&status, Some(&message), color, true)
    }

    pub fn warn<T: Display>(&mut self, message: T) -> anyhow::Result<()> {
        self.print(&"warning", Some(&message), Color::Yellow, false)
    }

    /// Errors are printed even when quiet.
    pub fn error<T: Display>(&mut self, message: T) -> anyhow::Result<()> {
        self.write_status(&"error", Some(&message), Color::Red, false)
    }

    fn write_status(
        &mut self,
        status: &dyn Display,
        message: Option<&dyn Display>,
        color: Color,
        justified: bool,
    ) -> anyhow::Result<()> {
        self.err.reset()?;
        self.err
            .set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
        if justified {
            write!(self.err, "{:>12}", status.to_string())?;
        } else {
            write!(self.err, "{}", status)?;
            self.err.set_color(ColorSpec::new().set_bold(true))?;
            write!(self.err, ":")?;
        }
        self.err.reset()?;

        match message {
            Some(message) => writeln!(self.err, " {}", message)?,
            None => write!(self.err, " ")?,
        }
        self.err.flush()?;

        Ok(())
    }
}

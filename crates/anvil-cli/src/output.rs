//! Terminal output.
//!
//! Results go to stdout and warnings to stderr. Quiet mode keeps only JSON;
//! JSON mode keeps stdout a single parseable document. Errors are printed by
//! `main`.

use std::io::{self, IsTerminal};
use std::time::Duration;

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Info,
}

impl Tone {
    fn symbol(self) -> &'static str {
        match self {
            Self::Success => "\u{2713}",
            Self::Warning => "\u{26a0}",
            Self::Info => "\u{2139}",
        }
    }

    fn line(self, msg: &str, no_color: bool) -> String {
        let symbol = self.symbol();
        if no_color {
            return format!("{symbol} {msg}");
        }
        match self {
            Self::Success => format!("{} {}", symbol.green().bold(), msg.green()),
            Self::Warning => format!("{} {}", symbol.yellow().bold(), msg.yellow()),
            Self::Info => format!("{} {}", symbol.blue().bold(), msg.blue()),
        }
    }
}

pub struct OutputManager {
    format: OutputFormat,
    quiet: bool,
    verbose: bool,
    no_color: bool,
    stdout: Term,
    stderr: Term,
}

impl OutputManager {
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let format = args.output_format.resolve(io::stdout().is_terminal());
        Self {
            format,
            quiet: args.quiet,
            verbose: args.verbose > 0,
            no_color: args.no_color || config.output.no_color || format != OutputFormat::Human,
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    /// True when human-oriented stdout lines should be dropped.
    fn muted(&self) -> bool {
        self.quiet || self.is_json()
    }

    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.muted() {
            return Ok(());
        }
        self.stdout.write_line(msg)
    }

    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.muted() {
            return Ok(());
        }
        self.stdout.write_line(&success_line(msg, self.no_color))
    }

    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.muted() {
            return Ok(());
        }
        self.stdout.write_line(&Tone::Info.line(msg, self.no_color))
    }

    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.muted() {
            return Ok(());
        }
        if self.no_color {
            self.stdout.write_line(text)
        } else {
            self.stdout.write_line(&text.cyan().bold().to_string())
        }
    }

    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.stderr.write_line(&warning_line(msg, self.no_color))
    }

    /// Pretty JSON on stdout. Printed in quiet mode too so pipes stay
    /// parseable.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.stdout.write_line(&text)
    }

    /// Spinner on stderr; hidden when quiet, in JSON mode or off a terminal.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.muted() || !io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = ProgressBar::new_spinner().with_style(style);
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }

    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub(crate) fn success_line(msg: &str, no_color: bool) -> String {
    Tone::Success.line(msg, no_color)
}

pub(crate) fn warning_line(msg: &str, no_color: bool) -> String {
    Tone::Warning.line(msg, no_color)
}

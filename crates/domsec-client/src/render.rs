//! Terminal rendering of the dashboard view

use std::io::{self, Write};

use colored::{Color, ColoredString, Colorize};
use domsec_core::{DetectionRecord, Domain, LinkState, Verdict};

use crate::poller::DashboardView;

/// Width of the status columns
const STATUS_WIDTH: usize = 10;

/// Something that can show a [`DashboardView`]
pub trait Renderer: Send {
    fn render(&mut self, view: &DashboardView) -> io::Result<()>;
}

/// Terminal color of a verdict; `None` renders neutral
pub fn verdict_color(verdict: &Verdict) -> Option<Color> {
    match verdict {
        Verdict::Pending => Some(Color::Magenta),
        Verdict::Clear => Some(Color::Green),
        Verdict::Flagged => Some(Color::Red),
        Verdict::Indeterminate => Some(Color::Yellow),
        Verdict::Other(_) => None,
    }
}

fn paint_verdict(verdict: &Verdict) -> ColoredString {
    // Pad before painting; escape codes would throw off the width
    let label = format!("{:<width$}", verdict.label(), width = STATUS_WIDTH);
    match verdict_color(verdict) {
        Some(color) => label.as_str().color(color),
        None => label.as_str().normal(),
    }
}

fn paint_link(state: LinkState) -> ColoredString {
    match state {
        LinkState::Checking => state.as_str().dimmed(),
        LinkState::Ok => state.as_str().green(),
        LinkState::Unreachable => state.as_str().red(),
        LinkState::Error => state.as_str().red().bold(),
    }
}

/// One table row; a domain without a record shows dashes
pub fn format_row(domain: &Domain, record: Option<&DetectionRecord>, width: usize) -> String {
    match record {
        Some(record) => format!(
            "{:<width$}  {}  {}  {}",
            domain.as_str(),
            paint_verdict(&record.google_status),
            paint_verdict(&record.spamhaus_status),
            record.timestamp,
        ),
        None => format!(
            "{:<width$}  {:<status$}  {:<status$}",
            domain.as_str(),
            "-",
            "-",
            status = STATUS_WIDTH,
        ),
    }
}

/// Widest domain name, for column alignment
pub fn domain_width<'a>(domains: impl Iterator<Item = &'a Domain>) -> usize {
    domains.map(|d| d.as_str().len()).max().unwrap_or(0).max("DOMAIN".len())
}

/// Column headings matching [`format_row`]
pub fn format_header(width: usize) -> String {
    format!(
        "{:<width$}  {:<status$}  {:<status$}  {}",
        "DOMAIN",
        "GOOGLE",
        "SPAMHAUS",
        "CHECKED",
        status = STATUS_WIDTH,
    )
}

/// Plain-text renderer for terminals
pub struct TerminalRenderer<W: Write + Send = io::Stdout> {
    out: W,
    clear_screen: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Render to stdout, redrawing the whole screen each time if `clear_screen`
    pub fn stdout(clear_screen: bool) -> Self {
        Self {
            out: io::stdout(),
            clear_screen,
        }
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &DashboardView) -> io::Result<()> {
        if self.clear_screen {
            write!(self.out, "\x1B[2J\x1B[H")?;
        }

        writeln!(self.out, "{}", "Domain Security Dashboard".bold())?;
        writeln!(
            self.out,
            "Google: {}   Spamhaus: {}",
            paint_link(view.connection.google),
            paint_link(view.connection.spamhaus)
        )?;
        writeln!(self.out)?;

        if view.results.is_empty() {
            writeln!(self.out, "{}", "No domains registered".dimmed())?;
        } else {
            let width = domain_width(view.results.keys());
            writeln!(self.out, "{}", format_header(width).bold())?;
            for (domain, record) in &view.results {
                writeln!(self.out, "{}", format_row(domain, Some(record), width))?;
            }
        }

        if let Some(message) = &view.message {
            writeln!(self.out)?;
            writeln!(self.out, "{}", message.red())?;
        }

        self.out.flush()
    }
}

use std::io::{self, Write};

use crossterm::style::Stylize;
use serde::Serialize;

use crate::pipeline::{Notice, NoticeLevel, Notifier, RunReport};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

/// Leveled console notices, the terminal stand-in for the host toast
/// surface. Writes to stderr so stdout stays machine-readable.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info".cyan(),
            NoticeLevel::Success => "done".green().bold(),
            NoticeLevel::Error => "error".red().bold(),
        };
        eprintln!("{tag} {}: {}", notice.title.as_str().bold(), notice.body);
    }
}

/// Silent sink plus pretty-printed JSON results for scripted callers.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_report(report: &RunReport) -> io::Result<()> {
        Self::print_json(report)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl Notifier for JsonOutput {
    fn notify(&self, _notice: Notice) {}
}

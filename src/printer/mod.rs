//! Printers: JSON response on stdout, coloured summaries on stderr.

use std::io::{self, Write};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::{batch::BatchOutcome, response::RunResponse};

pub fn print_response(response: &RunResponse, pretty: bool) -> Result<()> {
    write_response(io::stdout().lock(), response, pretty)
}

/// Write the response as one JSON document followed by a newline.
pub fn write_response<W: Write>(mut out: W, response: &RunResponse, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    writeln!(out, "{}", text)
        .and_then(|_| out.flush())
        .context("writing response")
}

pub struct SummaryPrinter {
    pub color: bool,
}

impl SummaryPrinter {
    pub fn print(&self, outcome: &BatchOutcome) {
        for rec in &outcome.executions {
            self.line("ok", "green", &format!("{} -> {}", rec.statement_preview, rec.execution_id));
        }
        for err in &outcome.errors {
            let (tag, color) = if err.skipped { ("skipped", "yellow") } else { ("failed", "red") };
            self.line(tag, color, &format!("{}: {}", err.statement_preview, err.error_message));
        }
        eprintln!(
            "{} submitted, {} skipped, {} failed",
            outcome.executions.len(),
            outcome.skipped_count(),
            outcome.fatal_count()
        );
    }

    pub fn print_statements(&self, statements: &[String]) {
        for (i, stmt) in statements.iter().enumerate() {
            let header = format!("-- [{}]", i + 1);
            if self.color {
                println!("{}\n{};\n", header.cyan(), stmt);
            } else {
                println!("{}\n{};\n", header, stmt);
            }
        }
    }

    fn line(&self, tag: &str, color: &str, text: &str) {
        if !self.color {
            eprintln!("[{}] {}", tag, text);
            return;
        }
        match color {
            "green" => eprintln!("[{}] {}", tag.green(), text),
            "yellow" => eprintln!("[{}] {}", tag.yellow(), text),
            "red" => eprintln!("[{}] {}", tag.red(), text),
            _ => eprintln!("[{}] {}", tag, text),
        }
    }
}

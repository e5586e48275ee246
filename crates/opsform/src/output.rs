//! Output formatting for command results.
//!
//! Listings (entities, fields, rules, evaluations, validation errors) go
//! through [`render_list`]; whole records such as a fill snapshot or the
//! resolved config go through [`render_document`]. Status lines for stderr
//! live here too so every command colors them the same way.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// One-line status for stderr: green check or red cross.
pub fn status_line(ok: bool, message: &str, color: bool) -> String {
    match (ok, color) {
        (true, true) => format!("{} {message}", "✓".green()),
        (false, true) => format!("{} {}", "✗".red(), message.bold()),
        (true, false) => format!("✓ {message}"),
        (false, false) => format!("✗ {message}"),
    }
}

// ── Listings ─────────────────────────────────────────────────────────

/// Render rows of a listing in the chosen format.
///
/// `to_row` builds the table row; `key_fn` gives the single token printed
/// per line in `plain` mode (a field name, an entity kind).
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    key_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&key_fn).collect::<Vec<_>>().join("\n"),
    }
}

// ── Documents ────────────────────────────────────────────────────────

/// A record printed as one unit rather than as rows.
pub trait Document: serde::Serialize {
    /// Text for the default `table` format.
    fn table_text(&self) -> String;

    /// Line-oriented text for `plain`, meant to be fed back into scripts.
    fn plain_text(&self) -> String;
}

pub fn render_document<D: Document>(format: &OutputFormat, doc: &D) -> String {
    match format {
        OutputFormat::Table => doc.table_text(),
        OutputFormat::Plain => doc.plain_text(),
        OutputFormat::Json => render_json(doc, false),
        OutputFormat::JsonCompact => render_json(doc, true),
        OutputFormat::Yaml => render_yaml(doc),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Encoders ─────────────────────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON; also the on-disk snapshot format.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("serialization failed: {e}"))
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).unwrap_or_else(|e| format!("serialization failed: {e}"))
    } else {
        render_json_pretty(data)
    }
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("serialization failed: {e}"))
}

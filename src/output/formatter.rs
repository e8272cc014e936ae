//! Core formatting traits and implementations
//!
//! The plain table mirrors a right-aligned tab writer: every column is as
//! wide as its longest cell plus [`CELL_PADDING`], and each cell is padded
//! on the left.

use crate::{error::Result, models::HostStat};
use serde::Serialize;

/// Column titles, in report order
pub const HEADERS: [&str; 5] = ["Host", "Min", "Avg", "Max", "Jit."];

/// Spaces added to the widest cell of every column
pub const CELL_PADDING: usize = 4;

/// Renders a ranked list of host statistics
pub trait ReportFormatter: Send + Sync {
    /// Render the complete report, including a trailing newline
    fn render(&self, stats: &[HostStat]) -> Result<String>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// The text of one report row, before alignment
pub type RowCells = [String; 5];

/// Cell text for one host
pub fn row_cells(stat: &HostStat) -> RowCells {
    [
        stat.host.clone(),
        format!("{:.2}", stat.min),
        format!("{:.2}", stat.avg),
        format!("{:.2}", stat.max),
        format!("{:.2}", stat.jitter()),
    ]
}

/// Column widths for the header plus the given rows, padding included
pub fn column_widths<'a>(rows: impl IntoIterator<Item = &'a RowCells>) -> [usize; 5] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + CELL_PADDING)
}

/// Right-align `text` in a field of `width` characters
pub fn align_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut cell = " ".repeat(width.saturating_sub(len));
    cell.push_str(text);
    cell
}

/// Plain text table formatter
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render_line(cells: &[impl AsRef<str>], widths: &[usize; 5]) -> String {
        let mut line = String::new();
        for (cell, width) in cells.iter().zip(widths.iter()) {
            line.push_str(&align_right(cell.as_ref(), *width));
        }
        line.push('\n');
        line
    }
}

impl ReportFormatter for PlainFormatter {
    fn render(&self, stats: &[HostStat]) -> Result<String> {
        let rows: Vec<RowCells> = stats.iter().map(row_cells).collect();
        let widths = column_widths(&rows);

        let mut output = Self::render_line(&HEADERS, &widths);
        for row in &rows {
            output.push_str(&Self::render_line(row, &widths));
        }
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    host: &'a str,
    min: f64,
    avg: f64,
    max: f64,
    jitter: f64,
    reachable: bool,
}

/// JSON array formatter for scripts
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for JsonFormatter {
    fn render(&self, stats: &[HostStat]) -> Result<String> {
        let rows: Vec<JsonRow<'_>> = stats
            .iter()
            .map(|s| JsonRow {
                host: &s.host,
                min: s.min,
                avg: s.avg,
                max: s.max,
                jitter: s.jitter(),
                reachable: s.reachable,
            })
            .collect();

        let mut output = serde_json::to_string_pretty(&rows)?;
        output.push('\n');
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

//! Report rendering
//!
//! Formatters turn the ranked host list into the text printed on stdout.
//! Diagnostics never go through here; they are written to stderr by the
//! logger so the report stays machine-parseable.

mod colored;
mod formatter;

pub use self::colored::{ColoredFormatter, LatencyLevel};
pub use self::formatter::{
    align_right, column_widths, row_cells, JsonFormatter, PlainFormatter, ReportFormatter, RowCells,
    CELL_PADDING, HEADERS,
};

use crate::{error::Result, models::HostStat, types::OutputFormat};
use std::io::Write;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter for the requested format; color only affects tables
    pub fn create(format: OutputFormat, enable_color: bool) -> Box<dyn ReportFormatter> {
        match format {
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::Table if enable_color => Box::new(ColoredFormatter::new()),
            OutputFormat::Table => Box::new(PlainFormatter::new()),
        }
    }
}

/// Render `stats` and write the report to `out`
pub fn write_report<W: Write>(formatter: &dyn ReportFormatter, stats: &[HostStat], out: &mut W) -> Result<()> {
    let report = formatter.render(stats)?;
    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(())
}

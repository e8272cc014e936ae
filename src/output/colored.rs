//! Colored table formatter with terminal color support

use super::formatter::{align_right, column_widths, row_cells, ReportFormatter, RowCells, HEADERS};
use crate::{error::Result, models::HostStat};
use colored::*;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyLevel {
    Excellent,   // < 50ms
    Good,        // 50-100ms
    Fair,        // 100-300ms
    Poor,        // >= 300ms
    Unreachable, // probe failed
}

impl LatencyLevel {
    /// Determine the level from an average round-trip time in milliseconds
    pub fn from_latency(avg_ms: f64) -> Self {
        if avg_ms < 50.0 {
            Self::Excellent
        } else if avg_ms < 100.0 {
            Self::Good
        } else if avg_ms < 300.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn classify(stat: &HostStat) -> Self {
        if stat.reachable {
            Self::from_latency(stat.avg)
        } else {
            Self::Unreachable
        }
    }

    /// Get color for this level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::Unreachable => Color::Red,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Unreachable => "Unreachable",
        }
    }
}

/// Same layout as the plain table, with rows colored by latency level
#[derive(Debug, Clone, Default)]
pub struct ColoredFormatter;

impl ColoredFormatter {
    pub fn new() -> Self {
        Self
    }

    fn header_line(widths: &[usize; 5]) -> String {
        let mut line = String::new();
        for (title, width) in HEADERS.iter().zip(widths.iter()) {
            line.push_str(&align_right(title, *width).bold().to_string());
        }
        line.push('\n');
        line
    }

    fn row_line(stat: &HostStat, cells: &RowCells, widths: &[usize; 5]) -> String {
        let level = LatencyLevel::classify(stat);
        let mut line = String::new();

        for (index, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
            // Pad before coloring so escape codes do not count toward width
            let padded = align_right(cell, *width);
            let styled = if index == 0 {
                padded.bold()
            } else if level == LatencyLevel::Unreachable {
                padded.color(level.color()).dimmed()
            } else {
                padded.color(level.color())
            };
            line.push_str(&styled.to_string());
        }
        line.push('\n');
        line
    }
}

impl ReportFormatter for ColoredFormatter {
    fn render(&self, stats: &[HostStat]) -> Result<String> {
        let rows: Vec<RowCells> = stats.iter().map(row_cells).collect();
        let widths = column_widths(&rows);

        let mut output = Self::header_line(&widths);
        for (stat, cells) in stats.iter().zip(rows.iter()) {
            output.push_str(&Self::row_line(stat, cells, &widths));
        }
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "colored-table"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::PlainFormatter;
    use crate::probe::ParsedStats;

    fn stat(host: &str, avg: f64) -> HostStat {
        HostStat::measured(host, ParsedStats { min: avg, avg, max: avg, deviation: None })
    }

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_latency_levels() {
        assert_eq!(LatencyLevel::from_latency(10.0), LatencyLevel::Excellent);
        assert_eq!(LatencyLevel::from_latency(50.0), LatencyLevel::Good);
        assert_eq!(LatencyLevel::from_latency(150.0), LatencyLevel::Fair);
        assert_eq!(LatencyLevel::from_latency(300.0), LatencyLevel::Poor);
        assert_eq!(LatencyLevel::classify(&HostStat::sentinel("x", 10000.0)), LatencyLevel::Unreachable);
        assert_eq!(LatencyLevel::Unreachable.description(), "Unreachable");
    }

    #[test]
    fn test_colored_table_matches_plain_layout() {
        let stats = vec![stat("a", 2.0), stat("slow", 120.0), HostStat::sentinel("b", 10000.0)];
        let colored = ColoredFormatter::new().render(&stats).unwrap();
        let plain = PlainFormatter::new().render(&stats).unwrap();

        assert_eq!(strip_ansi(&colored), plain);
    }
}

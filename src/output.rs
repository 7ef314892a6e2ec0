//! Output formatting and persistence for query results.
//!
//! Supports a plain-text rendering, JSON serialization, and CSV export of the
//! student table.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::report::{BarSeries, QueryOutcome, StudentTable, decimal_comma};

/// Writes any serializable payload as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Renders a query outcome as human-readable text.
pub fn render_text(outcome: &QueryOutcome) -> String {
    let dashboard = match outcome {
        QueryOutcome::NoResults => return "No results found for this query.\n".to_string(),
        QueryOutcome::Results(dashboard) => dashboard,
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} matching records", dashboard.matched);
    for series in &dashboard.charts {
        out.push('\n');
        render_series(&mut out, series);
    }
    if !dashboard.table.rows.is_empty() {
        out.push('\n');
        render_table(&mut out, &dashboard.table);
    }
    out
}

fn render_series(out: &mut String, series: &BarSeries) {
    let _ = writeln!(out, "{}", series.title);
    let width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    for ((label, value), color) in series.labels.iter().zip(&series.values).zip(&series.colors) {
        let pad = width - label.chars().count();
        let _ = writeln!(
            out,
            "  {label}{:pad$}  {}  {color}",
            "",
            decimal_comma(*value)
        );
    }
}

fn render_table(out: &mut String, table: &StudentTable) {
    let mut header = vec!["Student".to_string(), "Group".to_string()];
    header.extend(table.subjects.iter().map(|s| s.to_string()));
    let _ = writeln!(out, "{}", header.join(" | "));
    for row in &table.rows {
        let mut line = vec![row.student.clone(), row.group.clone()];
        line.extend(row.cells.iter().map(|c| format!("{} ({})", c.text, c.color)));
        let _ = writeln!(out, "{}", line.join(" | "));
    }
}

/// Writes the student table as a `;`-separated file with decimal commas.
///
/// Overwrites `path` if it exists.
pub fn write_table_csv(path: &Path, table: &StudentTable) -> Result<()> {
    debug!(path = %path.display(), rows = table.rows.len(), "Writing student table");

    let mut writer = WriterBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header = vec!["Estudiante".to_string(), "grupo".to_string()];
    header.extend(table.subjects.iter().map(|s| s.to_string()));
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.student.clone(), row.group.clone()];
        record.extend(row.cells.iter().map(|c| c.text.clone()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}

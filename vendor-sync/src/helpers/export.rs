use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared_types::ResultSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const COLUMNS: [&str; 3] = ["company_code", "vendor_number", "name"];

pub const NO_RESULTS_MESSAGE: &str = "No vendor updates found in recent emails.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Fixed-width text table with a header row, one line per record.
pub fn render_table(result: &ResultSet) -> String {
    let mut widths = COLUMNS.map(str::len);
    for record in result {
        widths[0] = widths[0].max(record.company_code.chars().count());
        widths[1] = widths[1].max(record.vendor_number.chars().count());
        widths[2] = widths[2].max(record.name.chars().count());
    }

    let mut out = String::new();
    push_row(&mut out, &COLUMNS, &widths);
    for record in result {
        push_row(
            &mut out,
            &[
                record.company_code.as_str(),
                record.vendor_number.as_str(),
                record.name.as_str(),
            ],
            &widths,
        );
    }
    out
}

fn push_row(out: &mut String, cells: &[&str; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn write_csv<W: Write>(result: &ResultSet, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for record in result {
        csv_writer.write_record([
            &record.company_code,
            &record.vendor_number,
            &record.name,
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(result: &ResultSet, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_formatted<W: Write>(result: &ResultSet, format: OutputFormat, mut writer: W) -> Result<()> {
    match format {
        OutputFormat::Table => writer.write_all(render_table(result).as_bytes())?,
        OutputFormat::Csv => write_csv(result, writer)?,
        OutputFormat::Json => write_json(result, writer)?,
    }
    Ok(())
}

/// Writes to `path` when given, stdout otherwise.
pub fn write_result(result: &ResultSet, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            write_formatted(result, format, file)?;
            tracing::info!("Wrote {} rows to {:?}", result.len(), path);
        }
        None => write_formatted(result, format, std::io::stdout().lock())?,
    }
    Ok(())
}

/// Final output of a scan.
///
/// An empty result on stdout is reported as [`NO_RESULTS_MESSAGE`] only. With
/// an output file the file is still rewritten, header only, and the notice
/// goes to stderr.
pub fn publish_result(result: &ResultSet, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    if result.is_empty() {
        match path {
            None => {
                println!("{}", NO_RESULTS_MESSAGE);
                return Ok(());
            }
            Some(_) => eprintln!("{}", NO_RESULTS_MESSAGE),
        }
    }
    write_result(result, format, path)
}

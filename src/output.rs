use crate::query::{Data, Point};
use serde::Serialize;
use std::{io::Write, str::FromStr};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Document format of query results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `Date<sep>field` header, one row per bucket
    #[default]
    Csv,

    /// Array of `{"Date": ..., "Data": ...}` objects
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("invalid output format {s:?}, expected csv or json")),
        }
    }
}

fn render(data: &Data) -> String {
    match data {
        Data::Value(v) => v.to_string(),
        Data::Readings(readings) => readings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Writes points as delimited text; raw readings are joined by spaces.
///
/// # Errors
///
/// Returns error if an I/O error occurred.
pub fn write_csv<W: Write>(
    writer: W,
    points: &[Point],
    field: &str,
    separator: u8,
) -> crate::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .from_writer(writer);

    writer.write_record(["Date", field])?;

    for point in points {
        let date = point.date.format(DATE_FORMAT).to_string();
        writer.write_record([date, render(&point.data)])?;
    }

    writer.flush()?;

    Ok(())
}

#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "Date")]
    date: String,

    #[serde(rename = "Data")]
    data: &'a Data,
}

/// Writes points as a JSON array.
///
/// # Errors
///
/// Returns error if an I/O error occurred.
pub fn write_json<W: Write>(writer: W, points: &[Point]) -> crate::Result<()> {
    let records = points
        .iter()
        .map(|point| Record {
            date: point.date.format(DATE_FORMAT).to_string(),
            data: &point.data,
        })
        .collect::<Vec<_>>();

    serde_json::to_writer_pretty(writer, &records)?;

    Ok(())
}

/// Writes points in the given format.
///
/// # Errors
///
/// Returns error if an I/O error occurred.
pub fn write<W: Write>(
    writer: W,
    points: &[Point],
    field: &str,
    separator: u8,
    format: OutputFormat,
) -> crate::Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, points, field, separator),
        OutputFormat::Json => write_json(writer, points),
    }
}

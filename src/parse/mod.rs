//! Turns delimited text into readings.
//!
//! The first record is the header, every other record holds a timestamp
//! and any number of value columns. Each value column becomes one field
//! of the [`crate::Container`].

mod format;
mod line;
mod reader;

pub use format::TimestampFormat;
pub use line::LineParser;
pub use reader::FileReader;

use std::str::FromStr;

/// Reading that stands in for a value that could not be converted to a number.
///
/// Aggregating a minute that holds it fails with [`crate::Error::NonNumericAggregation`].
pub const NA: crate::Value = crate::Value::NAN;

/// Clock format of the timestamps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HourFormat {
    /// Detect from the first record
    #[default]
    Auto,

    /// `hh:mm am/pm`
    H12,

    /// `hh:mm`
    H24,
}

/// Order of the date components.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// Detect from the first record (cannot tell US dates apart from day-first dates)
    #[default]
    Auto,

    /// `yyyy-mm-dd`
    YearFirst,

    /// `dd.mm.yyyy`
    DayFirst,

    /// `mm/dd/yyyy` (US), never detected automatically
    MonthFirst,
}

impl FromStr for HourFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "12" => Ok(Self::H12),
            "24" => Ok(Self::H24),
            _ => Err(format!("invalid hour format {s:?}, expected auto, 12 or 24")),
        }
    }
}

impl FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "year" => Ok(Self::YearFirst),
            "day" => Ok(Self::DayFirst),
            "us" => Ok(Self::MonthFirst),
            _ => Err(format!(
                "invalid date format {s:?}, expected auto, year, day or US"
            )),
        }
    }
}

/// Settings of the line parser.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    pub(crate) separator: u8,
    pub(crate) column: Option<String>,
    pub(crate) timestamp_column: Option<usize>,
    pub(crate) hour_format: HourFormat,
    pub(crate) date_order: DateOrder,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separator: b',',
            column: None,
            timestamp_column: None,
            hour_format: HourFormat::Auto,
            date_order: DateOrder::Auto,
        }
    }
}

impl ParserConfig {
    /// Creates the default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Field separator.
    ///
    /// Default = `,`
    #[must_use]
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Only parses the column with that header name.
    ///
    /// Default = all columns but the timestamp
    #[must_use]
    pub fn column<S: Into<String>>(mut self, name: S) -> Self {
        self.column = Some(name.into());
        self
    }

    /// Index of the timestamp column.
    ///
    /// Default = first column containing both a date and a time
    #[must_use]
    pub fn timestamp_column(mut self, idx: usize) -> Self {
        self.timestamp_column = Some(idx);
        self
    }

    /// Default = [`HourFormat::Auto`]
    #[must_use]
    pub fn hour_format(mut self, format: HourFormat) -> Self {
        self.hour_format = format;
        self
    }

    /// Default = [`DateOrder::Auto`]
    #[must_use]
    pub fn date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }
}

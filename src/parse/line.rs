use super::{ParserConfig, TimestampFormat, NA};
use crate::{Container, Error, Value};
use regex::Regex;

const NUMBER: &str = r"-?[0-9]*[.,]?[0-9]+";

/// Parses records of a delimited file and inserts their values into a [`Container`].
///
/// The timestamp format and column are resolved from the first data record.
pub struct LineParser<'a> {
    container: &'a mut Container,
    config: ParserConfig,
    names: Vec<String>,
    column: Option<usize>,
    timestamp_column: Option<usize>,
    format: Option<TimestampFormat>,
    number: Regex,
}

impl<'a> LineParser<'a> {
    /// Creates a parser inserting into `container`.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(container: &'a mut Container, config: ParserConfig) -> Self {
        Self {
            container,
            timestamp_column: config.timestamp_column,
            config,
            names: vec![],
            column: None,
            format: None,
            number: Regex::new(NUMBER).expect("pattern should compile"),
        }
    }

    /// Column names of the header.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Reads the column names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the configured column is not part of the header.
    pub fn parse_header(&mut self, fields: &[&str]) -> crate::Result<()> {
        self.names = fields.iter().map(|x| x.trim().to_owned()).collect();

        if let Some(name) = &self.config.column {
            let idx = self
                .names
                .iter()
                .position(|x| x == name)
                .ok_or_else(|| Error::UnknownField(name.clone()))?;

            self.column = Some(idx);
        }

        log::debug!("header: {:?}", self.names);

        Ok(())
    }

    fn initialize(&mut self, fields: &[&str]) -> crate::Result<()> {
        let sep = char::from(self.config.separator).to_string();
        let line = fields.join(sep.as_str());

        let format = TimestampFormat::new(self.config.hour_format, self.config.date_order, &line);

        if self.timestamp_column.is_none() {
            let idx = fields
                .iter()
                .position(|x| format.matches(x))
                .ok_or_else(|| {
                    Error::InvalidTimestamp(format!(
                        "no timestamp column found in {line:?}, try setting it manually"
                    ))
                })?;

            log::debug!("detected timestamp column {idx}");
            self.timestamp_column = Some(idx);
        }

        let columns = match self.column {
            Some(idx) => vec![idx],
            None => (0..self.names.len())
                .filter(|&idx| Some(idx) != self.timestamp_column)
                .collect(),
        };

        for idx in columns {
            if let Some(name) = self.names.get(idx) {
                self.container.add_field(name);
            }
        }

        self.format = Some(format);

        Ok(())
    }

    /// Extracts all numbers of a field.
    ///
    /// Returns `None` if a number cannot be converted (e.g. a decimal comma).
    #[must_use]
    pub fn extract_values(&self, field: &str) -> Option<Vec<Value>> {
        self.number
            .find_iter(field)
            .map(|m| m.as_str().parse::<Value>().ok())
            .collect()
    }

    fn parse_value(&self, field: &str) -> Vec<Value> {
        self.extract_values(field).unwrap_or_else(|| {
            log::warn!("could not convert {field:?} to a number, coded as NA");
            vec![NA]
        })
    }

    /// Parses a data record and inserts its values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if the record has no valid timestamp.
    pub fn parse_record(&mut self, fields: &[&str]) -> crate::Result<()> {
        if self.format.is_none() {
            self.initialize(fields)?;
        }

        let (Some(format), Some(ts_idx)) = (&self.format, self.timestamp_column) else {
            return Ok(());
        };

        let ts_field = fields.get(ts_idx).ok_or_else(|| {
            Error::InvalidTimestamp(format!("record has no column {ts_idx}: {fields:?}"))
        })?;
        let ts = format.parse(ts_field)?;

        let columns = match self.column {
            Some(idx) => idx..idx + 1,
            None => 0..fields.len(),
        };

        for idx in columns.filter(|&idx| idx != ts_idx) {
            let (Some(field), Some(name)) = (fields.get(idx), self.names.get(idx)) else {
                continue;
            };

            let values = self.parse_value(field);
            self.container.insert(name, ts, &values);
        }

        Ok(())
    }
}

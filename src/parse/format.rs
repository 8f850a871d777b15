use super::{DateOrder, HourFormat};
use crate::{Error, Timestamp};
use chrono::NaiveDate;
use regex::Regex;

const YEAR_FIRST: &str = r"(\d{4})\S(\d{2})\S(\d{2})";
const YEAR_LAST: &str = r"(\d{2})\S(\d{2})\S(\d{4})";
const TIME_24: &str = r"\s(\d{1,2}):(\d{2})";
const TIME_12: &str = r"\s(\d{1,2}):(\d{2}).*(am|AM|pm|PM)";

#[allow(clippy::expect_used)]
fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("pattern should compile")
}

/// Detects the hour format of a line: any ` am`/` pm` marker means 12h.
#[must_use]
pub fn detect_hour_format(line: &str) -> HourFormat {
    if pattern(r"\s(am|AM|pm|PM)").is_match(line) {
        HourFormat::H12
    } else {
        HourFormat::H24
    }
}

/// Detects the date order of a line: `yyyy?mm?dd` means year first, otherwise day first.
///
/// US (month first) dates are indistinguishable from day first dates.
#[must_use]
pub fn detect_date_order(line: &str) -> DateOrder {
    if pattern(r"\d{4}\S\d{2}\S\d{2}").is_match(line) {
        DateOrder::YearFirst
    } else {
        DateOrder::DayFirst
    }
}

/// Resolved timestamp format of a file.
#[derive(Clone, Debug)]
pub struct TimestampFormat {
    hour_format: HourFormat,
    date_order: DateOrder,
    date: Regex,
    time: Regex,
    pm: Regex,
    am: Regex,
}

impl TimestampFormat {
    /// Creates a format, detecting whatever is set to `Auto` from `line`.
    #[must_use]
    pub fn new(hour_format: HourFormat, date_order: DateOrder, line: &str) -> Self {
        let hour_format = match hour_format {
            HourFormat::Auto => detect_hour_format(line),
            format => format,
        };

        let date_order = match date_order {
            DateOrder::Auto => detect_date_order(line),
            order => order,
        };

        log::debug!("timestamp format: {hour_format:?}, {date_order:?}");

        Self {
            hour_format,
            date_order,
            date: pattern(if date_order == DateOrder::YearFirst {
                YEAR_FIRST
            } else {
                YEAR_LAST
            }),
            time: pattern(if hour_format == HourFormat::H12 {
                TIME_12
            } else {
                TIME_24
            }),
            pm: pattern(r"pm|PM"),
            am: pattern(r"am|AM"),
        }
    }

    /// Resolved hour format.
    #[must_use]
    pub fn hour_format(&self) -> HourFormat {
        self.hour_format
    }

    /// Resolved date order.
    #[must_use]
    pub fn date_order(&self) -> DateOrder {
        self.date_order
    }

    /// Returns `true` if the field contains both a date and a time.
    #[must_use]
    pub fn matches(&self, field: &str) -> bool {
        self.date.is_match(field) && self.time.is_match(field)
    }

    /// Converts a timestamp field to a minute-granular timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTimestamp`] if the field contains no valid date and time.
    pub fn parse(&self, field: &str) -> crate::Result<Timestamp> {
        let invalid = || Error::InvalidTimestamp(field.to_owned());

        let date = self.date.captures(field).ok_or_else(invalid)?;
        let time = self.time.captures(field).ok_or_else(invalid)?;

        let num = |caps: &regex::Captures, idx: usize| {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .ok_or_else(invalid)
        };

        let (a, b, c) = (num(&date, 1)?, num(&date, 2)?, num(&date, 3)?);

        let (year, month, day) = match self.date_order {
            DateOrder::YearFirst => (a, b, c),
            DateOrder::MonthFirst => (c, a, b),
            DateOrder::DayFirst | DateOrder::Auto => (c, b, a),
        };

        let mut hour = num(&time, 1)?;
        let minute = num(&time, 2)?;

        if self.hour_format == HourFormat::H12 {
            if self.pm.is_match(field) && hour < 12 {
                hour += 12;
            } else if self.am.is_match(field) && hour == 12 {
                hour = 0;
            }
        }

        let year = i32::try_from(year).map_err(|_| invalid())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(invalid)
    }
}

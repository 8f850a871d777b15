use crate::Timestamp;

/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error while reading or writing delimited text.
    Csv(csv::Error),

    /// Error while writing JSON output.
    Json(serde_json::Error),

    /// The readings of a bucket cannot be reduced to a number
    /// (empty minute, or a non-numeric reading).
    NonNumericAggregation(Timestamp),

    /// Buckets are not in chronological order, so the range bounds cannot be located.
    ///
    /// Happens when readings were inserted out of order.
    UnorderedData(Timestamp),

    /// A range was requested on a bucket without children.
    EmptyContainer,

    /// No field of that name was ingested.
    UnknownField(String),

    /// A line has no recognizable timestamp.
    InvalidTimestamp(String),

    /// A query bound is not of the form `yyyy:mm:dd:hh:mm`.
    InvalidTimeBound(String),

    /// A persisted container could not be decoded.
    Decode(&'static str),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => {
                write!(f, "{e}")
            }
            Self::Csv(e) => {
                write!(f, "{e}")
            }
            Self::Json(e) => {
                write!(f, "{e}")
            }
            Self::NonNumericAggregation(date) => {
                write!(f, "NonNumericAggregation: readings of bucket {date} are not numeric")
            }
            Self::UnorderedData(date) => {
                write!(
                    f,
                    "UnorderedData: could not locate {date}, input is probably not in chronological order"
                )
            }
            Self::EmptyContainer => {
                write!(f, "EmptyContainer")
            }
            Self::UnknownField(name) => {
                write!(f, "UnknownField: {name:?}")
            }
            Self::InvalidTimestamp(s) => {
                write!(f, "InvalidTimestamp: {s}")
            }
            Self::InvalidTimeBound(s) => {
                write!(f, "InvalidTimeBound: {s:?}, expected yyyy:mm:dd:hh:mm")
            }
            Self::Decode(reason) => {
                write!(f, "Decode: {reason}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;

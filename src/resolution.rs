use std::str::FromStr;

/// Granularity at which a query reports results.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One result per day
    Day,

    /// One result per hour
    Hour,

    /// One result per minute
    #[default]
    Minute,
}

/// What a query returns per bucket.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The raw readings of every minute (resolution is ignored)
    #[default]
    Raw,

    /// Unweighted mean rolled up from finer buckets
    Mean,

    /// Smallest reading
    Min,

    /// Largest reading
    Max,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "hour" => Ok(Self::Hour),
            "minute" => Ok(Self::Minute),
            _ => Err(format!("invalid resolution {s:?}, expected day, hour or minute")),
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Hour => write!(f, "hour"),
            Self::Minute => write!(f, "minute"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(Self::Raw),
            "mean" | "avg" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(format!(
                "invalid aggregation type {s:?}, expected none, mean, min or max"
            )),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "none"),
            Self::Mean => write!(f, "mean"),
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
        }
    }
}

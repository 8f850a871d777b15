use crate::{Resolution, Timestamp};
use chrono::{Duration, NaiveTime, Timelike};

/// Level of a bucket in the tree.
///
/// Each kind defines how a timestamp is truncated to the start of its bucket,
/// and which kind its children have.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    /// Single, undated top level node; children are days
    Root,

    /// Children are hours
    Day,

    /// Children are minutes
    Hour,

    /// Leaf bucket; children are raw readings
    Minute,
}

impl Kind {
    /// Maps a timestamp to the start of its containing bucket.
    ///
    /// Minute buckets only drop (sub)seconds; timestamps are minute-granular.
    #[must_use]
    pub fn truncate(self, ts: Timestamp) -> Timestamp {
        let midnight = ts.date().and_time(NaiveTime::MIN);

        match self {
            Self::Root => ts,
            Self::Day => midnight,
            Self::Hour => midnight + Duration::hours(i64::from(ts.hour())),
            Self::Minute => {
                midnight
                    + Duration::hours(i64::from(ts.hour()))
                    + Duration::minutes(i64::from(ts.minute()))
            }
        }
    }

    /// Kind of the child buckets, `None` for minutes (they hold readings).
    #[must_use]
    pub fn child(self) -> Option<Self> {
        match self {
            Self::Root => Some(Self::Day),
            Self::Day => Some(Self::Hour),
            Self::Hour => Some(Self::Minute),
            Self::Minute => None,
        }
    }

    /// Returns `true` if this kind holds raw readings.
    #[must_use]
    pub fn is_leaf(self) -> bool {
        self.child().is_none()
    }

    /// Lowercase name of the kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
        }
    }

    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Day => 1,
            Self::Hour => 2,
            Self::Minute => 3,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Root),
            1 => Some(Self::Day),
            2 => Some(Self::Hour),
            3 => Some(Self::Minute),
            _ => None,
        }
    }
}

impl From<Resolution> for Kind {
    fn from(value: Resolution) -> Self {
        match value {
            Resolution::Day => Self::Day,
            Resolution::Hour => Self::Hour,
            Resolution::Minute => Self::Minute,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_log::test;

    fn ts(h: u32, m: u32, s: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2017, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn truncate_day() {
        assert_eq!(ts(0, 0, 0), Kind::Day.truncate(ts(22, 12, 0)));
    }

    #[test]
    fn truncate_hour() {
        assert_eq!(ts(22, 0, 0), Kind::Hour.truncate(ts(22, 12, 0)));
    }

    #[test]
    fn truncate_minute() {
        assert_eq!(ts(22, 12, 0), Kind::Minute.truncate(ts(22, 12, 0)));
        assert_eq!(ts(22, 12, 0), Kind::Minute.truncate(ts(22, 12, 41)));
    }

    #[test]
    fn child_chain() {
        assert_eq!(Some(Kind::Day), Kind::Root.child());
        assert_eq!(Some(Kind::Hour), Kind::Day.child());
        assert_eq!(Some(Kind::Minute), Kind::Hour.child());
        assert!(Kind::Minute.is_leaf());
    }

    #[test]
    fn tag_roundtrip() {
        for kind in [Kind::Root, Kind::Day, Kind::Hour, Kind::Minute] {
            assert_eq!(Some(kind), Kind::from_tag(kind.tag()));
        }
        assert_eq!(None, Kind::from_tag(4));
    }
}

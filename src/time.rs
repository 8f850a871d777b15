use crate::{Error, Timestamp};
use chrono::NaiveDate;
use nom::{
    character::complete::{char, digit1},
    combinator::{all_consuming, map_res},
    multi::separated_list1,
    IResult,
};

fn components(input: &str) -> IResult<&str, Vec<u32>> {
    all_consuming(separated_list1(
        char(':'),
        map_res(digit1, str::parse::<u32>),
    ))(input)
}

/// Parses a query bound of the form `yyyy:mm:dd:hh:mm`.
///
/// Trailing components may be left out; a missing month or day defaults to 1,
/// a missing hour or minute to 0.
///
/// ```
/// use bucketree::parse_time_bound;
///
/// let ts = parse_time_bound("2017:01:05:22:12")?;
/// assert_eq!("2017-01-05 22:12:00", ts.to_string());
///
/// let ts = parse_time_bound("2017:01:05")?;
/// assert_eq!("2017-01-05 00:00:00", ts.to_string());
/// #
/// # Ok::<(), bucketree::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidTimeBound`] if the string is malformed or not a valid date.
pub fn parse_time_bound(s: &str) -> crate::Result<Timestamp> {
    let invalid = || Error::InvalidTimeBound(s.to_owned());

    let (_, parts) = components(s.trim()).map_err(|_| invalid())?;

    if parts.len() > 5 {
        return Err(invalid());
    }

    let part = |idx: usize, default: u32| parts.get(idx).copied().unwrap_or(default);

    let year = i32::try_from(part(0, 0)).map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, part(1, 1), part(2, 1))
        .and_then(|date| date.and_hms_opt(part(3, 0), part(4, 0), 0))
        .ok_or_else(invalid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn parse_full_bound() {
        let ts = parse_time_bound("1980:10:10:10:10").unwrap();
        assert_eq!(
            NaiveDate::from_ymd_opt(1980, 10, 10)
                .unwrap()
                .and_hms_opt(10, 10, 0)
                .unwrap(),
            ts
        );
    }

    #[test]
    fn parse_short_bound() {
        let ts = parse_time_bound("2017:1").unwrap();
        assert_eq!(
            NaiveDate::from_ymd_opt(2017, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            ts
        );
    }

    #[test]
    fn parse_unpadded_bound() {
        let ts = parse_time_bound("2017:1:5:6:0").unwrap();
        assert_eq!(
            NaiveDate::from_ymd_opt(2017, 1, 5)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap(),
            ts
        );
    }

    #[test]
    fn parse_invalid_bound() {
        for s in [
            "",
            "2017-01-05",
            "2017:13:01",
            "2017:01:05:24:00",
            "2017:01:05:10:10:10",
            "2017::05",
            "abc",
        ] {
            assert!(
                matches!(parse_time_bound(s), Err(Error::InvalidTimeBound(_))),
                "{s:?} should be rejected"
            );
        }
    }
}

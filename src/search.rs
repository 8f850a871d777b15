use crate::{BucketNode, Error, Timestamp};

/// Binary search for the bucket containing `ts`.
///
/// Returns `Ok(index)` if found, otherwise `Err(index)` where a bucket for
/// `ts` would have to be, like [`slice::binary_search`].
///
/// `buckets` must be ascending; on unordered input the result is meaningless
/// (see [`bounds`], which detects that).
pub fn find_bucket(buckets: &[BucketNode], ts: Timestamp) -> Result<usize, usize> {
    let mut left = 0;
    let mut right = buckets.len();

    while left < right {
        let middle = left + (right - left) / 2;

        let Some(bucket) = buckets.get(middle) else {
            break;
        };

        match bucket.compare(ts) {
            std::cmp::Ordering::Equal => return Ok(middle),
            std::cmp::Ordering::Greater => right = middle,
            std::cmp::Ordering::Less => left = middle + 1,
        }
    }

    Err(left)
}

fn check_ascending(buckets: &[BucketNode]) -> crate::Result<()> {
    for pair in buckets.windows(2) {
        if let [a, b] = pair {
            if a.date() >= b.date() {
                return Err(Error::UnorderedData(b.date()));
            }
        }
    }

    Ok(())
}

/// Computes the inclusive index range of `buckets` that overlaps `[start, end]`.
///
/// If the first bucket already lies after `start`, the range starts at 0 without searching;
/// if the last bucket lies before `end`, the range ends at the last bucket.
///
/// Returns `None` if no bucket falls into the range.
///
/// # Errors
///
/// Returns [`Error::EmptyContainer`] if there are no buckets, and
/// [`Error::UnorderedData`] if the buckets are not strictly ascending.
pub fn bounds(
    buckets: &[BucketNode],
    start: Timestamp,
    end: Timestamp,
) -> crate::Result<Option<(usize, usize)>> {
    let (Some(first), Some(last)) = (buckets.first(), buckets.last()) else {
        return Err(Error::EmptyContainer);
    };

    // NOTE: A single misplaced bucket can send the binary search into the wrong half,
    // so the whole list is validated before searching
    check_ascending(buckets)?;

    let lo = if first.greater_than(start) {
        0
    } else {
        find_bucket(buckets, start).unwrap_or_else(|idx| idx)
    };

    let hi = if last.less_than(end) {
        buckets.len() - 1
    } else {
        match find_bucket(buckets, end) {
            Ok(idx) => idx,
            Err(0) => return Ok(None),
            Err(idx) => idx - 1,
        }
    };

    if lo > hi {
        return Ok(None);
    }

    Ok(Some((lo, hi)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Kind;
    use chrono::NaiveDate;
    use test_log::test;

    fn ts(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2017, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn minutes(ms: &[u32]) -> Vec<BucketNode> {
        ms.iter()
            .map(|&m| BucketNode::new(Kind::Minute, ts(10, m)))
            .collect()
    }

    #[test]
    fn find_every_bucket() {
        let buckets = minutes(&[1, 3, 4, 8, 15, 16, 23, 42]);

        for (idx, bucket) in buckets.iter().enumerate() {
            assert_eq!(Ok(idx), find_bucket(&buckets, bucket.date()));
        }
    }

    #[test]
    fn find_missing_bucket() {
        let buckets = minutes(&[1, 3, 4, 8]);

        assert_eq!(Err(0), find_bucket(&buckets, ts(10, 0)));
        assert_eq!(Err(1), find_bucket(&buckets, ts(10, 2)));
        assert_eq!(Err(3), find_bucket(&buckets, ts(10, 5)));
        assert_eq!(Err(4), find_bucket(&buckets, ts(10, 9)));
    }

    #[test]
    fn find_truncated() {
        let buckets = vec![
            BucketNode::new(Kind::Hour, ts(9, 0)),
            BucketNode::new(Kind::Hour, ts(10, 0)),
        ];
        assert_eq!(Ok(1), find_bucket(&buckets, ts(10, 59)));
    }

    #[test]
    fn bounds_empty() {
        assert!(matches!(
            bounds(&[], ts(10, 0), ts(11, 0)),
            Err(Error::EmptyContainer)
        ));
    }

    #[test]
    fn bounds_exact() {
        let buckets = minutes(&[1, 2, 3, 4, 5]);
        assert_eq!(Some((1, 3)), bounds(&buckets, ts(10, 2), ts(10, 4)).unwrap());
    }

    #[test]
    fn bounds_clamped() {
        let buckets = minutes(&[1, 2, 3, 4, 5]);
        assert_eq!(Some((0, 4)), bounds(&buckets, ts(9, 0), ts(11, 0)).unwrap());
        assert_eq!(Some((0, 2)), bounds(&buckets, ts(9, 0), ts(10, 3)).unwrap());
        assert_eq!(Some((3, 4)), bounds(&buckets, ts(10, 4), ts(11, 0)).unwrap());
    }

    #[test]
    fn bounds_gaps() {
        let buckets = minutes(&[1, 5, 9]);
        assert_eq!(Some((1, 1)), bounds(&buckets, ts(10, 2), ts(10, 8)).unwrap());
        assert_eq!(None, bounds(&buckets, ts(10, 6), ts(10, 8)).unwrap());
    }

    #[test]
    fn bounds_outside() {
        let buckets = minutes(&[1, 2, 3]);
        assert_eq!(None, bounds(&buckets, ts(10, 4), ts(11, 0)).unwrap());
        assert_eq!(None, bounds(&buckets, ts(9, 0), ts(9, 30)).unwrap());
        assert_eq!(None, bounds(&buckets, ts(10, 3), ts(10, 1)).unwrap());
    }

    #[test]
    fn bounds_unordered() {
        let buckets = minutes(&[16, 15]);
        assert!(matches!(
            bounds(&buckets, ts(10, 15), ts(10, 16)),
            Err(Error::UnorderedData(date)) if date == ts(10, 15)
        ));
    }

    #[test]
    fn bounds_duplicate() {
        let buckets = minutes(&[1, 2, 2, 3]);
        assert!(matches!(
            bounds(&buckets, ts(10, 0), ts(11, 0)),
            Err(Error::UnorderedData(_))
        ));
    }

    #[test]
    fn bounds_misplaced_bucket_outside_range() {
        let buckets = minutes(&[1, 2, 3, 4, 9, 7]);
        assert!(matches!(
            bounds(&buckets, ts(10, 0), ts(10, 2)),
            Err(Error::UnorderedData(date)) if date == ts(10, 7)
        ));
    }

    #[test]
    fn bounds_misplaced_bucket_misleads_search() {
        // 10:10 sits where the search probes first
        let buckets = minutes(&[1, 2, 3, 10, 4, 5, 6]);

        for (start, end) in [(5, 6), (2, 5), (4, 4), (0, 3)] {
            assert!(
                matches!(
                    bounds(&buckets, ts(10, start), ts(10, end)),
                    Err(Error::UnorderedData(date)) if date == ts(10, 4)
                ),
                "10:{start:02}..=10:{end:02} should be rejected"
            );
        }
    }

    #[test]
    fn bounds_empty_range_still_validates() {
        let buckets = minutes(&[1, 2, 8, 3]);
        assert!(matches!(
            bounds(&buckets, ts(10, 5), ts(10, 6)),
            Err(Error::UnorderedData(_))
        ));
    }
}

use crate::{BucketNode, Timestamp, Value};

/// What happens to memoized bucket statistics when more readings arrive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Statistics are computed once and never invalidated.
    ///
    /// Reading a bucket, then inserting into it, returns stale statistics.
    #[default]
    Freeze,

    /// Every bucket on the insertion path drops its memoized statistics.
    InvalidateOnInsert,
}

/// Inserts readings at `ts` below `node`, creating buckets as needed.
///
/// Timestamps must be supplied in non-decreasing order: only the last child
/// of every bucket is considered, an earlier timestamp silently opens a new,
/// out-of-order bucket (which range queries later reject).
///
/// Empty `values` are dropped without creating any bucket.
pub fn insert(node: &mut BucketNode, ts: Timestamp, values: &[Value]) {
    insert_with_policy(node, ts, values, CachePolicy::Freeze);
}

/// Same as [`insert`], with an explicit [`CachePolicy`].
pub fn insert_with_policy(
    node: &mut BucketNode,
    ts: Timestamp,
    values: &[Value],
    policy: CachePolicy,
) {
    if values.is_empty() {
        return;
    }

    if policy == CachePolicy::InvalidateOnInsert {
        node.clear_memo();
    }

    if node.kind().is_leaf() {
        node.append_readings(values);
        return;
    }

    let next_is_last = node.last_bucket_mut().is_some_and(|last| last.equals(ts));

    let child = if next_is_last {
        node.last_bucket_mut()
    } else {
        node.create_child(ts)
    };

    if let Some(child) = child {
        insert_with_policy(child, ts, values, policy);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Kind;
    use chrono::NaiveDate;
    use test_log::test;

    fn ts(d: u32, h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2017, 1, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn dates(node: &BucketNode) -> Vec<Timestamp> {
        node.buckets().iter().map(BucketNode::date).collect()
    }

    #[test]
    fn insert_empty_is_noop() {
        let mut root = BucketNode::root();
        insert(&mut root, ts(5, 10, 15), &[]);
        assert!(root.is_empty());
    }

    #[test]
    fn insert_creates_full_path() {
        let mut root = BucketNode::root();
        insert(&mut root, ts(5, 10, 15), &[70.0]);

        let day = root.buckets().first().unwrap();
        assert_eq!(Kind::Day, day.kind());
        assert_eq!(ts(5, 0, 0), day.date());

        let hour = day.buckets().first().unwrap();
        assert_eq!(Kind::Hour, hour.kind());
        assert_eq!(ts(5, 10, 0), hour.date());

        let minute = hour.buckets().first().unwrap();
        assert_eq!(Kind::Minute, minute.kind());
        assert_eq!(ts(5, 10, 15), minute.date());
        assert_eq!(&[70.0], minute.readings());
    }

    #[test]
    fn insert_same_minute_accumulates() {
        let mut root = BucketNode::root();
        insert(&mut root, ts(5, 10, 15), &[70.0]);
        insert(&mut root, ts(5, 10, 15), &[72.0, 71.0]);

        let minute = &root.buckets()[0].buckets()[0].buckets()[0];
        assert_eq!(&[70.0, 72.0, 71.0], minute.readings());
    }

    #[test]
    fn insert_ordered_input_stays_ascending() {
        let mut root = BucketNode::root();

        for (d, h, m) in [(5, 22, 12), (5, 22, 13), (5, 23, 59), (6, 0, 0), (6, 0, 1)] {
            insert(&mut root, ts(d, h, m), &[1.0]);
        }

        assert_eq!(vec![ts(5, 0, 0), ts(6, 0, 0)], dates(&root));
        assert_eq!(
            vec![ts(5, 22, 0), ts(5, 23, 0)],
            dates(&root.buckets()[0])
        );
        assert_eq!(
            vec![ts(5, 22, 12), ts(5, 22, 13)],
            dates(&root.buckets()[0].buckets()[0])
        );
        assert_eq!(
            vec![ts(6, 0, 0), ts(6, 0, 1)],
            dates(&root.buckets()[1].buckets()[0])
        );
    }

    #[test]
    fn insert_out_of_order_opens_new_bucket() {
        let mut root = BucketNode::root();
        insert(&mut root, ts(5, 10, 16), &[80.0]);
        insert(&mut root, ts(5, 10, 15), &[70.0]);
        insert(&mut root, ts(5, 10, 16), &[81.0]);

        let hour = &root.buckets()[0].buckets()[0];
        assert_eq!(
            vec![ts(5, 10, 16), ts(5, 10, 15), ts(5, 10, 16)],
            dates(hour)
        );
    }

    #[test]
    fn insert_freezes_memo() {
        let mut root = BucketNode::root();
        insert(&mut root, ts(5, 10, 15), &[10.0]);
        assert_eq!(10.0, root.aggregate().unwrap());

        insert(&mut root, ts(5, 10, 15), &[20.0]);
        assert_eq!(10.0, root.aggregate().unwrap());
    }

    #[test]
    fn insert_invalidates_memo() {
        let mut root = BucketNode::root();
        let policy = CachePolicy::InvalidateOnInsert;

        insert_with_policy(&mut root, ts(5, 10, 15), &[10.0], policy);
        assert_eq!(10.0, root.aggregate().unwrap());

        insert_with_policy(&mut root, ts(5, 10, 15), &[20.0], policy);
        assert_eq!(15.0, root.aggregate().unwrap());

        insert_with_policy(&mut root, ts(5, 11, 0), &[35.0], policy);
        assert_eq!(25.0, root.aggregate().unwrap());
    }
}

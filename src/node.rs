use crate::agg::{self, Aggregation, Max, Mean, Min};
use crate::{Error, Kind, Timestamp, Value};
use chrono::NaiveDateTime;
use std::cell::Cell;
use std::cmp::Ordering;

/// Contents of a bucket.
#[derive(Clone, Debug, PartialEq)]
pub enum Children {
    /// Finer buckets, ascending by date (root, day and hour buckets)
    Buckets(Vec<BucketNode>),

    /// Raw readings in insertion order (minute buckets)
    Readings(Vec<Value>),
}

/// Memoized statistics of a bucket.
///
/// Populated on first read and kept for the lifetime of the node,
/// unless explicitly cleared (see [`crate::CachePolicy`]).
#[derive(Clone, Debug, Default)]
struct Memo {
    mean: Cell<Option<Value>>,
    min: Cell<Option<Value>>,
    max: Cell<Option<Value>>,
}

impl Memo {
    fn clear(&self) {
        self.mean.set(None);
        self.min.set(None);
        self.max.set(None);
    }
}

/// A node of the time bucket tree (root, day, hour or minute).
#[derive(Clone, Debug)]
pub struct BucketNode {
    kind: Kind,
    date: Timestamp,
    children: Children,
    memo: Memo,
}

impl PartialEq for BucketNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.date == other.date && self.children == other.children
    }
}

impl BucketNode {
    /// Creates an empty root node.
    #[must_use]
    pub fn root() -> Self {
        Self::from_parts(Kind::Root, NaiveDateTime::MIN, Children::Buckets(vec![]))
    }

    /// Creates an empty bucket of the given kind, containing `ts`.
    #[must_use]
    pub fn new(kind: Kind, ts: Timestamp) -> Self {
        let children = if kind.is_leaf() {
            Children::Readings(vec![])
        } else {
            Children::Buckets(vec![])
        };

        Self::from_parts(kind, kind.truncate(ts), children)
    }

    pub(crate) fn from_parts(kind: Kind, date: Timestamp, children: Children) -> Self {
        Self {
            kind,
            date,
            children,
            memo: Memo::default(),
        }
    }

    /// Level of this bucket.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Start of the bucket.
    ///
    /// Meaningless for the root node.
    #[must_use]
    pub fn date(&self) -> Timestamp {
        self.date
    }

    /// Contents of the bucket.
    #[must_use]
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Child buckets; empty for minute buckets.
    #[must_use]
    pub fn buckets(&self) -> &[Self] {
        match &self.children {
            Children::Buckets(buckets) => buckets,
            Children::Readings(_) => &[],
        }
    }

    /// Raw readings; empty for anything but minute buckets.
    #[must_use]
    pub fn readings(&self) -> &[Value] {
        match &self.children {
            Children::Buckets(_) => &[],
            Children::Readings(readings) => readings,
        }
    }

    /// Number of child buckets or readings.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.children {
            Children::Buckets(buckets) => buckets.len(),
            Children::Readings(readings) => readings.len(),
        }
    }

    /// Returns `true` if the bucket has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Truncates a timestamp the way this bucket's kind does.
    #[must_use]
    pub fn truncate(&self, ts: Timestamp) -> Timestamp {
        self.kind.truncate(ts)
    }

    /// Compares this bucket's date against `ts`, truncated to this bucket's kind.
    #[must_use]
    pub fn compare(&self, ts: Timestamp) -> Ordering {
        self.date.cmp(&self.truncate(ts))
    }

    /// Returns `true` if `ts` falls into this bucket.
    #[must_use]
    pub fn equals(&self, ts: Timestamp) -> bool {
        self.compare(ts).is_eq()
    }

    /// Returns `true` if this bucket lies before the bucket containing `ts`.
    #[must_use]
    pub fn less_than(&self, ts: Timestamp) -> bool {
        self.compare(ts).is_lt()
    }

    /// Returns `true` if this bucket lies after the bucket containing `ts`.
    #[must_use]
    pub fn greater_than(&self, ts: Timestamp) -> bool {
        self.compare(ts).is_gt()
    }

    pub(crate) fn last_bucket_mut(&mut self) -> Option<&mut Self> {
        match &mut self.children {
            Children::Buckets(buckets) => buckets.last_mut(),
            Children::Readings(_) => None,
        }
    }

    /// Appends a new child bucket of the next finer kind for `ts`, and returns it.
    ///
    /// Returns `None` for minute buckets, which hold readings instead.
    pub fn create_child(&mut self, ts: Timestamp) -> Option<&mut Self> {
        let kind = self.kind.child()?;

        match &mut self.children {
            Children::Buckets(buckets) => {
                log::trace!("creating {kind} bucket for {ts}");
                buckets.push(Self::new(kind, ts));
                buckets.last_mut()
            }
            Children::Readings(_) => None,
        }
    }

    /// Appends raw readings to a minute bucket.
    ///
    /// Returns `false` (and does nothing) if this is not a minute bucket.
    pub fn append_readings(&mut self, values: &[Value]) -> bool {
        match &mut self.children {
            Children::Readings(readings) => {
                readings.extend_from_slice(values);
                true
            }
            Children::Buckets(_) => false,
        }
    }

    /// Drops the memoized statistics of this bucket.
    pub fn clear_memo(&self) {
        self.memo.clear();
    }

    /// Mean of the bucket.
    ///
    /// For minutes, the mean of the readings. Coarser buckets take the unweighted mean
    /// of their children's means, so every child counts the same, regardless of
    /// how many readings it holds.
    ///
    /// The result is memoized on first success and not recomputed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonNumericAggregation`] if a minute below is empty or
    /// holds a non-numeric reading.
    pub fn aggregate(&self) -> crate::Result<Value> {
        self.rollup::<Mean>(&self.memo.mean, Self::aggregate)
    }

    /// Smallest reading in the bucket. Memoized like [`BucketNode::aggregate`].
    ///
    /// # Errors
    ///
    /// Same as [`BucketNode::aggregate`].
    pub fn min_value(&self) -> crate::Result<Value> {
        self.rollup::<Min>(&self.memo.min, Self::min_value)
    }

    /// Largest reading in the bucket. Memoized like [`BucketNode::aggregate`].
    ///
    /// # Errors
    ///
    /// Same as [`BucketNode::aggregate`].
    pub fn max_value(&self) -> crate::Result<Value> {
        self.rollup::<Max>(&self.memo.max, Self::max_value)
    }

    fn rollup<A: Aggregation>(
        &self,
        memo: &Cell<Option<Value>>,
        child_stat: fn(&Self) -> crate::Result<Value>,
    ) -> crate::Result<Value> {
        if let Some(value) = memo.get() {
            return Ok(value);
        }

        let value = match &self.children {
            Children::Readings(readings) => {
                // NOTE: NaN is the sentinel for values the parser could not convert
                if readings.iter().any(|x| x.is_nan()) {
                    return Err(Error::NonNumericAggregation(self.date));
                }
                agg::reduce::<A>(readings.iter().copied())
                    .ok_or(Error::NonNumericAggregation(self.date))?
            }
            Children::Buckets(buckets) => {
                let values = buckets
                    .iter()
                    .map(child_stat)
                    .collect::<crate::Result<Vec<_>>>()?;

                agg::reduce::<A>(values).ok_or(Error::EmptyContainer)?
            }
        };

        memo.set(Some(value));

        Ok(value)
    }
}

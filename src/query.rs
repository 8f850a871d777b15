use crate::{search, BucketNode, Kind, Mode, Resolution, Timestamp, Value};
use serde::Serialize;

/// Result of a query for a single bucket.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Data {
    /// Raw readings of a minute
    Readings(Vec<Value>),

    /// Aggregated value (mean, min or max)
    Value(Value),
}

/// A bucket start date with its query result.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    /// Start of the bucket
    pub date: Timestamp,

    /// Readings or aggregate
    pub data: Data,
}

impl Point {
    /// Returns the aggregated value, if this is not a raw point.
    #[must_use]
    pub fn value(&self) -> Option<Value> {
        match self.data {
            Data::Value(v) => Some(v),
            Data::Readings(_) => None,
        }
    }
}

/// Collects all buckets of `node` that overlap `[start, end]`, ascending by date.
///
/// In [`Mode::Raw`], the readings of every minute bucket are returned and `resolution`
/// is ignored. Otherwise every bucket of the given resolution is rolled up into a single value.
///
/// # Errors
///
/// - [`crate::Error::EmptyContainer`] if `node` has no children
/// - [`crate::Error::UnorderedData`] if buckets inside the range were inserted out of order
/// - [`crate::Error::NonNumericAggregation`] if a bucket cannot be aggregated
pub fn query(
    node: &BucketNode,
    start: Timestamp,
    end: Timestamp,
    resolution: Resolution,
    mode: Mode,
) -> crate::Result<Vec<Point>> {
    let target = match mode {
        Mode::Raw => Kind::Minute,
        _ => Kind::from(resolution),
    };

    let mut points = vec![];
    collect(node, start, end, target, mode, &mut points)?;
    Ok(points)
}

fn collect(
    node: &BucketNode,
    start: Timestamp,
    end: Timestamp,
    target: Kind,
    mode: Mode,
    points: &mut Vec<Point>,
) -> crate::Result<()> {
    let buckets = node.buckets();

    let Some((lo, hi)) = search::bounds(buckets, start, end)? else {
        return Ok(());
    };

    log::trace!(
        "{} {}: scanning buckets {lo}..={hi} of {}",
        node.kind(),
        node.date(),
        buckets.len(),
    );

    for bucket in buckets.get(lo..=hi).unwrap_or_default() {
        // NOTE: Buckets at or below the target level are reported as they are
        if bucket.kind() >= target {
            points.push(Point {
                date: bucket.date(),
                data: evaluate(bucket, mode)?,
            });
        } else {
            collect(bucket, start, end, target, mode, points)?;
        }
    }

    Ok(())
}

fn evaluate(bucket: &BucketNode, mode: Mode) -> crate::Result<Data> {
    Ok(match mode {
        Mode::Raw => Data::Readings(bucket.readings().to_vec()),
        Mode::Mean => Data::Value(bucket.aggregate()?),
        Mode::Min => Data::Value(bucket.min_value()?),
        Mode::Max => Data::Value(bucket.max_value()?),
    })
}

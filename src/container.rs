use crate::{
    container_builder::Builder, inserter, query::Point, BucketNode, CachePolicy, Error, Mode,
    Resolution, Timestamp, Value,
};

/// Maps field (column) names to their bucket trees.
///
/// With the default [`CachePolicy::Freeze`], statistics are frozen on first read:
/// querying a bucket and then inserting into it returns stale statistics afterwards.
///
/// ```
/// use bucketree::{Container, Mode, Resolution};
/// use chrono::NaiveDate;
///
/// let mut container = Container::builder().sensor("hr").build();
///
/// let at = |h, m| NaiveDate::from_ymd_opt(2017, 1, 5).unwrap().and_hms_opt(h, m, 0).unwrap();
///
/// container.insert("heart_rate", at(10, 15), &[70.0]);
/// container.insert("heart_rate", at(10, 15), &[72.0]);
/// container.insert("heart_rate", at(10, 16), &[80.0]);
///
/// let points = container.query(
///     "heart_rate",
///     at(10, 15),
///     at(10, 16),
///     Resolution::Minute,
///     Mode::Mean,
/// )?;
///
/// assert_eq!(Some(71.0), points[0].value());
/// assert_eq!(Some(80.0), points[1].value());
/// #
/// # Ok::<(), bucketree::Error>(())
/// ```
pub struct Container {
    pub(crate) sensor: String,
    pub(crate) cache_policy: CachePolicy,
    pub(crate) fields: crate::HashMap<String, BucketNode>,
}

impl Default for Container {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Container {
    /// Creates an empty container with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder to configure a container.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Name of the sensor that produced the readings (may be empty).
    #[must_use]
    pub fn sensor(&self) -> &str {
        &self.sensor
    }

    /// How memoized statistics react to insertions.
    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    /// Registers a field without any readings, if it does not exist yet.
    pub fn add_field(&mut self, name: &str) {
        if !self.fields.contains_key(name) {
            log::trace!("adding field {name:?}");
            self.fields.insert(name.to_owned(), BucketNode::root());
        }
    }

    /// Inserts readings of a field.
    ///
    /// Timestamps must be non-decreasing per field, see [`crate::insert`].
    pub fn insert(&mut self, field: &str, ts: Timestamp, values: &[Value]) {
        if values.is_empty() {
            return;
        }

        self.add_field(field);

        if let Some(root) = self.fields.get_mut(field) {
            inserter::insert_with_policy(root, ts, values, self.cache_policy);
        }
    }

    /// Root bucket of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&BucketNode> {
        self.fields.get(name)
    }

    /// Names of all fields, sorted.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        let mut names = self.fields.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Queries a field, see [`crate::query`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the field does not exist,
    /// otherwise the errors of [`crate::query`].
    pub fn query(
        &self,
        field: &str,
        start: Timestamp,
        end: Timestamp,
        resolution: Resolution,
        mode: Mode,
    ) -> crate::Result<Vec<Point>> {
        let root = self
            .field(field)
            .ok_or_else(|| Error::UnknownField(field.to_owned()))?;

        log::debug!("querying {field} [{start}..={end}] {mode} @ {resolution}");

        crate::query(root, start, end, resolution, mode)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_log::test;

    fn ts(h: u32, m: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2017, 1, 5)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn container_fields() {
        let mut container = Container::new();
        container.add_field("b");
        container.insert("a", ts(10, 0), &[1.0]);
        container.insert("c", ts(10, 0), &[]);

        assert_eq!(vec!["a", "b"], container.fields());
        assert!(container.field("b").unwrap().is_empty());
        assert_eq!(1, container.field("a").unwrap().len());
    }

    #[test]
    fn container_unknown_field() {
        let container = Container::new();

        assert!(matches!(
            container.query("hr", ts(10, 0), ts(11, 0), Resolution::Hour, Mode::Mean),
            Err(Error::UnknownField(name)) if name == "hr"
        ));
    }

    #[test]
    fn container_field_without_readings() {
        let mut container = Container::new();
        container.add_field("hr");

        assert!(matches!(
            container.query("hr", ts(10, 0), ts(11, 0), Resolution::Hour, Mode::Mean),
            Err(Error::EmptyContainer)
        ));
    }

    #[test]
    fn container_fields_are_independent() {
        let mut container = Container::new();
        container.insert("hr", ts(10, 0), &[60.0]);
        container.insert("rr", ts(9, 0), &[12.0]);
        container.insert("hr", ts(11, 0), &[80.0]);

        let hr = container
            .query("hr", ts(0, 0), ts(23, 0), Resolution::Day, Mode::Mean)
            .unwrap();
        assert_eq!(Some(70.0), hr[0].value());

        let rr = container
            .query("rr", ts(0, 0), ts(23, 0), Resolution::Day, Mode::Max)
            .unwrap();
        assert_eq!(Some(12.0), rr[0].value());
    }

    #[test]
    fn container_cache_policy() {
        let mut container = Container::builder()
            .cache_policy(CachePolicy::InvalidateOnInsert)
            .build();

        container.insert("hr", ts(10, 0), &[60.0]);
        let before = container
            .query("hr", ts(0, 0), ts(23, 0), Resolution::Day, Mode::Mean)
            .unwrap();
        assert_eq!(Some(60.0), before[0].value());

        container.insert("hr", ts(10, 0), &[80.0]);
        let after = container
            .query("hr", ts(0, 0), ts(23, 0), Resolution::Day, Mode::Mean)
            .unwrap();
        assert_eq!(Some(70.0), after[0].value());
    }
}

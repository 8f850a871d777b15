use crate::{CachePolicy, Container};

/// Builder for [`Container`].
pub struct Builder {
    sensor: String,
    cache_policy: CachePolicy,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            sensor: String::new(),
            cache_policy: CachePolicy::Freeze,
        }
    }

    /// Sets the name of the sensor that produced the readings, e.g. `ECG`.
    ///
    /// Default = empty
    #[must_use]
    pub fn sensor<S: Into<String>>(mut self, name: S) -> Self {
        self.sensor = name.into();
        self
    }

    /// Sets what happens to memoized bucket statistics when readings are inserted later on.
    ///
    /// Default = [`CachePolicy::Freeze`]
    #[must_use]
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Creates the (empty) container.
    #[must_use]
    pub fn build(self) -> Container {
        Container {
            sensor: self.sensor,
            cache_policy: self.cache_policy,
            fields: crate::HashMap::default(),
        }
    }
}

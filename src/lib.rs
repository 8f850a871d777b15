//! An in-memory bucket tree for timestamped sensor readings.
//!
//! Readings are grouped per field into a fixed-depth tree (root → day → hour → minute),
//! so range queries can be answered at minute, hour or day resolution, either
//! as raw readings or rolled up into a mean, minimum or maximum.
//!
//! Statistics are memoized per bucket on first computation. By default they are
//! frozen afterwards, so data should be fully ingested before querying,
//! see [`CachePolicy`].
//!
//! Timestamps must arrive in non-decreasing order per field: a reading is only
//! ever routed into the most recent bucket of each level.
//!
//! ```
//! use bucketree::{parse_time_bound, Container, Mode, Resolution};
//!
//! let mut container = Container::new();
//!
//! container.insert("heart_rate", parse_time_bound("2017:01:05:22:12")?, &[70.0, 72.0]);
//! container.insert("heart_rate", parse_time_bound("2017:01:05:22:13")?, &[80.0]);
//! container.insert("heart_rate", parse_time_bound("2017:01:05:23:01")?, &[60.0]);
//!
//! let points = container.query(
//!     "heart_rate",
//!     parse_time_bound("2017:01:05")?,
//!     parse_time_bound("2017:01:06")?,
//!     Resolution::Hour,
//!     Mode::Mean,
//! )?;
//!
//! // 22:00 = mean of the minute means (71 and 80)
//! assert_eq!(Some(75.5), points[0].value());
//! assert_eq!(Some(60.0), points[1].value());
//! #
//! # Ok::<(), bucketree::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::cargo)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod agg;
mod codec;
mod container;
mod container_builder;
mod error;
mod inserter;
mod kind;
mod node;
mod output;

/// Delimited text input
pub mod parse;

mod query;
mod resolution;
mod search;
mod time;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use container::Container;
pub use container_builder::Builder;
pub use error::{Error, Result};
pub use inserter::{insert, insert_with_policy, CachePolicy};
pub use kind::Kind;
pub use node::{BucketNode, Children};
pub use output::{write, write_csv, write_json, OutputFormat};
pub use query::{query, Data, Point};
pub use resolution::{Mode, Resolution};
pub use search::{bounds, find_bucket};
pub use time::parse_time_bound;

/// Value of a sensor reading
pub type Value = f64;

/// Minute-granular, timezone-naive point in time
pub type Timestamp = chrono::NaiveDateTime;

mod max;
mod mean;
mod min;

pub use max::Max;
pub use mean::Mean;
pub use min::Min;

use crate::Value;

/// Defines a rollup of a list of values.
///
/// - `init` seeds the accumulator with the first value (default: Identity)
///
/// - `transform` defines what to do with each following value (default: Add)
///
/// - `finish` can transform the result value, given the number of values (default: Identity)
pub trait Aggregation {
    fn init(value: Value) -> Value {
        value
    }

    fn transform(accu: Value, x: Value) -> Value {
        accu + x
    }

    fn finish(accu: Value, _len: usize) -> Value {
        accu
    }
}

/// Folds all values using the aggregation `A`.
///
/// Returns `None` if there are no values.
pub fn reduce<A: Aggregation>(values: impl IntoIterator<Item = Value>) -> Option<Value> {
    let mut values = values.into_iter();

    let first = values.next()?;

    let (accu, len) = values.fold((A::init(first), 1), |(accu, len), x| {
        (A::transform(accu, x), len + 1)
    });

    Some(A::finish(accu, len))
}

use crate::Value;

#[derive(Clone)]
pub struct Mean;

impl super::Aggregation for Mean {
    #[allow(clippy::cast_precision_loss)]
    fn finish(accu: Value, len: usize) -> Value {
        accu / len as Value
    }
}

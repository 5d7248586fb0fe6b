mod choice;
mod numeric;
mod path;
mod pattern;

pub use choice::*;
pub use numeric::*;
pub use path::*;
pub use pattern::*;

use std::sync::Arc;

use crate::error::FilterError;
use crate::model::Value;

/// Converts a raw string into a typed [`Value`], or rejects it with a reason.
///
/// Filters are pure: they must not mutate external state, and a single filter may be shared across many fields.
pub trait ValueFilter: std::fmt::Debug + Send + Sync {
    /// Convert `raw` into a value.
    fn parse(&self, raw: &str) -> Result<Value, FilterError>;

    /// Describe the constraints of this filter (ex: for help output).
    fn describe(&self) -> String;
}

/// A filter shared between declarations.
pub type SharedFilter = Arc<dyn ValueFilter>;

/// Run `raw` through `filter`, or pass it through as text when there is no filter.
pub(crate) fn apply(filter: Option<&SharedFilter>, raw: &str) -> Result<Value, FilterError> {
    match filter {
        Some(filter) => filter.parse(raw),
        None => Ok(Value::Text(raw.to_string())),
    }
}

//! Traits which, typically, may be imported without concern: `use argwise::prelude::*`.

// Needed to implement a custom filter, or to call `parse` on a concrete one.
pub use crate::filter::ValueFilter;
// Needed to implement a custom rule.
pub use crate::rule::Rule;
// Needed to implement a registry for `tokenize` or custom rules.
pub use crate::validator::Registry;
// Needed to send help output somewhere other than stdout.
pub use crate::help::UserInterface;
